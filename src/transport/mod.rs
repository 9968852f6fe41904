//! Transport layer abstraction.
//!
//! The transaction engine depends on a minimal datagram contract: send one
//! datagram, receive one datagram under a deadline, name the peer. A session
//! owns its transport and keeps one request in flight at a time, so there is
//! no correlation or multiplexing machinery here.

mod mock;
mod udp;

pub use mock::{MockResponse, MockTransport, RecordedRequest, ResponseBuilder};
pub use udp::UdpTransport;

use crate::error::Result;
use std::future::Future;
use std::net::SocketAddr;
use tokio::time::Instant;

/// Client-side datagram transport.
///
/// Implementations are connection-oriented in the UDP `connect` sense: they
/// talk to exactly one peer. `recv` must resolve with an error once the
/// deadline passes.
pub trait Transport: Send + Sync {
    /// Send one datagram to the peer.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Receive one datagram into `buf`, returning the byte count.
    ///
    /// Resolves with a timed-out [`Error::Transport`](crate::Error::Transport)
    /// if nothing arrives by `deadline`.
    fn recv(&self, buf: &mut [u8], deadline: Instant) -> impl Future<Output = Result<usize>> + Send;

    /// The peer address this transport sends to.
    fn peer_addr(&self) -> SocketAddr;
}

/// Extract the request ID from an encoded v1/v2c message.
///
/// Walks the raw BER layout (outer SEQUENCE, version, community, PDU header)
/// without building a full decoder. Used by the mock transport to record and
/// patch request IDs; returns `None` on anything it cannot navigate.
pub(crate) fn extract_request_id(data: &[u8]) -> Option<u32> {
    let mut pos = 0;

    // Outer SEQUENCE
    if data.get(pos) != Some(&0x30) {
        return None;
    }
    let (next, _) = read_ber_length(data, pos + 1)?;
    pos = next;

    // Version INTEGER
    if data.get(pos) != Some(&0x02) {
        return None;
    }
    let (next, version_len) = read_ber_length(data, pos + 1)?;
    pos = next + version_len;

    // Community OCTET STRING
    if data.get(pos) != Some(&0x04) {
        return None;
    }
    let (next, community_len) = read_ber_length(data, pos + 1)?;
    pos = next + community_len;

    // PDU header
    let pdu_tag = *data.get(pos)?;
    if !(0xA0..=0xA5).contains(&pdu_tag) {
        return None;
    }
    let (next, _) = read_ber_length(data, pos + 1)?;
    pos = next;

    // Request ID INTEGER
    if data.get(pos) != Some(&0x02) {
        return None;
    }
    let (next, id_len) = read_ber_length(data, pos + 1)?;
    pos = next;
    if id_len == 0 || id_len > 4 || pos + id_len > data.len() {
        return None;
    }

    let mut value: i32 = if data[pos] & 0x80 != 0 { -1 } else { 0 };
    for &byte in &data[pos..pos + id_len] {
        value = (value << 8) | (byte as i32);
    }

    Some(value as u32)
}

/// Read a BER length field, returning (new_position, length).
fn read_ber_length(data: &[u8], pos: usize) -> Option<(usize, usize)> {
    let first = *data.get(pos)?;

    if first < 0x80 {
        return Some((pos + 1, first as usize));
    }
    if first == 0x80 {
        return None;
    }

    let num_octets = (first & 0x7F) as usize;
    if pos + 1 + num_octets > data.len() {
        return None;
    }

    let mut length: usize = 0;
    for i in 0..num_octets {
        length = (length << 8) | (data[pos + 1 + i] as usize);
    }

    Some((pos + 1 + num_octets, length))
}

#[cfg(test)]
mod extract_tests {
    use super::*;

    #[test]
    fn extract_from_v2c_response() {
        let response = [
            0x30, 0x1C, // SEQUENCE
            0x02, 0x01, 0x01, // INTEGER 1 (v2c)
            0x04, 0x06, 0x70, 0x75, 0x62, 0x6C, 0x69, 0x63, // "public"
            0xA2, 0x0F, // Response PDU
            0x02, 0x02, 0x30, 0x39, // INTEGER 12345
            0x02, 0x01, 0x00, // error-status
            0x02, 0x01, 0x00, // error-index
            0x30, 0x03, 0x30, 0x01, 0x00, // varbinds
        ];

        assert_eq!(extract_request_id(&response), Some(12345));
    }

    #[test]
    fn extract_from_v1_request() {
        let request = [
            0x30, 0x1B, 0x02, 0x01, 0x00, // v1
            0x04, 0x06, 0x70, 0x75, 0x62, 0x6C, 0x69, 0x63, // "public"
            0xA0, 0x0E, // GetRequest
            0x02, 0x01, 0x2A, // INTEGER 42
            0x02, 0x01, 0x00, 0x02, 0x01, 0x00, 0x30, 0x03, 0x30, 0x01, 0x00,
        ];

        assert_eq!(extract_request_id(&request), Some(42));
    }

    #[test]
    fn extract_high_bit_id() {
        // 4-byte id 0xFF000001 rides as a negative INTEGER.
        let response = [
            0x30, 0x1E, 0x02, 0x01, 0x01, 0x04, 0x06, 0x70, 0x75, 0x62, 0x6C, 0x69, 0x63, 0xA2,
            0x11, 0x02, 0x04, 0xFF, 0x00, 0x00, 0x01, // INTEGER
            0x02, 0x01, 0x00, 0x02, 0x01, 0x00, 0x30, 0x03, 0x30, 0x01, 0x00,
        ];

        assert_eq!(extract_request_id(&response), Some(0xFF00_0001));
    }

    #[test]
    fn extract_malformed() {
        assert_eq!(extract_request_id(&[]), None);
        assert_eq!(extract_request_id(&[0x02, 0x01, 0x00]), None);
        assert_eq!(extract_request_id(&[0x30, 0x10]), None);
    }
}
