//! Mock transport for testing.
//!
//! A programmable transport that scripts agent behavior without a network:
//! queued responses, simulated timeouts and I/O errors, and a record of
//! every datagram sent. Timeout entries consume the attempt's deadline so
//! retry timing behaves like the real transport under `tokio::time::pause`.

use super::{Transport, extract_request_id};
use crate::error::{Error, Result};
use crate::message::CommunityMessage;
use bytes::Bytes;
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// A scripted response for one receive call.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this data with its request ID patched to the most recent
    /// recorded request.
    Data(Bytes),
    /// Return this data with its request ID patched to the nth (0-based)
    /// recorded request. Simulates a late reply to an earlier attempt.
    DataForRequest(usize, Bytes),
    /// Return this data as-is, without patching.
    Raw(Bytes),
    /// Sleep until the deadline, then fail with a timed-out transport error.
    Timeout,
    /// Fail immediately with an I/O error.
    IoError(String),
}

/// A recorded request sent through the mock transport.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    /// The raw request datagram.
    pub data: Bytes,
    /// The request ID extracted from it, if the frame was parseable.
    pub request_id: Option<u32>,
}

struct MockInner {
    peer: SocketAddr,
    responses: VecDeque<MockResponse>,
    requests: Vec<RecordedRequest>,
    default_response: Option<MockResponse>,
}

/// Mock transport for driving the session without a network.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockInner>>,
}

impl MockTransport {
    /// Create a new mock transport with the given nominal peer address.
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                peer,
                responses: VecDeque::new(),
                requests: Vec::new(),
                default_response: None,
            })),
        }
    }

    /// Queue a response whose request ID is patched to match the request
    /// that precedes it.
    pub fn queue_response(&self, data: impl Into<Bytes>) {
        self.queue(MockResponse::Data(data.into()));
    }

    /// Queue a raw response without request ID patching.
    pub fn queue_raw_response(&self, data: impl Into<Bytes>) {
        self.queue(MockResponse::Raw(data.into()));
    }

    /// Queue a receive timeout.
    pub fn queue_timeout(&self) {
        self.queue(MockResponse::Timeout);
    }

    /// Queue an I/O error.
    pub fn queue_io_error(&self, msg: impl Into<String>) {
        self.queue(MockResponse::IoError(msg.into()));
    }

    /// Queue any scripted response.
    pub fn queue(&self, response: MockResponse) {
        self.inner.lock().unwrap().responses.push_back(response);
    }

    /// Set the response used when the queue is empty.
    pub fn set_default_response(&self, response: MockResponse) {
        self.inner.lock().unwrap().default_response = Some(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Number of datagrams sent so far.
    pub fn request_count(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }

    /// Patch the request ID in an encoded response.
    ///
    /// Decode, rewrite, re-encode; frames that do not decode are returned
    /// unchanged so tests can script garbage on purpose.
    fn patch_request_id(data: Bytes, new_id: u32) -> Bytes {
        match CommunityMessage::decode(data.clone()) {
            Ok(mut msg) => {
                msg.pdu.request_id = new_id;
                msg.encode().unwrap_or(data)
            }
            Err(_) => data,
        }
    }
}

impl Transport for MockTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        let data = Bytes::copy_from_slice(data);
        let request_id = extract_request_id(&data);
        self.inner
            .lock()
            .unwrap()
            .requests
            .push(RecordedRequest { data, request_id });
        Ok(())
    }

    async fn recv(&self, buf: &mut [u8], deadline: Instant) -> Result<usize> {
        let (response, peer, patch_id) = {
            let mut inner = self.inner.lock().unwrap();
            let response = inner
                .responses
                .pop_front()
                .or_else(|| inner.default_response.clone());

            let patch_id = match &response {
                Some(MockResponse::Data(_)) => {
                    inner.requests.last().and_then(|r| r.request_id)
                }
                Some(MockResponse::DataForRequest(n, _)) => {
                    inner.requests.get(*n).and_then(|r| r.request_id)
                }
                _ => None,
            };
            (response, inner.peer, patch_id)
        };

        let data = match response {
            Some(MockResponse::Data(data)) | Some(MockResponse::DataForRequest(_, data)) => {
                match patch_id {
                    Some(id) => Self::patch_request_id(data, id),
                    None => data,
                }
            }
            Some(MockResponse::Raw(data)) => data,
            Some(MockResponse::IoError(msg)) => {
                return Err(Error::Transport {
                    target: Some(peer),
                    source: io::Error::other(msg),
                });
            }
            Some(MockResponse::Timeout) | None => {
                tokio::time::sleep_until(deadline).await;
                return Err(Error::Transport {
                    target: Some(peer),
                    source: io::Error::from(io::ErrorKind::TimedOut),
                });
            }
        };

        // UDP semantics: an oversize datagram is silently truncated.
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }

    fn peer_addr(&self) -> SocketAddr {
        self.inner.lock().unwrap().peer
    }
}

/// Builder for response messages used in tests.
///
/// Constructs valid response frames without hand-crafting BER.
pub struct ResponseBuilder {
    request_id: u32,
    varbinds: Vec<crate::varbind::VarBind>,
    error_status: u8,
    error_index: u8,
}

impl ResponseBuilder {
    /// Create a builder with the given request ID.
    ///
    /// When queued via [`MockTransport::queue_response`] the ID is patched
    /// anyway, so a placeholder is fine.
    pub fn new(request_id: u32) -> Self {
        Self {
            request_id,
            varbinds: Vec::new(),
            error_status: 0,
            error_index: 0,
        }
    }

    /// Add a varbind to the response.
    pub fn varbind(mut self, oid: crate::oid::Oid, value: crate::value::Value) -> Self {
        self.varbinds.push(crate::varbind::VarBind::new(oid, value));
        self
    }

    /// Set the error status.
    pub fn error_status(mut self, status: u8) -> Self {
        self.error_status = status;
        self
    }

    /// Set the error index.
    pub fn error_index(mut self, index: u8) -> Self {
        self.error_index = index;
        self
    }

    /// Build an encoded response for the given version and community.
    pub fn build(self, version: crate::version::Version, community: &[u8]) -> Bytes {
        let mut pdu = crate::pdu::Pdu::response(self.request_id, self.varbinds);
        pdu.error_status = self.error_status;
        pdu.error_index = self.error_index;

        let msg = CommunityMessage::new(version, Bytes::copy_from_slice(community), pdu);
        msg.encode().expect("test response encodes")
    }

    /// Build an encoded v2c response.
    pub fn build_v2c(self, community: &[u8]) -> Bytes {
        self.build(crate::version::Version::V2c, community)
    }

    /// Build an encoded v1 response.
    pub fn build_v1(self, community: &[u8]) -> Bytes {
        self.build(crate::version::Version::V1, community)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use crate::{oid, pdu::Pdu};
    use std::time::Duration;

    fn peer() -> SocketAddr {
        "127.0.0.1:161".parse().unwrap()
    }

    fn encoded_get(request_id: u32) -> Bytes {
        let mut pdu = Pdu::get_request(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]);
        pdu.request_id = request_id;
        CommunityMessage::v2c(b"public".as_slice(), pdu)
            .encode()
            .unwrap()
    }

    #[tokio::test]
    async fn records_requests_with_ids() {
        let mock = MockTransport::new(peer());
        mock.send(&encoded_get(5)).await.unwrap();
        mock.send(&encoded_get(6)).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].request_id, Some(5));
        assert_eq!(requests[1].request_id, Some(6));
    }

    #[tokio::test]
    async fn patches_to_latest_request() {
        let mock = MockTransport::new(peer());
        let response = ResponseBuilder::new(0)
            .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("test"))
            .build_v2c(b"public");
        mock.queue_response(response);

        mock.send(&encoded_get(99)).await.unwrap();

        let mut buf = [0u8; 65536];
        let deadline = Instant::now() + Duration::from_secs(1);
        let n = mock.recv(&mut buf, deadline).await.unwrap();

        let decoded = CommunityMessage::decode(Bytes::copy_from_slice(&buf[..n])).unwrap();
        assert_eq!(decoded.pdu.request_id, 99);
    }

    #[tokio::test]
    async fn patches_to_specific_request() {
        let mock = MockTransport::new(peer());
        let response = ResponseBuilder::new(0)
            .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("late"))
            .build_v2c(b"public");
        mock.queue(MockResponse::DataForRequest(0, response));

        mock.send(&encoded_get(41)).await.unwrap();
        mock.send(&encoded_get(42)).await.unwrap();

        let mut buf = [0u8; 65536];
        let deadline = Instant::now() + Duration::from_secs(1);
        let n = mock.recv(&mut buf, deadline).await.unwrap();

        let decoded = CommunityMessage::decode(Bytes::copy_from_slice(&buf[..n])).unwrap();
        assert_eq!(decoded.pdu.request_id, 41);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_consumes_deadline() {
        let mock = MockTransport::new(peer());
        mock.queue_timeout();

        let start = Instant::now();
        let mut buf = [0u8; 16];
        let deadline = start + Duration::from_millis(300);
        let err = mock.recv(&mut buf, deadline).await.unwrap_err();

        assert!(Instant::now() >= deadline);
        match err {
            Error::Transport { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::TimedOut);
            }
            other => panic!("expected Transport error, got {:?}", other),
        }
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test]
    async fn io_error_immediate() {
        let mock = MockTransport::new(peer());
        mock.queue_io_error("socket closed");

        let mut buf = [0u8; 16];
        let deadline = Instant::now() + Duration::from_secs(10);
        let err = mock.recv(&mut buf, deadline).await.unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
    }
}
