//! BER encoding.
//!
//! Uses a reverse buffer: content is written from the end backwards, so a
//! constructed type can prepend its length and tag after its content exists
//! without pre-calculating sizes.

use super::length::encode_length;
use super::tag;
use bytes::Bytes;

/// Buffer for BER encoding that writes backwards.
pub struct EncodeBuf {
    buf: Vec<u8>,
}

impl EncodeBuf {
    /// Create a new encode buffer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    /// Create a new encode buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Push a single byte.
    pub fn push_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Push a byte slice (stored reversed so output order is preserved).
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend(bytes.iter().rev());
    }

    /// Push a BER length encoding.
    pub fn push_length(&mut self, len: usize) {
        let encoded = encode_length(len);
        self.push_bytes(&encoded);
    }

    /// Push a BER tag.
    pub fn push_tag(&mut self, tag: u8) {
        self.buf.push(tag);
    }

    /// Current length of encoded data.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Encode a constructed type (SEQUENCE, PDU).
    ///
    /// Calls the closure to encode contents, then wraps with length and tag.
    /// Because the buffer is reversed, the closure must push fields in
    /// reverse order.
    pub fn push_constructed<F>(&mut self, tag: u8, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let start_len = self.len();
        f(self);
        let content_len = self.len() - start_len;
        self.push_length(content_len);
        self.push_tag(tag);
    }

    /// Encode a SEQUENCE.
    pub fn push_sequence<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    /// Encode an INTEGER in minimal two's-complement form.
    pub fn push_integer(&mut self, value: i64) {
        let (arr, len) = encode_integer_stack(value);
        self.push_bytes(&arr[8 - len..]);
        self.push_length(len);
        self.push_tag(tag::universal::INTEGER);
    }

    /// Encode an INTEGER at a fixed 4-byte width from a u32.
    ///
    /// Request IDs use this deterministic encoding; values with the high bit
    /// set ride the wire as their two's-complement reinterpretation.
    pub fn push_request_id(&mut self, value: u32) {
        self.push_bytes(&value.to_be_bytes());
        self.push_length(4);
        self.push_tag(tag::universal::INTEGER);
    }

    /// Encode an INTEGER at a fixed 1-byte width from a u8.
    ///
    /// Used for the narrow PDU header fields (error-status, error-index,
    /// non-repeaters, max-repetitions).
    pub fn push_u8_field(&mut self, value: u8) {
        self.push_byte(value);
        self.push_length(1);
        self.push_tag(tag::universal::INTEGER);
    }

    /// Encode an unsigned 32-bit value with the given application tag.
    pub fn push_unsigned32(&mut self, tag: u8, value: u32) {
        self.push_unsigned64(tag, value as u64);
    }

    /// Encode an unsigned 64-bit value with the given application tag.
    pub fn push_unsigned64(&mut self, tag: u8, value: u64) {
        let (arr, len) = encode_unsigned_stack(value);
        self.push_bytes(&arr[9 - len..]);
        self.push_length(len);
        self.push_tag(tag);
    }

    /// Encode an OCTET STRING.
    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_bytes(data);
        self.push_length(data.len());
        self.push_tag(tag::universal::OCTET_STRING);
    }

    /// Encode a NULL.
    pub fn push_null(&mut self) {
        self.push_length(0);
        self.push_tag(tag::universal::NULL);
    }

    /// Encode a BOOLEAN.
    pub fn push_boolean(&mut self, value: bool) {
        self.push_byte(if value { 0xFF } else { 0x00 });
        self.push_length(1);
        self.push_tag(tag::universal::BOOLEAN);
    }

    /// Encode an OBJECT IDENTIFIER.
    pub fn push_oid(&mut self, oid: &crate::oid::Oid) {
        let ber = oid.to_ber_smallvec();
        self.push_bytes(&ber);
        self.push_length(ber.len());
        self.push_tag(tag::universal::OBJECT_IDENTIFIER);
    }

    /// Encode an IpAddress.
    pub fn push_ip_address(&mut self, addr: [u8; 4]) {
        self.push_bytes(&addr);
        self.push_length(4);
        self.push_tag(tag::application::IP_ADDRESS);
    }

    /// Finalize and return the encoded bytes in forward order.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }

    /// Finalize and return as `Vec<u8>`.
    pub fn finish_vec(mut self) -> Vec<u8> {
        self.buf.reverse();
        self.buf
    }
}

impl Default for EncodeBuf {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a signed 64-bit integer in minimal BER form.
///
/// Returns a stack array and the number of valid bytes; the valid bytes sit
/// at the end of the array for reverse-buffer compatibility.
#[inline]
fn encode_integer_stack(value: i64) -> ([u8; 8], usize) {
    let bytes = value.to_be_bytes();

    let mut start = 0;
    if value >= 0 {
        // Skip leading 0x00 bytes unless needed to keep the sign bit clear.
        while start < 7 && bytes[start] == 0 && bytes[start + 1] & 0x80 == 0 {
            start += 1;
        }
    } else {
        // Skip leading 0xFF bytes unless needed to keep the sign bit set.
        while start < 7 && bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0 {
            start += 1;
        }
    }

    (bytes, 8 - start)
}

/// Encode an unsigned 64-bit integer in minimal BER form.
///
/// A 0x00 guard byte is prepended when the leading significant byte has its
/// high bit set, so the value does not read back as negative.
#[inline]
fn encode_unsigned_stack(value: u64) -> ([u8; 9], usize) {
    if value == 0 {
        return ([0; 9], 1);
    }

    let bytes = value.to_be_bytes();
    let mut start = 0;

    while start < 7 && bytes[start] == 0 {
        start += 1;
    }

    let mut result = [0u8; 9];
    result[1..].copy_from_slice(&bytes);
    if bytes[start] & 0x80 != 0 {
        (result, 9 - start)
    } else {
        (result, 8 - start)
    }
}
