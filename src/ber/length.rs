//! BER length encoding and decoding.
//!
//! Definite form only (X.690 Section 8.1.3): short form for 0-127, long form
//! `0x80 | n` followed by n big-endian octets otherwise. The indefinite form
//! (a bare 0x80) is rejected.

use crate::error::{DecodeErrorKind, Error, Result};
use smallvec::SmallVec;

/// Maximum length we'll accept.
///
/// A response datagram is read into a 65536-byte buffer, so no well-formed
/// TLV inside it can declare more content than this.
pub const MAX_LENGTH: usize = 65536;

/// Encode a length value in minimal definite form, in wire order.
pub fn encode_length(len: usize) -> SmallVec<[u8; 5]> {
    let mut out = SmallVec::new();

    if len < 0x80 {
        out.push(len as u8);
        return out;
    }

    // Octet count from the bit length; len >= 0x80 so at least one.
    let octets = ((usize::BITS - len.leading_zeros()) as usize).div_ceil(8);
    out.push(0x80 | octets as u8);
    for shift in (0..octets).rev() {
        out.push((len >> (shift * 8)) as u8);
    }

    out
}

/// Decode a length, returning `(length, header_byte_count)`.
///
/// Non-minimal long forms are accepted (X.690 8.1.3.5 Note 2). `base_offset`
/// is used to report error offsets correctly when called from within a
/// decoder.
pub fn decode_length(data: &[u8], base_offset: usize) -> Result<(usize, usize)> {
    let first = *data
        .first()
        .ok_or_else(|| Error::decode(base_offset, DecodeErrorKind::TruncatedData))?;

    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }

    let count = (first & 0x7F) as usize;
    if count == 0 {
        // A bare 0x80 is the indefinite form.
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::IndefiniteLength,
        ));
    }

    let octets = data
        .get(1..1 + count)
        .ok_or_else(|| Error::decode(base_offset, DecodeErrorKind::TruncatedData))?;

    let mut length: usize = 0;
    for &octet in octets {
        length = length * 256 + usize::from(octet);
        // Capping inside the fold keeps any octet count safe, minimal or not.
        if length > MAX_LENGTH {
            return Err(Error::decode(
                base_offset,
                DecodeErrorKind::LengthTooLarge {
                    length,
                    max: MAX_LENGTH,
                },
            ));
        }
    }

    Ok((length, 1 + count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form() {
        assert_eq!(decode_length(&[0], 0).unwrap(), (0, 1));
        assert_eq!(decode_length(&[1], 0).unwrap(), (1, 1));
        assert_eq!(decode_length(&[127], 0).unwrap(), (127, 1));
    }

    #[test]
    fn long_form() {
        assert_eq!(decode_length(&[0x81, 128], 0).unwrap(), (128, 2));
        assert_eq!(decode_length(&[0x81, 255], 0).unwrap(), (255, 2));
        assert_eq!(decode_length(&[0x82, 0x01, 0x00], 0).unwrap(), (256, 3));
        assert_eq!(decode_length(&[0x82, 0xFF, 0xFF], 0).unwrap(), (65535, 3));
    }

    #[test]
    fn indefinite_rejected() {
        let err = decode_length(&[0x80], 0).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::IndefiniteLength,
                ..
            }
        ));
    }

    #[test]
    fn truncated_long_form() {
        assert!(decode_length(&[0x82, 0x01], 0).is_err());
        assert!(decode_length(&[], 0).is_err());
    }

    #[test]
    fn encode_short() {
        assert_eq!(&encode_length(0)[..], &[0]);
        assert_eq!(&encode_length(42)[..], &[42]);
        assert_eq!(&encode_length(127)[..], &[127]);
    }

    #[test]
    fn encode_long() {
        assert_eq!(&encode_length(128)[..], &[0x81, 0x80]);
        assert_eq!(&encode_length(255)[..], &[0x81, 0xFF]);
        assert_eq!(&encode_length(256)[..], &[0x82, 0x01, 0x00]);
        assert_eq!(&encode_length(65535)[..], &[0x82, 0xFF, 0xFF]);
        assert_eq!(&encode_length(65536)[..], &[0x83, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn non_minimal_accepted() {
        assert_eq!(decode_length(&[0x82, 0x00, 0x05], 0).unwrap(), (5, 3));
        assert_eq!(decode_length(&[0x81, 0x01], 0).unwrap(), (1, 2));
        assert_eq!(
            decode_length(&[0x84, 0x00, 0x00, 0x00, 0x7F], 0).unwrap(),
            (127, 5)
        );
    }

    #[test]
    fn max_length_enforced() {
        // Exactly MAX_LENGTH decodes.
        assert_eq!(
            decode_length(&[0x83, 0x01, 0x00, 0x00], 0).unwrap(),
            (MAX_LENGTH, 4)
        );

        // One past fails.
        let err = decode_length(&[0x83, 0x01, 0x00, 0x01], 0).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::LengthTooLarge { .. },
                ..
            }
        ));
    }

    #[test]
    fn roundtrip_minimal_header() {
        for n in [0usize, 1, 42, 127, 128, 255, 256, 65535, 65536] {
            let encoded = encode_length(n);
            let (decoded, consumed) = decode_length(&encoded, 0).unwrap();
            assert_eq!(decoded, n);
            assert_eq!(consumed, encoded.len());
        }
    }
}
