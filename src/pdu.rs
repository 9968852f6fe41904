//! SNMP Protocol Data Units.
//!
//! A [`Pdu`] is the operation payload of a message: the PDU type tag, the
//! request ID, two narrow header fields, and the varbind list. GETBULK
//! reuses the header slots: `non_repeaters` rides where error-status sits
//! and `max_repetitions` where error-index sits.

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::varbind::{VarBind, decode_varbind_list, encode_varbind_list};

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    GetRequest = 0xA0,
    GetNextRequest = 0xA1,
    Response = 0xA2,
    SetRequest = 0xA3,
    Trap = 0xA4,
    GetBulkRequest = 0xA5,
}

impl PduType {
    /// Create from the tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0xA0 => Some(Self::GetRequest),
            0xA1 => Some(Self::GetNextRequest),
            0xA2 => Some(Self::Response),
            0xA3 => Some(Self::SetRequest),
            0xA4 => Some(Self::Trap),
            0xA5 => Some(Self::GetBulkRequest),
            _ => None,
        }
    }

    /// Get the tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::GetNextRequest => write!(f, "GetNextRequest"),
            Self::Response => write!(f, "Response"),
            Self::SetRequest => write!(f, "SetRequest"),
            Self::Trap => write!(f, "Trap"),
            Self::GetBulkRequest => write!(f, "GetBulkRequest"),
        }
    }
}

/// SNMP PDU: header fields plus variable bindings.
///
/// One record serves every operation. For GETBULK the `non_repeaters` /
/// `max_repetitions` pair is encoded; for everything else the
/// `error_status` / `error_index` pair is. The session fills `request_id`
/// per transmission attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    /// PDU type.
    pub pdu_type: PduType,
    /// Request ID correlating requests and responses.
    pub request_id: u32,
    /// Error status (responses; zero in requests).
    pub error_status: u8,
    /// 1-based index of the varbind the error refers to.
    pub error_index: u8,
    /// GETBULK: how many leading OIDs get a single GETNEXT.
    pub non_repeaters: u8,
    /// GETBULK: maximum repetitions for the remaining OIDs.
    pub max_repetitions: u8,
    /// Variable bindings.
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    fn request(pdu_type: PduType, oids: &[Oid]) -> Self {
        Self {
            pdu_type,
            request_id: 0,
            error_status: 0,
            error_index: 0,
            non_repeaters: 0,
            max_repetitions: 0,
            varbinds: oids.iter().map(|oid| VarBind::null(oid.clone())).collect(),
        }
    }

    /// Create a GET request with NULL-valued varbinds.
    pub fn get_request(oids: &[Oid]) -> Self {
        Self::request(PduType::GetRequest, oids)
    }

    /// Create a GETNEXT request with NULL-valued varbinds.
    pub fn get_next_request(oids: &[Oid]) -> Self {
        Self::request(PduType::GetNextRequest, oids)
    }

    /// Create a SET request.
    pub fn set_request(varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::SetRequest,
            request_id: 0,
            error_status: 0,
            error_index: 0,
            non_repeaters: 0,
            max_repetitions: 0,
            varbinds,
        }
    }

    /// Create a GETBULK request.
    pub fn get_bulk_request(oids: &[Oid], non_repeaters: u8, max_repetitions: u8) -> Self {
        let mut pdu = Self::request(PduType::GetBulkRequest, oids);
        pdu.non_repeaters = non_repeaters;
        pdu.max_repetitions = max_repetitions;
        pdu
    }

    /// Create a response PDU (used by test fixtures and simulated agents).
    pub fn response(request_id: u32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id,
            error_status: 0,
            error_index: 0,
            non_repeaters: 0,
            max_repetitions: 0,
            varbinds,
        }
    }

    /// Check for a non-zero error status.
    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }

    /// Get the error status as an enum.
    pub fn error_status_enum(&self) -> ErrorStatus {
        ErrorStatus::from_u8(self.error_status)
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(self.pdu_type.tag(), |buf| {
            encode_varbind_list(buf, &self.varbinds);
            if self.pdu_type == PduType::GetBulkRequest {
                buf.push_u8_field(self.max_repetitions);
                buf.push_u8_field(self.non_repeaters);
            } else {
                buf.push_u8_field(self.error_index);
                buf.push_u8_field(self.error_status);
            }
            buf.push_request_id(self.request_id);
        });
    }

    /// Decode from BER.
    ///
    /// The PDU must span the remainder of the decoder's input exactly.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let tag = decoder.read_tag()?;
        let pdu_type = PduType::from_tag(tag).ok_or_else(|| {
            Error::decode(decoder.offset() - 1, DecodeErrorKind::UnsupportedPdu(tag))
        })?;

        let len = decoder.read_length()?;
        if len != decoder.remaining() {
            return Err(Error::decode(
                decoder.offset(),
                DecodeErrorKind::LengthMismatch {
                    declared: len,
                    actual: decoder.remaining(),
                },
            ));
        }
        let mut body = decoder.sub_decoder(len)?;

        let request_id = read_request_id(&mut body)?;

        let mut pdu = Pdu {
            pdu_type,
            request_id,
            error_status: 0,
            error_index: 0,
            non_repeaters: 0,
            max_repetitions: 0,
            varbinds: Vec::new(),
        };

        if pdu_type == PduType::GetBulkRequest {
            pdu.non_repeaters = read_u8_field(&mut body, "non-repeaters")?;
            pdu.max_repetitions = read_u8_field(&mut body, "max-repetitions")?;
        } else {
            pdu.error_status = read_u8_field(&mut body, "error-status")?;
            pdu.error_index = read_u8_field(&mut body, "error-index")?;
        }

        pdu.varbinds = decode_varbind_list(&mut body)?;
        Ok(pdu)
    }
}

/// Read the request ID, reinterpreting a two's-complement wire value.
///
/// The counter is encoded as a fixed 4-byte INTEGER, so values above 2^31
/// arrive looking negative. Anything outside the 4-byte range does not fit.
fn read_request_id(decoder: &mut Decoder) -> Result<u32> {
    let raw = decoder.read_integer()?;
    if (i32::MIN as i64..0).contains(&raw) {
        Ok(raw as u32)
    } else {
        u32::try_from(raw).map_err(|_| {
            Error::decode(
                decoder.offset(),
                DecodeErrorKind::ValueOutOfRange {
                    field: "request-id",
                },
            )
        })
    }
}

/// Read a narrow header field, accepting the width-1 two's-complement forms.
fn read_u8_field(decoder: &mut Decoder, field: &'static str) -> Result<u8> {
    let raw = decoder.read_integer()?;
    if (-128..=255).contains(&raw) {
        Ok(raw as u8)
    } else {
        Err(Error::decode(
            decoder.offset(),
            DecodeErrorKind::ValueOutOfRange { field },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::value::Value;

    fn roundtrip(pdu: &Pdu) -> Pdu {
        let mut buf = EncodeBuf::new();
        pdu.encode(&mut buf);
        let mut decoder = Decoder::new(buf.finish());
        Pdu::decode(&mut decoder).unwrap()
    }

    #[test]
    fn get_request_roundtrip() {
        let mut pdu = Pdu::get_request(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]);
        pdu.request_id = 12345;

        let decoded = roundtrip(&pdu);
        assert_eq!(decoded.pdu_type, PduType::GetRequest);
        assert_eq!(decoded.request_id, 12345);
        assert_eq!(decoded.varbinds.len(), 1);
        assert_eq!(decoded.varbinds[0].value, Value::Null);
    }

    #[test]
    fn getbulk_header_aliasing() {
        let mut pdu = Pdu::get_bulk_request(&[oid!(1, 3, 6, 1, 2, 1)], 2, 10);
        pdu.request_id = 7;

        let mut buf = EncodeBuf::new();
        pdu.encode(&mut buf);
        let bytes = buf.finish();

        // non_repeaters occupies the error-status slot, max_repetitions the
        // error-index slot.
        let request_id_tlv_end = 2 + 6;
        assert_eq!(
            &bytes[request_id_tlv_end..request_id_tlv_end + 6],
            &[0x02, 0x01, 0x02, 0x02, 0x01, 0x0A]
        );

        let mut decoder = Decoder::new(bytes);
        let decoded = Pdu::decode(&mut decoder).unwrap();
        assert_eq!(decoded.non_repeaters, 2);
        assert_eq!(decoded.max_repetitions, 10);
        assert_eq!(decoded.error_status, 0);
        assert_eq!(decoded.error_index, 0);
    }

    #[test]
    fn request_id_above_i32_roundtrip() {
        let mut pdu = Pdu::get_request(&[oid!(1, 3, 6)]);
        pdu.request_id = 0xFFFF_FFF0;

        let decoded = roundtrip(&pdu);
        assert_eq!(decoded.request_id, 0xFFFF_FFF0);
    }

    #[test]
    fn max_repetitions_above_127_roundtrip() {
        let mut pdu = Pdu::get_bulk_request(&[oid!(1, 3)], 0, 200);
        pdu.request_id = 1;

        let decoded = roundtrip(&pdu);
        assert_eq!(decoded.max_repetitions, 200);
    }

    #[test]
    fn header_field_out_of_range() {
        // Hand-build a response whose error-status is a 2-byte integer 999.
        let mut buf = EncodeBuf::new();
        buf.push_constructed(PduType::Response.tag(), |buf| {
            encode_varbind_list(buf, &[]);
            buf.push_u8_field(0);
            buf.push_integer(999);
            buf.push_request_id(1);
        });

        let mut decoder = Decoder::new(buf.finish());
        let err = Pdu::decode(&mut decoder).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::ValueOutOfRange {
                    field: "error-status"
                },
                ..
            }
        ));
    }

    #[test]
    fn unsupported_tag_byte() {
        let mut decoder = Decoder::from_slice(&[0xA7, 0x00]);
        let err = Pdu::decode(&mut decoder).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::UnsupportedPdu(0xA7),
                ..
            }
        ));
    }

    #[test]
    fn length_must_cover_remainder() {
        // Declared PDU length shorter than the frame.
        let mut buf = EncodeBuf::new();
        let mut pdu = Pdu::get_request(&[oid!(1, 3, 6)]);
        pdu.request_id = 1;
        pdu.encode(&mut buf);
        let mut bytes = buf.finish_vec();
        bytes.push(0x00);

        let mut decoder = Decoder::from_slice(&bytes);
        let err = Pdu::decode(&mut decoder).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::LengthMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn error_status_enum_mapping() {
        let mut pdu = Pdu::response(1, vec![]);
        pdu.error_status = 2;
        assert!(pdu.is_error());
        assert_eq!(pdu.error_status_enum(), ErrorStatus::NoSuchName);
    }
}
