//! SNMP value types.
//!
//! [`Value`] is the tagged union carried by a varbind. The variant implies
//! the wire tag; decoding dispatches on the tag byte and encoding is total
//! on the variant. Tags outside the supported set are a decode error, not a
//! passthrough.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// SNMP value.
///
/// Covers the ASN.1 primitives and SMI application types that appear in
/// varbinds, plus the SNMPv2c exception values.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// BOOLEAN (rare on the wire, kept for completeness)
    Boolean(bool),

    /// INTEGER (signed, stored widened to 64 bits)
    Integer(i64),

    /// OCTET STRING (arbitrary bytes)
    OctetString(Bytes),

    /// NULL (the placeholder value in request varbinds)
    Null,

    /// OBJECT IDENTIFIER
    ObjectIdentifier(Oid),

    /// ObjectDescription (legacy textual type, raw bytes)
    ObjectDescription(Bytes),

    /// IpAddress (4 bytes, network order)
    IpAddress([u8; 4]),

    /// Counter32 (unsigned 32-bit, wrapping)
    Counter32(u32),

    /// Gauge32 (unsigned 32-bit, non-wrapping)
    Gauge32(u32),

    /// TimeTicks (hundredths of seconds)
    TimeTicks(u32),

    /// Opaque (legacy, arbitrary bytes)
    Opaque(Bytes),

    /// Counter64 (unsigned 64-bit, wrapping; SNMPv2c only)
    Counter64(u64),

    /// Uinteger32 (unsigned 32-bit, RFC 1442 legacy tag)
    Uinteger32(u32),

    /// noSuchObject exception: the OID is not in the agent's MIB.
    NoSuchObject,

    /// noSuchInstance exception: the object exists but the instance does not.
    NoSuchInstance,

    /// endOfMibView exception: nothing lexicographically after the request.
    ///
    /// The normal termination condition for walks.
    EndOfMibView,
}

impl Value {
    /// The wire tag byte for this variant.
    pub fn tag(&self) -> u8 {
        match self {
            Value::Boolean(_) => tag::universal::BOOLEAN,
            Value::Integer(_) => tag::universal::INTEGER,
            Value::OctetString(_) => tag::universal::OCTET_STRING,
            Value::Null => tag::universal::NULL,
            Value::ObjectIdentifier(_) => tag::universal::OBJECT_IDENTIFIER,
            Value::ObjectDescription(_) => tag::universal::OBJECT_DESCRIPTION,
            Value::IpAddress(_) => tag::application::IP_ADDRESS,
            Value::Counter32(_) => tag::application::COUNTER32,
            Value::Gauge32(_) => tag::application::GAUGE32,
            Value::TimeTicks(_) => tag::application::TIMETICKS,
            Value::Opaque(_) => tag::application::OPAQUE,
            Value::Counter64(_) => tag::application::COUNTER64,
            Value::Uinteger32(_) => tag::application::UINTEGER32,
            Value::NoSuchObject => tag::context::NO_SUCH_OBJECT,
            Value::NoSuchInstance => tag::context::NO_SUCH_INSTANCE,
            Value::EndOfMibView => tag::context::END_OF_MIB_VIEW,
        }
    }

    /// Try to get as i64 (Integer only).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u32.
    ///
    /// Succeeds for the 32-bit application types and non-negative integers
    /// in range.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) | Value::Uinteger32(v) => {
                Some(*v)
            }
            Value::Integer(v) => u32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Counter64(v) => Some(*v),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) | Value::Uinteger32(v) => {
                Some(*v as u64)
            }
            Value::Integer(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to get as bytes (OctetString, Opaque, ObjectDescription).
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(v) | Value::Opaque(v) | Value::ObjectDescription(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as a UTF-8 string.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Try to get as an OID.
    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    /// Try to get as an IPv4 address.
    pub fn as_ip(&self) -> Option<std::net::Ipv4Addr> {
        match self {
            Value::IpAddress(bytes) => Some(std::net::Ipv4Addr::from(*bytes)),
            _ => None,
        }
    }

    /// Check if this is an exception value.
    ///
    /// Exception values terminate walks.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Boolean(v) => buf.push_boolean(*v),
            Value::Integer(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::ObjectDescription(data) => {
                buf.push_bytes(data);
                buf.push_length(data.len());
                buf.push_tag(tag::universal::OBJECT_DESCRIPTION);
            }
            Value::IpAddress(addr) => buf.push_ip_address(*addr),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::Opaque(data) => {
                buf.push_bytes(data);
                buf.push_length(data.len());
                buf.push_tag(tag::application::OPAQUE);
            }
            Value::Counter64(v) => buf.push_unsigned64(tag::application::COUNTER64, *v),
            Value::Uinteger32(v) => buf.push_unsigned32(tag::application::UINTEGER32, *v),
            Value::NoSuchObject => {
                buf.push_length(0);
                buf.push_tag(tag::context::NO_SUCH_OBJECT);
            }
            Value::NoSuchInstance => {
                buf.push_length(0);
                buf.push_tag(tag::context::NO_SUCH_INSTANCE);
            }
            Value::EndOfMibView => {
                buf.push_length(0);
                buf.push_tag(tag::context::END_OF_MIB_VIEW);
            }
        }
    }

    /// Decode from BER, dispatching on the tag byte.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let tag = decoder.read_tag()?;
        let len = decoder.read_length()?;

        match tag {
            tag::universal::BOOLEAN => {
                if len != 1 {
                    return Err(Error::decode(
                        decoder.offset(),
                        DecodeErrorKind::InvalidBoolean { length: len },
                    ));
                }
                let byte = decoder.read_byte()?;
                Ok(Value::Boolean(byte != 0))
            }
            tag::universal::INTEGER => {
                let value = decoder.read_integer_value(len)?;
                Ok(Value::Integer(value))
            }
            tag::universal::OCTET_STRING => {
                let data = decoder.read_bytes(len)?;
                Ok(Value::OctetString(data))
            }
            tag::universal::NULL => {
                if len != 0 {
                    return Err(Error::decode(decoder.offset(), DecodeErrorKind::InvalidNull));
                }
                Ok(Value::Null)
            }
            tag::universal::OBJECT_IDENTIFIER => {
                let oid = decoder.read_oid_value(len)?;
                Ok(Value::ObjectIdentifier(oid))
            }
            tag::universal::OBJECT_DESCRIPTION => {
                let data = decoder.read_bytes(len)?;
                Ok(Value::ObjectDescription(data))
            }
            tag::application::IP_ADDRESS => {
                if len != 4 {
                    return Err(Error::decode(
                        decoder.offset(),
                        DecodeErrorKind::InvalidIpAddressLength { length: len },
                    ));
                }
                let data = decoder.read_bytes(4)?;
                Ok(Value::IpAddress([data[0], data[1], data[2], data[3]]))
            }
            tag::application::COUNTER32 => {
                Ok(Value::Counter32(decoder.read_unsigned32_value(len)?))
            }
            tag::application::GAUGE32 => Ok(Value::Gauge32(decoder.read_unsigned32_value(len)?)),
            tag::application::TIMETICKS => {
                Ok(Value::TimeTicks(decoder.read_unsigned32_value(len)?))
            }
            tag::application::OPAQUE => {
                let data = decoder.read_bytes(len)?;
                Ok(Value::Opaque(data))
            }
            tag::application::COUNTER64 => {
                Ok(Value::Counter64(decoder.read_unsigned64_value(len)?))
            }
            tag::application::UINTEGER32 => {
                Ok(Value::Uinteger32(decoder.read_unsigned32_value(len)?))
            }
            tag::context::NO_SUCH_OBJECT => {
                if len != 0 {
                    return Err(Error::decode(decoder.offset(), DecodeErrorKind::InvalidNull));
                }
                Ok(Value::NoSuchObject)
            }
            tag::context::NO_SUCH_INSTANCE => {
                if len != 0 {
                    return Err(Error::decode(decoder.offset(), DecodeErrorKind::InvalidNull));
                }
                Ok(Value::NoSuchInstance)
            }
            tag::context::END_OF_MIB_VIEW => {
                if len != 0 {
                    return Err(Error::decode(decoder.offset(), DecodeErrorKind::InvalidNull));
                }
                Ok(Value::EndOfMibView)
            }
            other => {
                tracing::debug!(target: "snmp_client::ber", tag = other, "unsupported value tag");
                Err(Error::decode(
                    decoder.offset(),
                    DecodeErrorKind::UnsupportedTag(other),
                ))
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) | Value::ObjectDescription(data) => {
                if let Ok(s) = std::str::from_utf8(data) {
                    write!(f, "{}", s)
                } else {
                    write!(f, "0x{}", hex(data))
                }
            }
            Value::Null => write!(f, "NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(addr) => {
                write!(f, "{}.{}.{}.{}", addr[0], addr[1], addr[2], addr[3])
            }
            Value::Counter32(v) => write!(f, "{}", v),
            Value::Gauge32(v) => write!(f, "{}", v),
            Value::TimeTicks(v) => {
                let secs = v / 100;
                let days = secs / 86400;
                let hours = (secs % 86400) / 3600;
                let mins = (secs % 3600) / 60;
                let s = secs % 60;
                write!(f, "{}d {}h {}m {}s", days, hours, mins, s)
            }
            Value::Opaque(data) => write!(f, "Opaque(0x{})", hex(data)),
            Value::Counter64(v) => write!(f, "{}", v),
            Value::Uinteger32(v) => write!(f, "{}", v),
            Value::NoSuchObject => write!(f, "noSuchObject"),
            Value::NoSuchInstance => write!(f, "noSuchInstance"),
            Value::EndOfMibView => write!(f, "endOfMibView"),
        }
    }
}

fn hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Counter64(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::OctetString(Bytes::from(s))
    }
}

impl From<&[u8]> for Value {
    fn from(data: &[u8]) -> Self {
        Value::OctetString(Bytes::copy_from_slice(data))
    }
}

impl From<Bytes> for Value {
    fn from(data: Bytes) -> Self {
        Value::OctetString(data)
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}

impl From<std::net::Ipv4Addr> for Value {
    fn from(addr: std::net::Ipv4Addr) -> Self {
        Value::IpAddress(addr.octets())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn roundtrip(value: Value) -> Value {
        let mut buf = EncodeBuf::new();
        value.encode(&mut buf);
        let bytes = buf.finish();
        let mut decoder = Decoder::new(bytes);
        Value::decode(&mut decoder).unwrap()
    }

    #[test]
    fn roundtrip_all_variants() {
        let values = [
            Value::Boolean(true),
            Value::Integer(-42),
            Value::Integer(i64::MAX),
            Value::OctetString(Bytes::from_static(b"hello")),
            Value::Null,
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 2, 1)),
            Value::ObjectDescription(Bytes::from_static(b"desc")),
            Value::IpAddress([192, 168, 1, 1]),
            Value::Counter32(u32::MAX),
            Value::Gauge32(1_000_000_000),
            Value::TimeTicks(123456),
            Value::Opaque(Bytes::from_static(&[0xDE, 0xAD])),
            Value::Counter64(u64::MAX),
            Value::Uinteger32(7),
            Value::NoSuchObject,
            Value::NoSuchInstance,
            Value::EndOfMibView,
        ];

        for value in values {
            assert_eq!(roundtrip(value.clone()), value, "roundtrip of {:?}", value);
        }
    }

    #[test]
    fn variant_tags() {
        assert_eq!(Value::Boolean(true).tag(), 0x01);
        assert_eq!(Value::Integer(0).tag(), 0x02);
        assert_eq!(Value::Null.tag(), 0x05);
        assert_eq!(Value::IpAddress([0; 4]).tag(), 0x40);
        assert_eq!(Value::Counter32(0).tag(), 0x41);
        assert_eq!(Value::Counter64(0).tag(), 0x46);
        assert_eq!(Value::Uinteger32(0).tag(), 0x47);
        assert_eq!(Value::NoSuchObject.tag(), 0x80);
        assert_eq!(Value::EndOfMibView.tag(), 0x82);
    }

    #[test]
    fn unsupported_tag_rejected() {
        // NsapAddress (0x45) is carried in the tag table but has no codec.
        let mut decoder = Decoder::from_slice(&[0x45, 0x02, 0x01, 0x02]);
        let err = Value::decode(&mut decoder).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::UnsupportedTag(0x45),
                ..
            }
        ));

        // BitString (0x03) likewise.
        let mut decoder = Decoder::from_slice(&[0x03, 0x01, 0x00]);
        assert!(Value::decode(&mut decoder).is_err());
    }

    #[test]
    fn exception_with_payload_rejected() {
        let mut decoder = Decoder::from_slice(&[0x82, 0x01, 0x00]);
        assert!(Value::decode(&mut decoder).is_err());
    }

    #[test]
    fn boolean_wire_form() {
        let mut decoder = Decoder::from_slice(&[0x01, 0x01, 0x00]);
        assert_eq!(Value::decode(&mut decoder).unwrap(), Value::Boolean(false));

        let mut decoder = Decoder::from_slice(&[0x01, 0x01, 0x01]);
        assert_eq!(Value::decode(&mut decoder).unwrap(), Value::Boolean(true));

        let mut decoder = Decoder::from_slice(&[0x01, 0x02, 0x00, 0x00]);
        assert!(Value::decode(&mut decoder).is_err());
    }

    #[test]
    fn ip_address_length_checked() {
        let mut decoder = Decoder::from_slice(&[0x40, 0x03, 0x0A, 0x00, 0x00]);
        let err = Value::decode(&mut decoder).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::InvalidIpAddressLength { length: 3 },
                ..
            }
        ));
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::Integer(-1).as_i64(), Some(-1));
        assert_eq!(Value::Integer(-1).as_u32(), None);
        assert_eq!(Value::Counter32(9).as_u32(), Some(9));
        assert_eq!(Value::Counter64(9).as_u64(), Some(9));
        assert_eq!(Value::Uinteger32(9).as_u32(), Some(9));
        assert_eq!(
            Value::OctetString(Bytes::from_static(b"x")).as_str(),
            Some("x")
        );
        assert_eq!(
            Value::IpAddress([10, 0, 0, 1]).as_ip(),
            Some(std::net::Ipv4Addr::new(10, 0, 0, 1))
        );
        assert!(Value::EndOfMibView.is_exception());
        assert!(!Value::Null.is_exception());
    }

    #[test]
    fn display_strings() {
        assert_eq!(Value::Integer(5).to_string(), "5");
        assert_eq!(
            Value::OctetString(Bytes::from_static(b"router1")).to_string(),
            "router1"
        );
        assert_eq!(Value::NoSuchObject.to_string(), "noSuchObject");
        assert_eq!(Value::IpAddress([10, 1, 2, 3]).to_string(), "10.1.2.3");
    }
}
