//! Community-based SNMP message format (v1/v2c).
//!
//! Both versions share the same structure:
//! `SEQUENCE { version INTEGER, community OCTET STRING, pdu PDU }`.
//! Only the version number differs (0 for v1, 1 for v2c).

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::pdu::{Pdu, PduType};
use crate::version::Version;
use bytes::Bytes;

/// PDU types accepted in an incoming message.
///
/// A management client expects responses; GetNext and GetBulk requests are
/// also parsed so scripted/loopback frames decode, everything else is
/// rejected before the PDU body is touched.
const ACCEPTED_INCOMING: [PduType; 3] = [
    PduType::Response,
    PduType::GetNextRequest,
    PduType::GetBulkRequest,
];

/// Community-authenticated SNMP message (v1/v2c).
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityMessage {
    /// SNMP version.
    pub version: Version,
    /// Community string.
    pub community: Bytes,
    /// Protocol data unit.
    pub pdu: Pdu,
}

impl CommunityMessage {
    /// Create a new community message.
    pub fn new(version: Version, community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self {
            version,
            community: community.into(),
            pdu,
        }
    }

    /// Create a v1 message.
    pub fn v1(community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self::new(Version::V1, community, pdu)
    }

    /// Create a v2c message.
    pub fn v2c(community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self::new(Version::V2c, community, pdu)
    }

    /// Encode to BER.
    ///
    /// Validates every varbind OID first; a violation surfaces as the
    /// terminal [`Error::Marshal`].
    pub fn encode(&self) -> Result<Bytes> {
        for vb in &self.pdu.varbinds {
            vb.oid.validate().map_err(Error::marshal)?;
        }

        let mut buf = EncodeBuf::new();
        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.community);
            buf.push_integer(self.version.as_i64());
        });

        Ok(buf.finish())
    }

    /// Decode from BER.
    ///
    /// The outer SEQUENCE must span the input exactly: trailing bytes and
    /// truncated frames are rejected, as is any PDU type outside the
    /// accepted incoming set.
    pub fn decode(data: Bytes) -> Result<Self> {
        let mut decoder = Decoder::new(data);

        let declared = decoder.expect_tag(tag::universal::SEQUENCE)?;
        if declared != decoder.remaining() {
            tracing::debug!(
                target: "snmp_client::ber",
                declared,
                actual = decoder.remaining(),
                "message length mismatch"
            );
            return Err(Error::decode(
                decoder.offset(),
                DecodeErrorKind::LengthMismatch {
                    declared,
                    actual: decoder.remaining(),
                },
            ));
        }

        let version_num = decoder.read_integer()?;
        let version = Version::from_i64(version_num).ok_or_else(|| {
            Error::decode(
                decoder.offset(),
                DecodeErrorKind::UnknownVersion(version_num),
            )
        })?;

        let community = decoder.read_octet_string()?;

        match decoder.peek_tag() {
            Some(tag) if PduType::from_tag(tag).is_some_and(|t| ACCEPTED_INCOMING.contains(&t)) => {}
            Some(tag) => {
                tracing::debug!(target: "snmp_client::ber", tag, "unsupported incoming PDU type");
                return Err(Error::decode(
                    decoder.offset(),
                    DecodeErrorKind::UnsupportedPdu(tag),
                ));
            }
            None => {
                return Err(Error::decode(
                    decoder.offset(),
                    DecodeErrorKind::TruncatedData,
                ));
            }
        }

        let pdu = Pdu::decode(&mut decoder)?;

        Ok(CommunityMessage {
            version,
            community,
            pdu,
        })
    }
}
