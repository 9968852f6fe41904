//! Error types for snmp-client.
//!
//! - [`Error`] - the main error type for all library operations
//! - [`ErrorStatus`] - SNMP protocol errors returned by agents (RFC 3416)
//! - [`DecodeErrorKind`] / [`OidErrorKind`] - structured failure detail
//!
//! All enums are `#[non_exhaustive]` so variants can be added without
//! breaking changes.
//!
//! # Retry semantics
//!
//! The transaction engine distinguishes three classes of failure:
//!
//! - **Terminal**: [`Error::Marshal`] - the outbound packet could not be
//!   encoded, so resending is pointless.
//! - **Retried**: transport and decode failures, [`Error::OutOfOrderResponse`],
//!   and [`Error::EmptyResponse`] are recorded and the request is resent until
//!   the retry budget or the absolute deadline runs out. The last recorded
//!   error is what the caller ultimately sees.
//! - **Caller-surfaced**: [`Error::TooManyOids`], [`Error::UnsupportedSet`],
//!   [`Error::Agent`], and [`Error::WalkNotProgressing`] are returned
//!   immediately without touching the network (or, for the latter two, by the
//!   walk driver inspecting an otherwise valid response).

use std::net::SocketAddr;
use std::time::Duration;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// BER decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// Expected different tag.
    UnexpectedTag { expected: u8, actual: u8 },
    /// Data truncated unexpectedly.
    TruncatedData,
    /// Indefinite length not supported.
    IndefiniteLength,
    /// Length exceeds the receive buffer bound.
    LengthTooLarge { length: usize, max: usize },
    /// Length field claims more content than the input holds.
    LengthOverflow { length: usize, remaining: usize },
    /// Declared length disagrees with the enclosing frame.
    LengthMismatch { declared: usize, actual: usize },
    /// Zero-length integer.
    ZeroLengthInteger,
    /// Integer content wider than its destination type.
    IntegerTooLong { length: usize },
    /// Decoded integer does not fit the destination field.
    ValueOutOfRange { field: &'static str },
    /// OID subidentifier exceeds 64 bits.
    OidOverflow,
    /// OID has more arcs than allowed.
    OidTooLong { count: usize, max: usize },
    /// Unknown SNMP version.
    UnknownVersion(i64),
    /// PDU type outside the accepted incoming set.
    UnsupportedPdu(u8),
    /// Value tag outside the supported set.
    UnsupportedTag(u8),
    /// NULL (or an exception value) with non-zero length.
    InvalidNull,
    /// BOOLEAN with length other than 1.
    InvalidBoolean { length: usize },
    /// IpAddress with length other than 4.
    InvalidIpAddressLength { length: usize },
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::TruncatedData => write!(f, "unexpected end of data"),
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::LengthTooLarge { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::LengthOverflow { length, remaining } => {
                write!(f, "length {} but only {} bytes remain", length, remaining)
            }
            Self::LengthMismatch { declared, actual } => {
                write!(f, "declared length {} but frame holds {}", declared, actual)
            }
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::IntegerTooLong { length } => {
                write!(f, "integer too long: {} bytes", length)
            }
            Self::ValueOutOfRange { field } => {
                write!(f, "value does not fit {}", field)
            }
            Self::OidOverflow => write!(f, "OID subidentifier exceeds 64 bits"),
            Self::OidTooLong { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
            Self::UnknownVersion(v) => write!(f, "unknown SNMP version: {}", v),
            Self::UnsupportedPdu(t) => write!(f, "unsupported PDU type: 0x{:02X}", t),
            Self::UnsupportedTag(t) => write!(f, "unsupported value tag: 0x{:02X}", t),
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::InvalidBoolean { length } => {
                write!(f, "BOOLEAN must be 1 byte, got {}", length)
            }
            Self::InvalidIpAddressLength { length } => {
                write!(f, "IP address must be 4 bytes, got {}", length)
            }
        }
    }
}

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OidErrorKind {
    /// Empty OID string or empty dotted component.
    Empty,
    /// Arc is not a decimal integer (or exceeds 64 bits).
    InvalidArc,
    /// First arc must be 0, 1, or 2.
    InvalidFirstArc(u64),
    /// Second arc too large for the first arc value.
    InvalidSecondArc { first: u64, second: u64 },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID component"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1, or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => {
                write!(f, "second arc {} too large for first arc {}", second, first)
            }
        }
    }
}

/// SNMP protocol error status codes (RFC 3416).
///
/// Carried in the error-status field of a response PDU. The walk driver
/// surfaces a non-zero status through [`Error::Agent`]; callers of the plain
/// request operations inspect the status on the returned
/// [`Pdu`](crate::pdu::Pdu) themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    /// Operation completed successfully (0).
    NoError,
    /// Response would be too large for transport (1).
    TooBig,
    /// Requested OID not found (2, SNMPv1; v2c uses exception values).
    NoSuchName,
    /// Invalid value in SET (3).
    BadValue,
    /// Attempted write to a read-only object (4).
    ReadOnly,
    /// Unspecified error (5).
    GenErr,
    /// Object not accessible (6).
    NoAccess,
    /// SET value has wrong ASN.1 type (7).
    WrongType,
    /// SET value has incorrect length (8).
    WrongLength,
    /// SET value uses wrong encoding (9).
    WrongEncoding,
    /// SET value out of range (10).
    WrongValue,
    /// Object does not support row creation (11).
    NoCreation,
    /// Value inconsistent with other managed objects (12).
    InconsistentValue,
    /// Resource required for SET unavailable (13).
    ResourceUnavailable,
    /// SET commit phase failed (14).
    CommitFailed,
    /// SET undo phase failed (15).
    UndoFailed,
    /// Access denied (16).
    AuthorizationError,
    /// Object does not support modification (17).
    NotWritable,
    /// Named object cannot be created (18).
    InconsistentName,
    /// Unknown or future error status code.
    Unknown(u8),
}

impl ErrorStatus {
    /// Create from the raw status byte.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => Self::Unknown(other),
        }
    }

    /// Convert to the raw status byte.
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// The main error type for all snmp-client operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Socket open, write, or read failure.
    #[error("transport error{}: {source}", target.map(|t| format!(" communicating with {}", t)).unwrap_or_default())]
    Transport {
        target: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },

    /// The absolute deadline passed before a valid response arrived.
    #[error("timeout after {elapsed:?}{} ({retries} retries)", target.map(|t| format!(" waiting for {}", t)).unwrap_or_default())]
    Timeout {
        target: Option<SocketAddr>,
        elapsed: Duration,
        retries: u32,
        #[source]
        source: Option<Box<Error>>,
    },

    /// Outbound encoding failed. Never retried.
    #[error("marshal error")]
    Marshal {
        #[source]
        source: Box<Error>,
    },

    /// Inbound bytes violate BER structure or field constraints.
    #[error("decode error at offset {offset}: {kind}")]
    Decode {
        offset: usize,
        kind: DecodeErrorKind,
    },

    /// Invalid OID (string form or arc constraints).
    #[error("invalid OID{}: {kind}", input.as_deref().map(|s| format!(" {:?}", s)).unwrap_or_default())]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>,
    },

    /// Response carried a request ID this call never issued.
    #[error("out of order response: request ID {request_id} not issued by this call")]
    OutOfOrderResponse { request_id: u32 },

    /// Response carried zero variable bindings.
    #[error("empty response{}", target.map(|t| format!(" from {}", t)).unwrap_or_default())]
    EmptyResponse { target: Option<SocketAddr> },

    /// Non-zero SNMP error-status in a response.
    #[error("SNMP error{}: {status} at index {index}", target.map(|t| format!(" from {}", t)).unwrap_or_default())]
    Agent {
        target: Option<SocketAddr>,
        status: ErrorStatus,
        index: u8,
    },

    /// Request exceeded the per-request OID limit.
    #[error("too many OIDs: {count} exceeds maximum {max}")]
    TooManyOids { count: usize, max: usize },

    /// SET request shape outside the supported contract.
    #[error("unsupported SET: {reason}")]
    UnsupportedSet { reason: &'static str },

    /// Walk received an OID that does not advance past the cursor.
    #[error("walk not progressing: {current} does not advance past {previous}")]
    WalkNotProgressing {
        previous: crate::oid::Oid,
        current: crate::oid::Oid,
    },
}

impl Error {
    /// Create a decode error.
    pub fn decode(offset: usize, kind: DecodeErrorKind) -> Self {
        Self::Decode { offset, kind }
    }

    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Wrap an encoding failure as a terminal marshal error.
    pub fn marshal(source: Error) -> Self {
        Self::Marshal {
            source: Box::new(source),
        }
    }

    /// Get the target address if this error has one.
    pub fn target(&self) -> Option<SocketAddr> {
        match self {
            Self::Transport { target, .. } => *target,
            Self::Timeout { target, .. } => *target,
            Self::EmptyResponse { target } => *target,
            Self::Agent { target, .. } => *target,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_roundtrip() {
        for code in 0..=18u8 {
            assert_eq!(ErrorStatus::from_u8(code).as_u8(), code);
        }
        assert_eq!(ErrorStatus::from_u8(42), ErrorStatus::Unknown(42));
        assert_eq!(ErrorStatus::Unknown(42).as_u8(), 42);
    }

    #[test]
    fn error_status_display() {
        assert_eq!(ErrorStatus::NoSuchName.to_string(), "noSuchName");
        assert_eq!(ErrorStatus::Unknown(99).to_string(), "unknown(99)");
    }

    #[test]
    fn timeout_carries_last_error() {
        let inner = Error::Transport {
            target: None,
            source: std::io::Error::from(std::io::ErrorKind::TimedOut),
        };
        let err = Error::Timeout {
            target: None,
            elapsed: Duration::from_secs(2),
            retries: 3,
            source: Some(Box::new(inner)),
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
