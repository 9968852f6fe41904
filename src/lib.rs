// Allow large error types - the Error enum carries OIDs inline for debugging
// convenience. Boxing them would add allocations for a marginal size win.
#![allow(clippy::result_large_err)]

//! # snmp-client
//!
//! SNMPv1/v2c management client over UDP: a byte-exact BER codec, a
//! retrying request/response transaction engine, and subtree walks.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use snmp_client::{Session, oid};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> snmp_client::Result<()> {
//!     let session = Session::builder("192.168.1.1")
//!         .community("public")
//!         .timeout(Duration::from_secs(2))
//!         .connect()
//!         .await?;
//!
//!     // Single GET
//!     let response = session.get(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]).await?;
//!     println!("sysDescr: {}", response.varbinds[0].value);
//!
//!     // Walk the system subtree
//!     session
//!         .walk(&oid!(1, 3, 6, 1, 2, 1, 1), |vb| {
//!             println!("{}", vb);
//!             Ok(())
//!         })
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! - One session per agent; one request in flight at a time. Parallelism is
//!   independent sessions.
//! - The total timeout is split evenly over `retries + 1` attempts; a late
//!   reply to an earlier attempt of the same call is accepted.
//! - The codec is synchronous and zero-copy on the decode path; only
//!   transport send/receive suspend.
//! - Logging goes through [`tracing`]; the library installs no subscriber
//!   and holds no global state.

pub mod ber;
pub mod client;
pub mod error;
pub mod helpers;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod transport;
pub mod value;
pub mod varbind;
pub mod version;

// Re-exports for convenience
pub use client::{MAX_OIDS, Session, SessionBuilder, SessionConfig};
pub use error::{DecodeErrorKind, Error, ErrorStatus, OidErrorKind, Result};
pub use message::CommunityMessage;
pub use oid::Oid;
pub use pdu::{Pdu, PduType};
pub use transport::{MockTransport, Transport, UdpTransport};
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;
