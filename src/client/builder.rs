//! Session builder.

use super::{Session, SessionConfig};
use crate::error::{Error, Result};
use crate::transport::UdpTransport;
use crate::version::Version;
use bytes::Bytes;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

/// Builder for [`Session`].
///
/// The target is a host name or IP address; the port rides separately and
/// defaults to 161.
///
/// # Example
///
/// ```rust,no_run
/// use snmp_client::{Session, Version};
/// use std::time::Duration;
///
/// # async fn example() -> snmp_client::Result<()> {
/// let session = Session::builder("router.example.net")
///     .community("private")
///     .version(Version::V1)
///     .timeout(Duration::from_secs(5))
///     .retries(1)
///     .connect()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    target: String,
    config: SessionConfig,
}

impl SessionBuilder {
    /// Create a builder for the given target host.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            config: SessionConfig::default(),
        }
    }

    /// Set the UDP port (default: 161).
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the community string (default: "public").
    pub fn community(mut self, community: impl Into<Bytes>) -> Self {
        self.config.community = community.into();
        self
    }

    /// Set the SNMP version (default: V2c).
    pub fn version(mut self, version: Version) -> Self {
        self.config.version = version;
        self
    }

    /// Set the total request timeout including retries (default: 2 s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the number of retransmissions after the first attempt (default: 3).
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the GETBULK max-repetitions used by bulk walks (default: 50).
    pub fn max_repetitions(mut self, max_repetitions: u8) -> Self {
        self.config.max_repetitions = max_repetitions;
        self
    }

    /// Set the GETBULK non-repeaters used by bulk walks (default: 0).
    pub fn non_repeaters(mut self, non_repeaters: u8) -> Self {
        self.config.non_repeaters = non_repeaters;
        self
    }

    /// Resolve the target and open the session.
    pub async fn connect(self) -> Result<Session<UdpTransport>> {
        let addr = self.resolve().await?;
        Session::connect(addr, self.config).await
    }

    async fn resolve(&self) -> Result<SocketAddr> {
        let mut addrs = tokio::net::lookup_host((self.target.as_str(), self.config.port))
            .await
            .map_err(|e| Error::Transport {
                target: None,
                source: e,
            })?;

        addrs.next().ok_or_else(|| Error::Transport {
            target: None,
            source: io::Error::new(
                io::ErrorKind::NotFound,
                format!("no addresses for {}", self.target),
            ),
        })
    }
}
