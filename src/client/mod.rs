//! SNMP session: request construction and the transaction engine.

mod builder;
mod walk;

pub use builder::SessionBuilder;

use crate::error::{Error, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::transport::{Transport, UdpTransport};
use crate::value::Value;
use crate::varbind::VarBind;
use crate::version::Version;
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Maximum number of OIDs allowed in a single request.
pub const MAX_OIDS: usize = 60;

/// Receive buffer size. Oversize datagrams are truncated by the transport
/// and fail unmarshalling.
const RX_BUF_SIZE: usize = 65536;

/// Session configuration.
///
/// Most users go through [`Session::builder`].
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// UDP port (default: 161).
    pub port: u16,
    /// Community string (default: "public").
    pub community: Bytes,
    /// SNMP version (default: V2c).
    pub version: Version,
    /// Total time budget for one request including retries (default: 2 s).
    pub timeout: Duration,
    /// Number of retransmissions after the first attempt (default: 3).
    pub retries: u32,
    /// GETBULK max-repetitions used by bulk walks (default: 50).
    pub max_repetitions: u8,
    /// GETBULK non-repeaters used by bulk walks (default: 0).
    pub non_repeaters: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            port: 161,
            community: Bytes::from_static(b"public"),
            version: Version::V2c,
            timeout: Duration::from_secs(2),
            retries: 3,
            max_repetitions: 50,
            non_repeaters: 0,
        }
    }
}

/// SNMP client session.
///
/// A session owns its transport and keeps one request in flight at a time.
/// Request IDs come from an atomic counter seeded with a random value at
/// construction, so they are monotonically increasing (mod 2^32) and unique
/// within any one call's retry window. Callers wanting parallelism construct
/// independent sessions.
pub struct Session<T: Transport = UdpTransport> {
    transport: T,
    config: SessionConfig,
    request_id: AtomicU32,
}

impl Session<UdpTransport> {
    /// Start building a session for the given target host.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use snmp_client::{Session, oid};
    /// use std::time::Duration;
    ///
    /// # async fn example() -> snmp_client::Result<()> {
    /// let session = Session::builder("192.0.2.1")
    ///     .community("public")
    ///     .timeout(Duration::from_secs(2))
    ///     .connect()
    ///     .await?;
    ///
    /// let response = session.get(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]).await?;
    /// println!("sysDescr: {}", response.varbinds[0].value);
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(target: impl Into<String>) -> SessionBuilder {
        SessionBuilder::new(target)
    }

    /// Open a UDP session to a resolved target address.
    pub async fn connect(target: SocketAddr, config: SessionConfig) -> Result<Self> {
        let transport = UdpTransport::connect(target).await?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> Session<T> {
    /// Create a session over an existing transport.
    pub fn with_transport(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            request_id: AtomicU32::new(rand::random()),
        }
    }

    /// The peer (agent) address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.transport.peer_addr()
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Send a GET for the given OIDs and return the parsed response.
    ///
    /// Each varbind in the request carries a NULL value. The response's
    /// error-status is returned as-is for the caller to inspect.
    pub async fn get(&self, oids: &[Oid]) -> Result<Pdu> {
        self.check_oid_count(oids)?;
        tracing::debug!(
            target: "snmp_client::client",
            peer = %self.peer_addr(),
            oid_count = oids.len(),
            "sending GetRequest"
        );
        self.transact(Pdu::get_request(oids)).await
    }

    /// Send a GETNEXT for the given OIDs and return the parsed response.
    pub async fn get_next(&self, oids: &[Oid]) -> Result<Pdu> {
        self.check_oid_count(oids)?;
        tracing::debug!(
            target: "snmp_client::client",
            peer = %self.peer_addr(),
            oid_count = oids.len(),
            "sending GetNextRequest"
        );
        self.transact(Pdu::get_next_request(oids)).await
    }

    /// Send a GETBULK (v2c) and return the parsed response.
    ///
    /// The first `non_repeaters` OIDs are treated as single GETNEXTs; each
    /// remaining OID yields up to `max_repetitions` successors.
    pub async fn get_bulk(
        &self,
        oids: &[Oid],
        non_repeaters: u8,
        max_repetitions: u8,
    ) -> Result<Pdu> {
        self.check_oid_count(oids)?;
        tracing::debug!(
            target: "snmp_client::client",
            peer = %self.peer_addr(),
            oid_count = oids.len(),
            non_repeaters,
            max_repetitions,
            "sending GetBulkRequest"
        );
        self.transact(Pdu::get_bulk_request(oids, non_repeaters, max_repetitions))
            .await
    }

    /// Send a SET and return the parsed response.
    ///
    /// The current contract accepts exactly one varbind and it must carry an
    /// integer value; anything else fails with
    /// [`Error::UnsupportedSet`] before touching the network.
    pub async fn set(&self, varbinds: Vec<VarBind>) -> Result<Pdu> {
        if varbinds.len() != 1 {
            return Err(Error::UnsupportedSet {
                reason: "exactly one varbind per SET",
            });
        }
        if !matches!(varbinds[0].value, Value::Integer(_)) {
            return Err(Error::UnsupportedSet {
                reason: "only integer values can be SET",
            });
        }
        tracing::debug!(
            target: "snmp_client::client",
            peer = %self.peer_addr(),
            varbind = %varbinds[0],
            "sending SetRequest"
        );
        self.transact(Pdu::set_request(varbinds)).await
    }

    fn check_oid_count(&self, oids: &[Oid]) -> Result<()> {
        if oids.len() > MAX_OIDS {
            return Err(Error::TooManyOids {
                count: oids.len(),
                max: MAX_OIDS,
            });
        }
        Ok(())
    }

    /// Run one request/response transaction with retries.
    ///
    /// The total `timeout` is split evenly across `retries + 1` attempts.
    /// Each attempt re-marshals the packet under a fresh request ID; a reply
    /// matching *any* ID issued by this call is accepted, which tolerates a
    /// late reply to an earlier attempt arriving after its successor was
    /// sent. Marshal failures abort immediately; everything else is recorded
    /// and retried until the budget runs out.
    pub(crate) async fn transact(&self, packet: Pdu) -> Result<Pdu> {
        let start = Instant::now();
        let final_deadline = start + self.config.timeout;
        let per_attempt = self.config.timeout / (self.config.retries + 1);

        let mut message =
            CommunityMessage::new(self.config.version, self.config.community.clone(), packet);
        let mut seen_ids: Vec<u32> = Vec::with_capacity(self.config.retries as usize + 1);
        let mut buf = vec![0u8; RX_BUF_SIZE];
        let mut last_error: Option<Error> = None;
        let mut attempt: u32 = 0;

        loop {
            if attempt > 0 {
                if let Some(err) = &last_error {
                    tracing::debug!(
                        target: "snmp_client::client",
                        peer = %self.peer_addr(),
                        attempt,
                        error = %err,
                        "retrying request"
                    );
                }
                if Instant::now() >= final_deadline {
                    return Err(Error::Timeout {
                        target: Some(self.peer_addr()),
                        elapsed: start.elapsed(),
                        retries: attempt - 1,
                        source: last_error.map(Box::new),
                    });
                }
                if attempt > self.config.retries {
                    break;
                }
            }

            let request_id = self.request_id.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
            seen_ids.push(request_id);
            message.pdu.request_id = request_id;

            // Marshal failures never get better on retry.
            let data = message.encode()?;

            let deadline = (Instant::now() + per_attempt).min(final_deadline);

            match self.attempt(&data, &mut buf, deadline, &seen_ids).await {
                Ok(pdu) => return Ok(pdu),
                Err(e) => last_error = Some(e),
            }
            attempt += 1;
        }

        Err(last_error.unwrap_or_else(|| Error::Timeout {
            target: Some(self.peer_addr()),
            elapsed: start.elapsed(),
            retries: self.config.retries,
            source: None,
        }))
    }

    /// One send/receive/decode attempt.
    async fn attempt(
        &self,
        data: &[u8],
        buf: &mut [u8],
        deadline: Instant,
        seen_ids: &[u32],
    ) -> Result<Pdu> {
        self.transport.send(data).await?;

        let n = self.transport.recv(buf, deadline).await?;

        let response = CommunityMessage::decode(Bytes::copy_from_slice(&buf[..n]))?;

        // A reply to any ID issued by this call is valid; anything else came
        // from a different sender or an earlier, completed call.
        if !seen_ids.contains(&response.pdu.request_id) {
            tracing::debug!(
                target: "snmp_client::client",
                peer = %self.peer_addr(),
                request_id = response.pdu.request_id,
                "response request ID not in issued set"
            );
            return Err(Error::OutOfOrderResponse {
                request_id: response.pdu.request_id,
            });
        }

        if response.pdu.varbinds.is_empty() {
            return Err(Error::EmptyResponse {
                target: Some(self.peer_addr()),
            });
        }

        tracing::debug!(
            target: "snmp_client::client",
            peer = %self.peer_addr(),
            pdu_type = %response.pdu.pdu_type,
            varbind_count = response.pdu.varbinds.len(),
            error_status = response.pdu.error_status,
            "received response"
        );

        Ok(response.pdu)
    }
}
