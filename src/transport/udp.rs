//! UDP transport.
//!
//! One connected socket per session. `connect` semantics mean the kernel
//! filters datagrams from other senders, and the receive path is bounded by
//! a caller-supplied deadline rather than socket options.

use super::Transport;
use crate::error::{Error, Result};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tokio::time::Instant;

/// UDP transport connected to a single agent.
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Open an ephemeral socket in the target's address family and connect
    /// it to the target.
    pub async fn connect(target: SocketAddr) -> Result<Self> {
        let io_err = |e: io::Error| Error::Transport {
            target: Some(target),
            source: e,
        };

        let socket = open_ephemeral_socket(target).map_err(io_err)?;
        socket.connect(target).await.map_err(io_err)?;

        tracing::debug!(
            target: "snmp_client::transport",
            peer = %target,
            local = ?socket.local_addr().ok(),
            "UDP transport connected"
        );

        Ok(Self {
            socket,
            peer: target,
        })
    }

    /// Local bind address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(|e| Error::Transport {
            target: Some(self.peer),
            source: e,
        })
    }
}

/// Build an unbound-port datagram socket matched to the target's family.
///
/// socket2 supplies the options tokio's own bind does not expose: v6-only
/// scoping (a v6 session never observes IPv4-mapped addresses) and address
/// reuse for quick restarts. The sequence itself is fixed by the sockets
/// API: configure before bind, set non-blocking before handing to tokio.
fn open_ephemeral_socket(target: SocketAddr) -> io::Result<UdpSocket> {
    let (domain, bind_addr): (Domain, SocketAddr) = match target {
        SocketAddr::V4(_) => (Domain::IPV4, (Ipv4Addr::UNSPECIFIED, 0).into()),
        SocketAddr::V6(_) => (Domain::IPV6, (Ipv6Addr::UNSPECIFIED, 0).into()),
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if target.is_ipv6() {
        socket.set_only_v6(true)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&bind_addr.into())?;

    UdpSocket::from_std(socket.into())
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        tracing::trace!(
            target: "snmp_client::transport",
            peer = %self.peer,
            bytes = data.len(),
            "UDP send"
        );
        self.socket.send(data).await.map_err(|e| Error::Transport {
            target: Some(self.peer),
            source: e,
        })?;
        Ok(())
    }

    async fn recv(&self, buf: &mut [u8], deadline: Instant) -> Result<usize> {
        match tokio::time::timeout_at(deadline, self.socket.recv(buf)).await {
            Ok(Ok(n)) => {
                tracing::trace!(
                    target: "snmp_client::transport",
                    peer = %self.peer,
                    bytes = n,
                    "UDP recv"
                );
                Ok(n)
            }
            Ok(Err(e)) => Err(Error::Transport {
                target: Some(self.peer),
                source: e,
            }),
            Err(_) => {
                tracing::trace!(
                    target: "snmp_client::transport",
                    peer = %self.peer,
                    "UDP recv deadline elapsed"
                );
                Err(Error::Transport {
                    target: Some(self.peer),
                    source: io::Error::from(io::ErrorKind::TimedOut),
                })
            }
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}
