//! Outbound UDP transport
//!
//! One socket per session, bound to an OS-assigned ephemeral port so
//! concurrent sessions never collide. Sends are non-blocking and
//! best-effort; a failed send is reported and the stream moves on.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};

use crate::error::NetworkError;

/// Send buffer size requested from the OS.
const SEND_BUFFER_SIZE: usize = 256 * 1024;

/// Connectionless UDP endpoint owned by one RTP session.
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    destination: SocketAddr,
    local_port: u16,
}

impl UdpTransport {
    /// Open a transport towards `destination`.
    ///
    /// Binds an ephemeral local port, never a fixed one. Unspecified
    /// destination IPs and port 0 are rejected up front.
    pub fn open(destination: SocketAddr) -> Result<Self, NetworkError> {
        if destination.ip().is_unspecified() {
            return Err(NetworkError::InvalidAddress(format!(
                "unspecified destination IP: {}",
                destination.ip()
            )));
        }
        if destination.port() == 0 {
            return Err(NetworkError::InvalidAddress(
                "destination port must be non-zero".into(),
            ));
        }

        let (domain, bind_ip): (Domain, IpAddr) = if destination.is_ipv4() {
            (Domain::IPV4, IpAddr::V4(Ipv4Addr::UNSPECIFIED))
        } else {
            (Domain::IPV6, IpAddr::V6(Ipv6Addr::UNSPECIFIED))
        };

        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))
            .map_err(|e| NetworkError::BindFailed(e.to_string()))?;

        socket
            .set_nonblocking(true)
            .map_err(|e| NetworkError::BindFailed(e.to_string()))?;

        if let Err(e) = socket.set_send_buffer_size(SEND_BUFFER_SIZE) {
            tracing::debug!("could not enlarge send buffer: {}", e);
        }

        socket
            .bind(&SocketAddr::new(bind_ip, 0).into())
            .map_err(|e| NetworkError::BindFailed(e.to_string()))?;

        let socket: UdpSocket = socket.into();
        let local_port = socket
            .local_addr()
            .map_err(|e| NetworkError::BindFailed(e.to_string()))?
            .port();

        tracing::debug!(
            "UDP transport open: local port {}, target {}",
            local_port,
            destination
        );

        Ok(Self {
            socket: Some(socket),
            destination,
            local_port,
        })
    }

    /// Send one datagram, best-effort.
    ///
    /// Never retries; `WouldBlock` counts as a failed send.
    pub fn send_datagram(&self, bytes: &[u8]) -> Result<(), NetworkError> {
        let socket = self.socket.as_ref().ok_or(NetworkError::Closed)?;

        match socket.send_to(bytes, self.destination) {
            Ok(_) => Ok(()),
            Err(e) => Err(NetworkError::SendFailed(e.to_string())),
        }
    }

    /// Release the socket. Idempotent: later calls are no-ops.
    pub fn close(&mut self) {
        if let Some(socket) = self.socket.take() {
            drop(socket);
            tracing::debug!("UDP transport closed, target {}", self.destination);
        }
    }

    /// Whether the socket has been released
    pub fn is_closed(&self) -> bool {
        self.socket.is_none()
    }

    /// OS-assigned local port
    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    /// Destination address
    pub fn destination(&self) -> SocketAddr {
        self.destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_receiver() -> (UdpSocket, SocketAddr) {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = receiver.local_addr().unwrap();
        (receiver, addr)
    }

    #[test]
    fn test_open_assigns_ephemeral_port() {
        let (_receiver, addr) = loopback_receiver();
        let transport = UdpTransport::open(addr).unwrap();

        assert_ne!(transport.local_port(), 0);
        assert_ne!(transport.local_port(), addr.port());
    }

    #[test]
    fn test_rejects_zero_port() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        assert!(matches!(
            UdpTransport::open(addr),
            Err(NetworkError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_rejects_unspecified_ip() {
        let addr: SocketAddr = "0.0.0.0:40000".parse().unwrap();
        assert!(matches!(
            UdpTransport::open(addr),
            Err(NetworkError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_send_reaches_receiver() {
        let (receiver, addr) = loopback_receiver();
        let transport = UdpTransport::open(addr).unwrap();

        transport.send_datagram(b"hello").unwrap();

        let mut buf = [0u8; 64];
        let n = receiver.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
    }

    #[test]
    fn test_close_is_idempotent() {
        let (_receiver, addr) = loopback_receiver();
        let mut transport = UdpTransport::open(addr).unwrap();

        transport.close();
        transport.close();
        assert!(transport.is_closed());
    }

    #[test]
    fn test_send_after_close_fails() {
        let (_receiver, addr) = loopback_receiver();
        let mut transport = UdpTransport::open(addr).unwrap();

        transport.close();
        assert!(matches!(
            transport.send_datagram(b"late"),
            Err(NetworkError::Closed)
        ));
    }
}
