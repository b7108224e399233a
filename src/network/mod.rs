//! Network subsystem for outbound UDP transport

pub mod udp;

pub use udp::UdpTransport;
