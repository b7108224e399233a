//! RTP framing: wire-exact header codec and the per-tap transmit session.

pub mod header;
pub mod session;

pub use header::{build_header, parse_header, RtpHeader};
pub use session::{RtpSession, SessionStats};
