//! # RTP Mirror
//!
//! Real-time mirroring of live call audio to an external RTP listener.
//!
//! A host media pipeline taps the read direction of a live voice session and
//! hands each captured audio chunk to this crate. The chunk is encoded to
//! G.711 A-law (or passed through if already encoded), framed as an RTP
//! packet and sent as a single UDP datagram to the configured listener. The
//! original call is never touched.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        HOST MEDIA PIPELINE                        │
//! │   live session ──▶ audio tap ──▶ AudioChunk (PCM16 or G.711A)    │
//! └───────────────────────────────┬──────────────────────────────────┘
//!                                 │ on_audio
//!                                 ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    TapRegistry (tap::registry)                    │
//! │   one RtpSession per tapped session, comfort-noise filtering      │
//! └───────────────────────────────┬──────────────────────────────────┘
//!                                 │ send
//!                                 ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     RtpSession (rtp::session)                     │
//! │  ┌────────────┐   ┌───────────────┐   ┌───────────────────────┐  │
//! │  │AlawEncoder │──▶│ RTP header     │──▶│ UdpTransport           │  │
//! │  │(codec)     │   │ (rtp::header)  │   │ (network::udp)         │  │
//! │  └────────────┘   └───────────────┘   └───────────┬───────────┘  │
//! │    seq / timestamp / SSRC advance per emission     │              │
//! └────────────────────────────────────────────────────┼─────────────┘
//!                                                      │ UDP datagram
//!                                                      ▼
//!                                    external listener (speech engine)
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod network;
pub mod rtp;
pub mod tap;

pub use error::{Error, Result};

/// Application-wide constants
pub mod constants {
    /// Telephony sample clock in Hz
    pub const SAMPLE_RATE: u32 = 8000;

    /// Samples per 20ms frame at 8kHz
    pub const FRAME_SAMPLES: usize = 160;

    /// Frame duration in milliseconds
    pub const FRAME_DURATION_MS: u64 = 20;

    /// Maximum payload bytes carried in one packet (one A-law byte per sample)
    pub const MAX_PAYLOAD_SIZE: usize = FRAME_SAMPLES;

    /// Maximum datagram size: fixed header plus capped payload
    pub const MAX_PACKET_SIZE: usize = crate::rtp::header::RTP_HEADER_SIZE + MAX_PAYLOAD_SIZE;
}
