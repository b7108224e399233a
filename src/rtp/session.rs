//! Per-tap RTP transmit session
//!
//! Owns the socket, the destination, the monotonic counters and the
//! per-session scratch buffers. One session exists per tapped call;
//! every inbound audio chunk becomes at most one UDP datagram.

use std::net::SocketAddr;

use bytes::Bytes;
use uuid::Uuid;

use crate::codec::alaw::{AlawEncoder, EncoderStats};
use crate::error::{NetworkError, Result};
use crate::network::UdpTransport;
use crate::rtp::header::{build_header, PT_PCMA, RTP_HEADER_SIZE};
use crate::tap::chunk::{AudioChunk, ChunkFormat};

/// RTP transmit state for one tapped session.
pub struct RtpSession {
    /// Originating call identifier, diagnostics only
    session_id: String,
    transport: UdpTransport,
    encoder: AlawEncoder,
    /// Datagram assembly buffer (reused, owned by this session)
    packet_buffer: Vec<u8>,
    /// Wraps modulo 2^16; first packet carries 1
    sequence_number: u16,
    /// Advances by encoded sample count, wraps modulo 2^32
    timestamp: u32,
    /// Chosen once per session, never a fixed constant
    ssrc: u32,
    packets_sent: u64,
    send_errors: u64,
    bytes_sent: u64,
    comfort_noise_skipped: u64,
}

impl RtpSession {
    /// Create a session towards `destination`.
    ///
    /// Fails fast on a bad destination or bind refusal; nothing is
    /// left alive on error.
    pub fn new(
        session_id: impl Into<String>,
        destination: SocketAddr,
        max_frame_samples: usize,
    ) -> Result<Self> {
        let session_id = session_id.into();
        let transport = UdpTransport::open(destination)?;
        let ssrc = random_ssrc();

        tracing::info!(
            "RTP session {} open: local port {}, target {}, ssrc {:#010x}",
            session_id,
            transport.local_port(),
            destination,
            ssrc
        );

        Ok(Self {
            session_id,
            transport,
            encoder: AlawEncoder::new(max_frame_samples),
            packet_buffer: Vec::with_capacity(RTP_HEADER_SIZE + max_frame_samples),
            sequence_number: 1,
            timestamp: 0,
            ssrc,
            packets_sent: 0,
            send_errors: 0,
            bytes_sent: 0,
            comfort_noise_skipped: 0,
        })
    }

    /// Encode one audio chunk and emit it as a single RTP datagram.
    ///
    /// The chunk is interpreted by its format tag: A-law payloads pass
    /// through (capped at the frame limit), PCM is encoded with the
    /// same cap. Counters advance once per emission attempt, on
    /// success and on a lost send alike; a failed send is surfaced for
    /// logging but never tears the session down. Returns the datagram
    /// size on success.
    pub fn send(&mut self, chunk: &AudioChunk) -> Result<usize> {
        if self.transport.is_closed() {
            return Err(NetworkError::Closed.into());
        }
        if chunk.data.is_empty() {
            tracing::trace!("session {}: empty chunk, nothing to send", self.session_id);
            return Ok(0);
        }

        let payload: Bytes = match chunk.format {
            ChunkFormat::G711Alaw => self.encoder.cap_passthrough(&chunk.data),
            ChunkFormat::Pcm16 => self.encoder.encode_pcm_bytes(&chunk.data),
        };
        // One A-law byte per sample at the 8kHz clock
        let samples = payload.len() as u32;

        let header = build_header(self.sequence_number, self.timestamp, self.ssrc, PT_PCMA);
        self.packet_buffer.clear();
        self.packet_buffer.extend_from_slice(&header);
        self.packet_buffer.extend_from_slice(&payload);

        let result = self.transport.send_datagram(&self.packet_buffer);

        let sent_seq = self.sequence_number;
        let sent_ts = self.timestamp;
        self.sequence_number = self.sequence_number.wrapping_add(1);
        self.timestamp = self.timestamp.wrapping_add(samples);

        match result {
            Ok(()) => {
                let size = self.packet_buffer.len();
                self.packets_sent += 1;
                self.bytes_sent += size as u64;
                tracing::trace!(
                    "session {}: sent seq={} ts={} size={}",
                    self.session_id,
                    sent_seq,
                    sent_ts,
                    size
                );
                Ok(size)
            }
            Err(e) => {
                self.send_errors += 1;
                Err(e.into())
            }
        }
    }

    /// Record a comfort-noise frame that was filtered before `send`.
    ///
    /// No datagram, no counter movement.
    pub fn skip_comfort_noise(&mut self) {
        self.comfort_noise_skipped += 1;
        tracing::trace!("session {}: comfort-noise frame skipped", self.session_id);
    }

    /// Tear the session down. Idempotent; no packet is ever sent
    /// after the first close.
    pub fn close(&mut self) {
        if !self.transport.is_closed() {
            tracing::info!(
                "RTP session {} closed: {} packets, {} bytes, {} send errors",
                self.session_id,
                self.packets_sent,
                self.bytes_sent,
                self.send_errors
            );
        }
        self.transport.close();
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    pub fn sequence_number(&self) -> u16 {
        self.sequence_number
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    pub fn local_port(&self) -> u16 {
        self.transport.local_port()
    }

    pub fn destination(&self) -> SocketAddr {
        self.transport.destination()
    }

    /// Get statistics
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            packets_sent: self.packets_sent,
            send_errors: self.send_errors,
            bytes_sent: self.bytes_sent,
            comfort_noise_skipped: self.comfort_noise_skipped,
            encoder: self.encoder.stats(),
        }
    }
}

/// Session statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStats {
    pub packets_sent: u64,
    pub send_errors: u64,
    pub bytes_sent: u64,
    pub comfort_noise_skipped: u64,
    pub encoder: EncoderStats,
}

/// Draw a fresh SSRC from UUIDv4 entropy.
fn random_ssrc() -> u32 {
    let bytes = *Uuid::new_v4().as_bytes();
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
