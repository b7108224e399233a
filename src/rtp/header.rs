//! RTP header encoding/decoding (RFC 3550).
//!
//! Fixed 12-byte header, no CSRC list, no extensions, no padding:
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |V=2|P|X|  CC   |M|     PT      |       sequence number         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           timestamp                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           synchronization source (SSRC) identifier            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use crate::error::PacketError;

/// RTP header size in bytes (no CSRC, no extension).
pub const RTP_HEADER_SIZE: usize = 12;

/// G.711 A-law payload type (RFC 3551).
pub const PT_PCMA: u8 = 8;

/// Supported RTP version.
pub const RTP_VERSION: u8 = 2;

/// Parsed RTP header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpHeader {
    pub version: u8,
    pub padding: bool,
    pub extension: bool,
    pub csrc_count: u8,
    pub marker: bool,
    pub payload_type: u8,
    pub sequence_number: u16,
    pub timestamp: u32,
    pub ssrc: u32,
}

/// Build the fixed 12-byte wire header.
///
/// Byte 0 is always 0x80 (version 2, no padding, no extension, zero
/// CSRCs); the marker bit is never set on this send-only path.
pub fn build_header(seq: u16, timestamp: u32, ssrc: u32, payload_type: u8) -> [u8; RTP_HEADER_SIZE] {
    let mut header = [0u8; RTP_HEADER_SIZE];

    header[0] = RTP_VERSION << 6;
    header[1] = payload_type & 0x7F;
    header[2..4].copy_from_slice(&seq.to_be_bytes());
    header[4..8].copy_from_slice(&timestamp.to_be_bytes());
    header[8..12].copy_from_slice(&ssrc.to_be_bytes());

    header
}

/// Parse the leading RTP header out of a datagram.
pub fn parse_header(data: &[u8]) -> Result<RtpHeader, PacketError> {
    if data.len() < RTP_HEADER_SIZE {
        return Err(PacketError::TooShort(data.len()));
    }

    let version = data[0] >> 6;
    if version != RTP_VERSION {
        return Err(PacketError::UnsupportedVersion(version));
    }

    Ok(RtpHeader {
        version,
        padding: data[0] & 0x20 != 0,
        extension: data[0] & 0x10 != 0,
        csrc_count: data[0] & 0x0F,
        marker: data[1] & 0x80 != 0,
        payload_type: data[1] & 0x7F,
        sequence_number: u16::from_be_bytes([data[2], data[3]]),
        timestamp: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
        ssrc: u32::from_be_bytes([data[8], data[9], data[10], data[11]]),
    })
}
