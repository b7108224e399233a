//! Audio chunks as delivered by the host's tap callback.

use bytes::Bytes;

/// Payload encoding of a tapped audio chunk.
///
/// The tag travels with the chunk; it is never inferred from the
/// payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkFormat {
    /// 16-bit little-endian linear PCM, two bytes per sample
    Pcm16,
    /// G.711 A-law, one byte per sample
    G711Alaw,
}

/// One captured audio chunk.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub format: ChunkFormat,
    /// Comfort-noise/silence frame; never encoded, never sent
    pub comfort_noise: bool,
    pub data: Bytes,
}

impl AudioChunk {
    /// Chunk of raw 16-bit linear PCM
    pub fn pcm16(data: impl Into<Bytes>) -> Self {
        Self {
            format: ChunkFormat::Pcm16,
            comfort_noise: false,
            data: data.into(),
        }
    }

    /// Chunk that is already G.711 A-law encoded
    pub fn alaw(data: impl Into<Bytes>) -> Self {
        Self {
            format: ChunkFormat::G711Alaw,
            comfort_noise: false,
            data: data.into(),
        }
    }

    /// Comfort-noise marker frame
    pub fn comfort_noise() -> Self {
        Self {
            format: ChunkFormat::G711Alaw,
            comfort_noise: true,
            data: Bytes::new(),
        }
    }

    /// Number of audio samples carried by this chunk
    pub fn sample_count(&self) -> usize {
        match self.format {
            ChunkFormat::Pcm16 => self.data.len() / 2,
            ChunkFormat::G711Alaw => self.data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
