//! G.711 A-law encoding (ITU-T G.711, payload type 8)
//!
//! A-law maps one 16-bit linear PCM sample to one 8-bit logarithmic
//! value using a sign bit, a 3-bit exponent segment and a 4-bit
//! mantissa. Segment boundaries in the 12-bit magnitude domain sit at
//! 32, 64, 128, 256, 512, 1024 and 2048. The transmitted byte has its
//! even bits inverted (XOR 0x55) and carries sign = 1 for non-negative
//! samples, which is why digital silence encodes to 0xD5.

use bytes::Bytes;

/// Segment upper bounds in the 12-bit magnitude domain.
const SEG_BOUNDARIES: [i32; 8] = [0x1F, 0x3F, 0x7F, 0xFF, 0x1FF, 0x3FF, 0x7FF, 0xFFF];

/// Encode a 16-bit linear PCM sample to 8-bit A-law.
///
/// Total over the full i16 range; `i16::MIN` is handled by negating in
/// the i32 domain, where it cannot overflow.
pub fn linear_to_alaw(sample: i16) -> u8 {
    // Arithmetic shift into the 12-bit magnitude domain.
    let mut val = (sample as i32) >> 3;

    let mask: u8 = if val >= 0 {
        0xD5 // sign bit plus even-bit inversion
    } else {
        val = -val - 1;
        0x55
    };

    // Clamp to 12 bits.
    if val > 0xFFF {
        val = 0xFFF;
    }

    let seg = SEG_BOUNDARIES
        .iter()
        .position(|&end| val <= end)
        .unwrap_or(7);

    // Segments 0 and 1 share a linear step; higher segments double it.
    let shift = if seg < 2 { 1 } else { seg };
    let mantissa = ((val >> shift) & 0x0F) as u8;

    (((seg as u8) << 4) | mantissa) ^ mask
}

/// Decode an 8-bit A-law value back to 16-bit linear PCM.
///
/// Inverse of [`linear_to_alaw`] with midpoint reconstruction of the
/// quantization step.
pub fn alaw_to_linear(sample: u8) -> i16 {
    let val = sample ^ 0x55;
    let seg = ((val & 0x70) >> 4) as u32;
    let mut t = ((val & 0x0F) as i32) << 4;

    match seg {
        0 => t += 8,
        1 => t += 0x108,
        _ => {
            t += 0x108;
            t <<= seg - 1;
        }
    }

    if val & 0x80 != 0 {
        t as i16
    } else {
        -t as i16
    }
}

/// A-law encoder with per-session scratch storage
///
/// Each session owns exactly one encoder; the scratch buffer is never
/// shared across sessions. Input longer than the configured frame cap
/// is truncated deterministically and the drop is counted.
pub struct AlawEncoder {
    /// Maximum samples carried per frame
    max_frame_samples: usize,
    /// Encoding buffer (reused to avoid allocations)
    encode_buffer: Vec<u8>,
    /// Frame counter for statistics
    frames_encoded: u64,
    /// Total samples encoded
    samples_encoded: u64,
    /// Chunks that exceeded the frame cap
    truncated_chunks: u64,
    /// Samples discarded by the cap
    samples_dropped: u64,
}

impl AlawEncoder {
    /// Create an encoder capping frames at `max_frame_samples` samples
    pub fn new(max_frame_samples: usize) -> Self {
        Self {
            max_frame_samples,
            encode_buffer: Vec::with_capacity(max_frame_samples),
            frames_encoded: 0,
            samples_encoded: 0,
            truncated_chunks: 0,
            samples_dropped: 0,
        }
    }

    /// Encode a slice of linear PCM samples, 1:1 and order-preserving.
    ///
    /// At most `max_frame_samples` samples are encoded; the remainder
    /// is discarded and counted in [`EncoderStats::samples_dropped`].
    pub fn encode_samples(&mut self, samples: &[i16]) -> Bytes {
        let take = samples.len().min(self.max_frame_samples);
        self.note_truncation(samples.len(), take);

        self.encode_buffer.clear();
        self.encode_buffer
            .extend(samples[..take].iter().map(|&s| linear_to_alaw(s)));

        self.frames_encoded += 1;
        self.samples_encoded += take as u64;

        Bytes::copy_from_slice(&self.encode_buffer)
    }

    /// Encode a raw PCM byte buffer as delivered by the audio tap.
    ///
    /// Bytes are consumed as little-endian i16 pairs; a trailing odd
    /// byte is ignored.
    pub fn encode_pcm_bytes(&mut self, pcm: &[u8]) -> Bytes {
        let total = pcm.len() / 2;
        let take = total.min(self.max_frame_samples);
        self.note_truncation(total, take);

        self.encode_buffer.clear();
        self.encode_buffer.extend(
            pcm.chunks_exact(2)
                .take(take)
                .map(|pair| linear_to_alaw(i16::from_le_bytes([pair[0], pair[1]]))),
        );

        self.frames_encoded += 1;
        self.samples_encoded += take as u64;

        Bytes::copy_from_slice(&self.encode_buffer)
    }

    /// Cap an already-encoded A-law payload at the frame limit.
    ///
    /// No re-encoding happens; the excess is discarded and counted
    /// like any other truncation.
    pub fn cap_passthrough(&mut self, data: &Bytes) -> Bytes {
        let take = data.len().min(self.max_frame_samples);
        self.note_truncation(data.len(), take);
        data.slice(..take)
    }

    fn note_truncation(&mut self, offered: usize, taken: usize) {
        if offered > taken {
            self.truncated_chunks += 1;
            self.samples_dropped += (offered - taken) as u64;
        }
    }

    /// Get the configured frame cap in samples
    pub fn max_frame_samples(&self) -> usize {
        self.max_frame_samples
    }

    /// Get statistics
    pub fn stats(&self) -> EncoderStats {
        EncoderStats {
            frames_encoded: self.frames_encoded,
            samples_encoded: self.samples_encoded,
            truncated_chunks: self.truncated_chunks,
            samples_dropped: self.samples_dropped,
        }
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.frames_encoded = 0;
        self.samples_encoded = 0;
        self.truncated_chunks = 0;
        self.samples_dropped = 0;
    }
}

/// Encoder statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct EncoderStats {
    pub frames_encoded: u64,
    pub samples_encoded: u64,
    pub truncated_chunks: u64,
    pub samples_dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FRAME_SAMPLES;
    use proptest::prelude::*;

    #[test]
    fn test_silence_encodes_to_d5() {
        assert_eq!(linear_to_alaw(0), 0xD5);
    }

    #[test]
    fn test_extremes_are_defined() {
        // Known A-law codes for the signed 16-bit extremes
        assert_eq!(linear_to_alaw(32767), 0xAA);
        assert_eq!(linear_to_alaw(-32768), 0x2A);
    }

    #[test]
    fn test_total_over_full_input_range() {
        // Every input must produce a byte without panicking
        for pcm in i16::MIN..=i16::MAX {
            let _ = linear_to_alaw(pcm);
        }
    }

    #[test]
    fn test_sign_bit_convention() {
        // A-law transmits sign = 1 for non-negative samples
        for &pcm in &[0i16, 1, 8, 500, 4000, 32767] {
            assert_eq!(linear_to_alaw(pcm) & 0x80, 0x80, "pcm={}", pcm);
        }
        for &pcm in &[-1i16, -8, -500, -4000, -32768] {
            assert_eq!(linear_to_alaw(pcm) & 0x80, 0x00, "pcm={}", pcm);
        }
    }

    #[test]
    fn test_segment_boundary_values() {
        // 16-bit 256 is 12-bit 32, the first value of segment 1
        assert_eq!(linear_to_alaw(255), 0xDA); // last code of segment 0
        assert_eq!(linear_to_alaw(256), 0xC5); // first code of segment 1
    }

    #[test]
    fn test_decode_inverts_known_codes() {
        assert_eq!(alaw_to_linear(0xD5), 8);
        assert_eq!(alaw_to_linear(0x55), -8);
        assert_eq!(alaw_to_linear(0xAA), 32256);
        assert_eq!(alaw_to_linear(0x2A), -32256);
    }

    proptest! {
        #[test]
        fn prop_roundtrip_error_bounded(pcm in i16::MIN..=i16::MAX) {
            let decoded = alaw_to_linear(linear_to_alaw(pcm)) as i32;
            let err = (decoded - pcm as i32).abs();
            let bound = (pcm as i32).abs() / 16 + 16;
            prop_assert!(err <= bound, "pcm={} decoded={} err={}", pcm, decoded, err);
        }

        #[test]
        fn prop_sign_preserved(pcm in i16::MIN..=i16::MAX) {
            let code = linear_to_alaw(pcm);
            if pcm >= 0 {
                prop_assert_eq!(code & 0x80, 0x80);
            } else {
                prop_assert_eq!(code & 0x80, 0x00);
            }
        }
    }

    #[test]
    fn test_encoder_maps_one_to_one() {
        let mut encoder = AlawEncoder::new(FRAME_SAMPLES);
        let samples = [0i16, 1000, -1000, 32767];
        let out = encoder.encode_samples(&samples);

        assert_eq!(out.len(), samples.len());
        for (i, &s) in samples.iter().enumerate() {
            assert_eq!(out[i], linear_to_alaw(s));
        }
    }

    #[test]
    fn test_encoder_truncates_at_frame_cap() {
        let mut encoder = AlawEncoder::new(FRAME_SAMPLES);
        let samples = vec![0i16; 2000];
        let out = encoder.encode_samples(&samples);

        assert_eq!(out.len(), FRAME_SAMPLES);
        let stats = encoder.stats();
        assert_eq!(stats.truncated_chunks, 1);
        assert_eq!(stats.samples_dropped, 2000 - FRAME_SAMPLES as u64);
        assert_eq!(stats.samples_encoded, FRAME_SAMPLES as u64);
    }

    #[test]
    fn test_encode_pcm_bytes_little_endian_pairs() {
        let mut encoder = AlawEncoder::new(FRAME_SAMPLES);
        let pcm = 1000i16.to_le_bytes();
        let out = encoder.encode_pcm_bytes(&pcm);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0], linear_to_alaw(1000));
    }

    #[test]
    fn test_encode_pcm_bytes_ignores_trailing_odd_byte() {
        let mut encoder = AlawEncoder::new(FRAME_SAMPLES);
        let out = encoder.encode_pcm_bytes(&[0x00, 0x00, 0x7F]);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0], 0xD5);
    }

    #[test]
    fn test_encoder_buffer_reuse_across_frames() {
        let mut encoder = AlawEncoder::new(FRAME_SAMPLES);
        let first = encoder.encode_samples(&[0i16; 160]);
        let second = encoder.encode_samples(&[0i16; 40]);

        // Later frames must not retain stale samples
        assert_eq!(first.len(), 160);
        assert_eq!(second.len(), 40);
        assert!(second.iter().all(|&b| b == 0xD5));
    }
}
