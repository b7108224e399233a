//! Mirror Feeder Application
//!
//! Exercises a mirror target end to end without a live call: attaches
//! a tap session, paces 20ms frames of a synthesized tone through it,
//! and detaches on Ctrl-C.

use anyhow::Result;
use std::f32::consts::TAU;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use rtp_mirror::{
    config::parse_target,
    constants::{FRAME_DURATION_MS, FRAME_SAMPLES, SAMPLE_RATE},
    tap::{AudioChunk, TapRegistry},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get target address from args or use default
    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:40000".to_string());
    let destination = parse_target(&target)?;

    tracing::info!("Mirror target: {}", destination);

    let registry = TapRegistry::new();
    let session_id = Uuid::new_v4().to_string();
    let handle = registry.attach(&session_id, destination)?;

    tracing::info!(
        "Tap attached for session {} - feeding {}ms frames, press Ctrl+C to stop",
        session_id,
        FRAME_DURATION_MS
    );

    let mut ticker = tokio::time::interval(Duration::from_millis(FRAME_DURATION_MS));
    let step = 440.0 * TAU / SAMPLE_RATE as f32;
    let mut phase: f32 = 0.0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut pcm = Vec::with_capacity(FRAME_SAMPLES * 2);
                for _ in 0..FRAME_SAMPLES {
                    let sample = (phase.sin() * 12000.0) as i16;
                    pcm.extend_from_slice(&sample.to_le_bytes());
                    phase = (phase + step) % TAU;
                }
                registry.on_audio(&handle, &AudioChunk::pcm16(pcm));
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received, stopping");
                break;
            }
        }
    }

    if let Some(stats) = registry.session_stats(&handle) {
        tracing::info!(
            "Mirrored {} packets ({} bytes), {} send errors",
            stats.packets_sent,
            stats.bytes_sent,
            stats.send_errors
        );
    }
    registry.detach(&handle);

    Ok(())
}
