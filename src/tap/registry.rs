//! Tap lifecycle registry
//!
//! Owns one [`RtpSession`] per tapped call, keyed by the host's
//! session id. Lifecycle notifications (attach/detach) and audio
//! delivery go through here; each session sits behind its own lock so
//! teardown can never close a socket out from under an in-flight send.

use std::net::SocketAddr;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::constants::FRAME_SAMPLES;
use crate::error::Result;
use crate::rtp::session::{RtpSession, SessionStats};
use crate::tap::chunk::AudioChunk;

/// Handle to an attached tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapHandle {
    session_id: String,
}

impl TapHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Registry of active taps.
pub struct TapRegistry {
    taps: DashMap<String, Mutex<RtpSession>>,
    max_frame_samples: usize,
}

impl TapRegistry {
    pub fn new() -> Self {
        Self::with_frame_cap(FRAME_SAMPLES)
    }

    /// Registry whose sessions cap frames at `max_frame_samples`
    pub fn with_frame_cap(max_frame_samples: usize) -> Self {
        Self {
            taps: DashMap::new(),
            max_frame_samples,
        }
    }

    /// Attach a tap for `session_id`, mirroring to `destination`.
    ///
    /// Exactly one session exists per id. A second attach on an
    /// already-tapped id is a warning no-op: the existing session is
    /// left untouched, no new socket is opened, and the returned
    /// handle refers to the existing tap.
    pub fn attach(&self, session_id: &str, destination: SocketAddr) -> Result<TapHandle> {
        let handle = TapHandle {
            session_id: session_id.to_string(),
        };

        if self.taps.contains_key(session_id) {
            tracing::warn!("tap already active for session {}", session_id);
            return Ok(handle);
        }

        let session = RtpSession::new(session_id, destination, self.max_frame_samples)?;

        match self.taps.entry(session_id.to_string()) {
            Entry::Occupied(_) => {
                // Lost a concurrent attach race; the fresh socket is
                // released on drop and the winner stays.
                tracing::warn!("tap already active for session {}", session_id);
            }
            Entry::Vacant(slot) => {
                slot.insert(Mutex::new(session));
                tracing::info!("tap attached for session {} -> {}", session_id, destination);
            }
        }

        Ok(handle)
    }

    /// Deliver one tapped audio chunk.
    ///
    /// Comfort-noise frames are filtered here, before the session's
    /// send path. Send failures are logged per occurrence and never
    /// detach the tap; delivery after detach is a silent no-op.
    pub fn on_audio(&self, handle: &TapHandle, chunk: &AudioChunk) {
        let Some(entry) = self.taps.get(handle.session_id()) else {
            tracing::trace!(
                "chunk for session {} dropped, no tap attached",
                handle.session_id()
            );
            return;
        };

        let mut session = entry.lock();
        if chunk.comfort_noise {
            session.skip_comfort_noise();
            return;
        }

        if let Err(e) = session.send(chunk) {
            tracing::warn!("session {}: send failed: {}", handle.session_id(), e);
        }
    }

    /// Detach the tap. Idempotent; the socket is closed exactly once.
    pub fn detach(&self, handle: &TapHandle) {
        if let Some((id, session)) = self.taps.remove(handle.session_id()) {
            session.into_inner().close();
            tracing::info!("tap detached for session {}", id);
        } else {
            tracing::debug!(
                "detach for session {} ignored, no tap attached",
                handle.session_id()
            );
        }
    }

    /// Detach every active tap (host-driven shutdown).
    pub fn detach_all(&self) {
        let ids: Vec<String> = self.taps.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            self.detach(&TapHandle { session_id: id });
        }
    }

    pub fn is_attached(&self, session_id: &str) -> bool {
        self.taps.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Statistics of the session behind `handle`, if still attached
    pub fn session_stats(&self, handle: &TapHandle) -> Option<SessionStats> {
        self.taps
            .get(handle.session_id())
            .map(|entry| entry.lock().stats())
    }
}

impl Default for TapRegistry {
    fn default() -> Self {
        Self::new()
    }
}
