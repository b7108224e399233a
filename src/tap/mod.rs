//! Host-facing tap adapter: audio chunk model and tap lifecycle registry.

pub mod chunk;
pub mod registry;

pub use chunk::{AudioChunk, ChunkFormat};
pub use registry::{TapHandle, TapRegistry};
