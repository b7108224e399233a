//! G.711 A-law codec
//!
//! Pure sample-level conversion plus a per-session encoder with
//! frame capping and reusable scratch storage.

pub mod alaw;

pub use alaw::{alaw_to_linear, linear_to_alaw, AlawEncoder};
