//! Analysis output modules
//!
//! Turns an accepted match into the values callers consume:
//! - Loop points in seconds
//! - Waveform envelope
//! - Result and diagnostics types

pub mod loop_points;
pub mod result;
pub mod waveform;
