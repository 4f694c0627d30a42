//! Audio preprocessing modules
//!
//! Prepares decoded audio for feature extraction:
//! - Channel mixing (interleaved to mono)
//! - Resampling to the analysis sample rate

pub mod channel_mixer;
pub mod resample;
