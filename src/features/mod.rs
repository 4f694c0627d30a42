//! Feature extraction modules
//!
//! Per-frame audio features for the similarity search:
//! - MFCC extraction (framing, windowing, FFT)
//! - Mel filter bank and DCT

pub mod mel;
pub mod mfcc;
