//! # Loop Finder
//!
//! Finds seamless loop points in recorded music and ambience: an early and a
//! late occurrence of the same passage, so playback can jump from the end of
//! the late occurrence back to the early one without an audible seam.
//!
//! ## Features
//!
//! - **MFCC Features**: Per-frame cepstral vectors (Hamming window, mel filter bank, DCT)
//! - **Cross-Half Matching**: Early vs late half, diagonal runs with threshold escalation
//! - **Global Fallback**: All-lags search when the repeat sits inside one half
//! - **Diagnostics**: Accepted threshold, ranked match spans and a waveform envelope
//!
//! ## Quick Start
//!
//! ```no_run
//! use loop_finder::{analyze_file, AnalysisConfig};
//!
//! let analysis = analyze_file("ambience.ogg", AnalysisConfig::default())?;
//!
//! println!(
//!     "Loop {:.3}s -> {:.3}s ({})",
//!     analysis.points.rewind_from_seconds,
//!     analysis.points.rewind_to_seconds,
//!     analysis.diagnostics.strategy.as_str()
//! );
//! # Ok::<(), loop_finder::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Decode → Downmix/Resample → MFCC → Normalize → Cross-half search ─┬→ Loop points
//!                                                  └→ Global fallback ┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod matching;
pub mod preprocessing;

use std::path::Path;
use std::time::Instant;

// Re-export main types
pub use analysis::loop_points::LoopPoints;
pub use analysis::result::{DiagnosticInfo, LoopAnalysis};
pub use analysis::waveform::MinMax;
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use matching::{MatchSpan, SearchStrategy};

use analysis::waveform::summarize_waveform;
use features::mfcc::MfccExtractor;
use matching::escalation::cross_half_search;
use matching::global::{global_search, FALLBACK_SIMILARITY_OFFSET};
use matching::similarity::FeatureTable;

/// Find loop points from precomputed feature vectors
///
/// Runs the matching pipeline on one feature vector per analysis frame:
/// normalize → cross-half search → global fallback if needed → loop points,
/// plus a waveform envelope of `samples` for diagnostics.
///
/// # Arguments
///
/// * `samples` - Mono audio samples the features were computed from
/// * `sample_rate` - Sample rate in Hz
/// * `features` - One equal-length feature vector per frame, advanced by `config.hop_size`
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// - `InvalidInput` for a zero sample rate or hop size, a negative or
///   non-finite minimum segment duration, or ragged features
/// - `InsufficientData` when there are fewer than twice the minimum segment frames
/// - `NoRepeatFound` when neither search finds a long enough run
pub fn find_loop_points(
    samples: &[f32],
    sample_rate: u32,
    features: Vec<Vec<f32>>,
    config: AnalysisConfig,
) -> Result<LoopAnalysis, AnalysisError> {
    let start_time = Instant::now();

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
    }
    if config.hop_size == 0 {
        return Err(AnalysisError::InvalidInput("Hop size must be > 0".to_string()));
    }
    if !config.min_segment_seconds.is_finite() || config.min_segment_seconds < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Minimum segment duration must be finite and >= 0, got {}",
            config.min_segment_seconds
        )));
    }

    let duration_seconds = samples.len() as f64 / sample_rate as f64;
    let frames_per_second = config.frames_per_second(sample_rate);
    let min_segment_frames = config.min_segment_frames(frames_per_second);
    let frames = features.len();

    log::debug!(
        "Finding loop points: {} frames at {:.3} fps, min segment {} frames, duration {:.2}s",
        frames,
        frames_per_second,
        min_segment_frames,
        duration_seconds
    );

    if frames < min_segment_frames.saturating_mul(2) {
        return Err(AnalysisError::InsufficientData {
            frames,
            min_segment_frames,
        });
    }

    let table = FeatureTable::from_frames(features)?;

    let cross = cross_half_search(&table, config.min_similarity, min_segment_frames);
    let found = match cross.found {
        Some(found) => found,
        None => {
            log::warn!(
                "Cross-half search found no run of {} frames down to {:.2}; trying global search",
                min_segment_frames,
                cross.thresholds_tried.last().copied().unwrap_or(config.min_similarity)
            );
            global_search(
                &table,
                config.min_similarity - FALLBACK_SIMILARITY_OFFSET,
                min_segment_frames,
            )
            .ok_or(AnalysisError::NoRepeatFound {
                min_similarity: config.min_similarity,
                min_segment_frames,
            })?
        }
    };

    let points = LoopPoints::from_match(
        &found,
        frames_per_second,
        duration_seconds,
        config.tail_guard_seconds,
    );

    log::info!(
        "Loop found ({}, similarity {:.2}): {} frames, {:.3}s -> {:.3}s",
        found.strategy.as_str(),
        found.similarity,
        found.length,
        points.rewind_from_seconds,
        points.rewind_to_seconds
    );

    let mut top_spans = cross.spans;
    top_spans.truncate(config.max_diagnostic_spans);

    let diagnostics = DiagnosticInfo {
        strategy: found.strategy,
        min_similarity_used: found.similarity,
        thresholds_tried: cross.thresholds_tried,
        frames,
        min_segment_frames,
        match_frames: found.length,
        early_start_frame: found.early_start_frame,
        late_start_frame: found.late_start_frame,
        duration_seconds,
        sample_rate,
        hop_size: config.hop_size,
        frames_per_second,
        top_spans,
        waveform: summarize_waveform(samples, config.waveform_bins),
        processing_time_ms: start_time.elapsed().as_secs_f32() * 1000.0,
    };

    Ok(LoopAnalysis {
        points,
        diagnostics,
    })
}

/// Main analysis function
///
/// Extracts MFCC features from mono samples and finds loop points.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// Returns `AnalysisError` for empty input, invalid parameters, audio too
/// short for the minimum segment, or when no repeat is found.
/// `ProcessingError` is returned when feature extraction yields NaN or
/// infinite coefficients (non-finite input samples).
///
/// # Example
///
/// ```no_run
/// use loop_finder::{analyze_audio, AnalysisConfig};
///
/// let samples = vec![0.0f32; 22050 * 60];
/// let analysis = analyze_audio(&samples, 22050, AnalysisConfig::default())?;
/// # Ok::<(), loop_finder::AnalysisError>(())
/// ```
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    config: AnalysisConfig,
) -> Result<LoopAnalysis, AnalysisError> {
    log::debug!("Starting loop analysis: {} samples at {} Hz", samples.len(), sample_rate);

    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty audio samples".to_string()));
    }

    let extractor = MfccExtractor::new(sample_rate, &config)?;
    let features = extractor.extract(samples);

    if let Some(frame) = features.iter().position(|f| f.iter().any(|v| !v.is_finite())) {
        return Err(AnalysisError::ProcessingError(format!(
            "MFCC extraction produced non-finite values at frame {}",
            frame
        )));
    }

    find_loop_points(samples, sample_rate, features, config)
}

/// Decode, downmix and resample an audio file, then find loop points
///
/// Audio is resampled to `config.target_sample_rate` before analysis.
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` if the file cannot be decoded,
/// otherwise the same errors as [`analyze_audio`].
pub fn analyze_file<P: AsRef<Path>>(
    path: P,
    config: AnalysisConfig,
) -> Result<LoopAnalysis, AnalysisError> {
    if config.target_sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Target sample rate must be > 0".to_string(),
        ));
    }

    let decoded = io::decoder::decode_audio(path.as_ref())?;
    let mono = preprocessing::channel_mixer::downmix_to_mono(&decoded.samples, decoded.channels);
    let samples = preprocessing::resample::resample_linear(
        &mono,
        decoded.sample_rate,
        config.target_sample_rate,
    );

    analyze_audio(&samples, config.target_sample_rate, config)
}
