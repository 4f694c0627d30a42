//! Error types for the loop analysis engine

use std::fmt;

/// Errors that can occur during loop analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Audio decoding error
    DecodingError(String),

    /// Too few feature frames for the requested minimum segment length.
    ///
    /// Raised before any search runs.
    InsufficientData {
        /// Feature frames available
        frames: usize,
        /// Minimum segment length in frames
        min_segment_frames: usize,
    },

    /// Neither the cross-half search nor the global fallback found a run of
    /// at least `min_segment_frames` frames
    NoRepeatFound {
        /// Configured target similarity
        min_similarity: f64,
        /// Minimum segment length in frames
        min_segment_frames: usize,
    },

    /// Feature extraction produced unusable output (non-finite coefficients)
    ProcessingError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::InsufficientData {
                frames,
                min_segment_frames,
            } => write!(
                f,
                "Audio too short for requested minimum segment length: {} frames, need at least {}",
                frames,
                min_segment_frames.saturating_mul(2)
            ),
            AnalysisError::NoRepeatFound {
                min_similarity,
                min_segment_frames,
            } => write!(
                f,
                "No sufficiently long repeated segment found (similarity {:.2}, {} frames). \
                 Try lowering the minimum similarity or minimum segment duration",
                min_similarity, min_segment_frames
            ),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
