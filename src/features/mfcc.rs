//! MFCC feature extraction
//!
//! Produces one cepstral vector per analysis frame. These vectors feed the
//! self-similarity search in [`crate::matching`].
//!
//! Algorithm, per frame:
//! 1. Pre-emphasis inside the frame: `y[n] = x[n] - a * x[n - 1]`
//! 2. Hamming window
//! 3. FFT (zero-padded to a power of two), power spectrum
//! 4. Triangular mel filter bank, natural log
//! 5. DCT-II, keep the first `feature_count` coefficients
//!
//! Pre-emphasis never reaches across a frame boundary, so two frames with
//! identical samples always get identical coefficients.
//!
//! # Example
//!
//! ```no_run
//! use loop_finder::features::mfcc::MfccExtractor;
//! use loop_finder::AnalysisConfig;
//!
//! let samples = vec![0.0f32; 22050 * 10];
//! let extractor = MfccExtractor::new(22050, &AnalysisConfig::default())?;
//! let features = extractor.extract(&samples);
//! println!("{} frames", features.len());
//! # Ok::<(), loop_finder::AnalysisError>(())
//! ```

use super::mel::{dct_ii, MelFilterBank};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Number of analysis frames for `len` samples
///
/// `1 + (len - frame_size) / hop_size`, or 0 when the buffer is shorter
/// than one frame.
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    if len < frame_size || frame_size == 0 || hop_size == 0 {
        0
    } else {
        1 + (len - frame_size) / hop_size
    }
}

/// MFCC extractor with a pre-planned FFT
pub struct MfccExtractor {
    frame_size: usize,
    hop_size: usize,
    feature_count: usize,
    pre_emphasis: f32,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    fft_len: usize,
    mel: MelFilterBank,
}

impl MfccExtractor {
    /// Create an extractor for audio at `sample_rate`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the sample rate, frame size,
    /// hop size, mel band count or feature count is zero.
    pub fn new(sample_rate: u32, config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
        }
        if config.frame_size == 0 || config.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Frame size and hop size must be > 0".to_string(),
            ));
        }
        if config.feature_count == 0 || config.mel_bands == 0 {
            return Err(AnalysisError::InvalidInput(
                "Feature count and mel band count must be > 0".to_string(),
            ));
        }

        let fft_len = config.frame_size.next_power_of_two();
        let fft = FftPlanner::<f32>::new().plan_fft_forward(fft_len);

        Ok(Self {
            frame_size: config.frame_size,
            hop_size: config.hop_size,
            feature_count: config.feature_count,
            pre_emphasis: config.pre_emphasis,
            window: hamming(config.frame_size),
            fft,
            fft_len,
            mel: MelFilterBank::new(sample_rate, fft_len, config.mel_bands),
        })
    }

    /// Extract one feature vector per frame
    pub fn extract(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let frames = frame_count(samples.len(), self.frame_size, self.hop_size);
        log::debug!(
            "Extracting MFCC: {} samples, frame={}, hop={}, fft={}, {} frames",
            samples.len(),
            self.frame_size,
            self.hop_size,
            self.fft_len,
            frames
        );

        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.fft_len];
        let mut power = vec![0.0f32; self.fft_len / 2 + 1];

        (0..frames)
            .map(|t| {
                let start = t * self.hop_size;
                let frame = &samples[start..start + self.frame_size];
                self.frame_features(frame, &mut buffer, &mut power)
            })
            .collect()
    }

    fn frame_features(
        &self,
        frame: &[f32],
        buffer: &mut [Complex<f32>],
        power: &mut [f32],
    ) -> Vec<f32> {
        let mut prev = 0.0f32;
        for (n, slot) in buffer.iter_mut().enumerate() {
            *slot = if n < frame.len() {
                let x = frame[n];
                let emphasized = if n == 0 { x } else { x - self.pre_emphasis * prev };
                prev = x;
                Complex::new(emphasized * self.window[n], 0.0)
            } else {
                Complex::new(0.0, 0.0)
            };
        }

        self.fft.process(buffer);

        for (p, c) in power.iter_mut().zip(buffer.iter()) {
            *p = c.norm_sqr();
        }

        dct_ii(&self.mel.log_energies(power), self.feature_count)
    }
}

fn hamming(len: usize) -> Vec<f32> {
    if len == 1 {
        return vec![1.0];
    }
    (0..len)
        .map(|n| {
            0.54 - 0.46 * (2.0 * std::f32::consts::PI * n as f32 / (len - 1) as f32).cos()
        })
        .collect()
}
