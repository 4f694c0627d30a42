//! Sample rate conversion

/// Resample mono audio using linear interpolation
///
/// Returns a copy of the input when the rates match. Output length is
/// `round(len * to_rate / from_rate)`.
///
/// # Arguments
///
/// * `samples` - Mono samples
/// * `from_rate` - Input sample rate in Hz
/// * `to_rate` - Output sample rate in Hz
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    let from_rate = from_rate.max(1);
    let to_rate = to_rate.max(1);
    if samples.is_empty() || from_rate == to_rate {
        return samples.to_vec();
    }

    let out_len = (samples.len() as f64 * to_rate as f64 / from_rate as f64).round() as usize;
    log::debug!(
        "Resampling {} samples {} Hz -> {} Hz ({} samples)",
        samples.len(),
        from_rate,
        to_rate,
        out_len
    );

    let step = from_rate as f64 / to_rate as f64;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx0 = (pos.floor() as usize).min(last);
            let idx1 = (idx0 + 1).min(last);
            let frac = (pos - idx0 as f64).clamp(0.0, 1.0) as f32;
            samples[idx0] + (samples[idx1] - samples[idx0]) * frac
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_rate_is_identity() {
        let samples = vec![0.1, 0.2, -0.3];
        assert_eq!(resample_linear(&samples, 44100, 44100), samples);
    }

    #[test]
    fn test_downsample_length() {
        let samples = vec![0.0; 44100];
        assert_eq!(resample_linear(&samples, 44100, 22050).len(), 22050);
    }

    #[test]
    fn test_upsample_interpolates_ramp() {
        let ramp: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let out = resample_linear(&ramp, 1000, 2000);
        assert_eq!(out.len(), 20);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[2] - 1.0).abs() < 1e-6);
        // Last output position clamps at the final input sample
        assert!((out[19] - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_input() {
        assert!(resample_linear(&[], 48000, 22050).is_empty());
    }
}
