//! Mel filter bank and DCT-II for cepstral coefficients

/// Floor applied before taking the log of a filter energy
const LOG_FLOOR: f32 = 1e-10;

/// Triangular mel filters over `[0, sample_rate / 2]`
#[derive(Debug, Clone)]
pub struct MelFilterBank {
    filters: Vec<Vec<(usize, f32)>>,
}

impl MelFilterBank {
    /// Build `bands` triangular filters for an FFT of `fft_len` points
    pub fn new(sample_rate: u32, fft_len: usize, bands: usize) -> Self {
        let nyquist = sample_rate as f32 * 0.5;
        let mel_max = hz_to_mel(nyquist);

        let bins: Vec<usize> = (0..bands + 2)
            .map(|i| {
                let mel = mel_max * i as f32 / (bands + 1) as f32;
                freq_to_bin(mel_to_hz(mel), sample_rate, fft_len)
            })
            .collect();

        let filters = (0..bands)
            .map(|m| {
                let left = bins[m];
                let center = bins[m + 1];
                let right = bins[m + 2].max(center + 1);
                triangle(left, center, right)
            })
            .collect();

        Self { filters }
    }

    /// Number of filters
    pub fn bands(&self) -> usize {
        self.filters.len()
    }

    /// Log filter energies for one power spectrum (`fft_len / 2 + 1` bins)
    pub fn log_energies(&self, power: &[f32]) -> Vec<f32> {
        self.filters
            .iter()
            .map(|filter| {
                let energy: f64 = filter
                    .iter()
                    .map(|&(bin, weight)| {
                        power.get(bin).copied().unwrap_or(0.0) as f64 * weight as f64
                    })
                    .sum();
                let energy = energy as f32;
                // NaN must survive the floor so callers can detect it
                if energy.is_nan() {
                    energy
                } else {
                    energy.max(LOG_FLOOR).ln()
                }
            })
            .collect()
    }
}

fn triangle(left: usize, center: usize, right: usize) -> Vec<(usize, f32)> {
    (left..=right)
        .filter_map(|bin| {
            let w = if bin < center {
                (bin - left) as f32 / (center - left) as f32
            } else {
                (right - bin) as f32 / (right - center) as f32
            };
            (w > 0.0).then_some((bin, w))
        })
        .collect()
}

fn freq_to_bin(freq_hz: f32, sample_rate: u32, fft_len: usize) -> usize {
    let bin = (freq_hz.max(0.0) * fft_len as f32 / sample_rate.max(1) as f32).floor() as usize;
    bin.min(fft_len / 2)
}

fn hz_to_mel(hz: f32) -> f32 {
    1127.0 * (1.0 + hz / 700.0).ln()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * ((mel / 1127.0).exp() - 1.0)
}

/// First `count` DCT-II coefficients of `values`
pub fn dct_ii(values: &[f32], count: usize) -> Vec<f32> {
    let n = values.len().max(1) as f64;
    (0..count)
        .map(|k| {
            values
                .iter()
                .enumerate()
                .map(|(m, &v)| {
                    let angle = std::f64::consts::PI * k as f64 * (m as f64 + 0.5) / n;
                    v as f64 * angle.cos()
                })
                .sum::<f64>() as f32
        })
        .collect()
}
