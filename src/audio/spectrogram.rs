use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use super::signal::AudioSignal;

pub const WINDOW_SIZE: usize = 2048;
pub const HOP_SIZE: usize = WINDOW_SIZE / 2;

/// Hann-windowed magnitude spectrogram, reduced frame by frame to its flux.
/// Each frame's `WINDOW_SIZE / 2 + 1` bins are summed as soon as they are
/// computed; only the per-frame totals are kept.
#[derive(Clone, Debug)]
pub struct Spectrogram {
    flux: Vec<f64>,
    /// Playback time of each frame in seconds
    pub times: Vec<f64>,
}

impl Spectrogram {
    pub fn compute(signal: &AudioSignal) -> Self {
        let samples = &signal.samples;
        let len = frame_count(samples.len());
        if len == 0 {
            return Self {
                flux: Vec::new(),
                times: Vec::new(),
            };
        }

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(WINDOW_SIZE);
        let hann = hann_window(WINDOW_SIZE);
        let bins = WINDOW_SIZE / 2 + 1;

        let flux: Vec<f64> = (0..len)
            .into_par_iter()
            .map(|frame_idx| {
                let start = frame_idx * HOP_SIZE;
                let mut buffer: Vec<Complex<f32>> = samples[start..start + WINDOW_SIZE]
                    .iter()
                    .zip(hann.iter())
                    .map(|(&s, &w)| Complex::new(s * w, 0.0))
                    .collect();
                fft.process(&mut buffer);
                buffer[..bins].iter().map(|c| c.norm() as f64).sum()
            })
            .collect();

        let step = signal.duration() / len as f64;
        let times = (0..len).map(|i| i as f64 * step).collect();

        Self { flux, times }
    }

    pub fn len(&self) -> usize {
        self.flux.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }

    /// Per-frame sum of magnitudes across all bins.
    pub fn flux(&self) -> &[f64] {
        &self.flux
    }
}

/// Number of full windows that fit in `num_samples` at the fixed hop.
pub fn frame_count(num_samples: usize) -> usize {
    if num_samples < WINDOW_SIZE {
        0
    } else {
        (num_samples - WINDOW_SIZE) / HOP_SIZE + 1
    }
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_matches_hop_layout() {
        assert_eq!(frame_count(0), 0);
        assert_eq!(frame_count(WINDOW_SIZE - 1), 0);
        assert_eq!(frame_count(WINDOW_SIZE), 1);
        assert_eq!(frame_count(WINDOW_SIZE + HOP_SIZE - 1), 1);
        assert_eq!(frame_count(WINDOW_SIZE + HOP_SIZE), 2);
        assert_eq!(frame_count(441_000), 429);
    }

    #[test]
    fn short_signal_has_no_frames() {
        let spec = Spectrogram::compute(&AudioSignal::new(vec![1.0; 100], 44100.0));
        assert!(spec.is_empty());
        assert!(spec.flux().is_empty());
    }

    #[test]
    fn frame_times_span_duration() {
        let signal = AudioSignal::new(vec![0.0; 441_000], 44100.0);
        let spec = Spectrogram::compute(&signal);
        assert_eq!(spec.len(), 429);
        assert_eq!(spec.flux().len(), 429);
        assert_eq!(spec.times[0], 0.0);
        let step = 10.0 / 429.0;
        assert!((spec.times[428] - 428.0 * step).abs() < 1e-9);
    }

    #[test]
    fn silence_has_zero_flux() {
        let spec = Spectrogram::compute(&AudioSignal::new(vec![0.0; 8192], 44100.0));
        assert!(spec.flux().iter().all(|&f| f == 0.0));
    }

    #[test]
    fn centered_impulse_sums_every_bin() {
        let mut samples = vec![0.0f32; WINDOW_SIZE];
        samples[WINDOW_SIZE / 2] = 1.0;
        let spec = Spectrogram::compute(&AudioSignal::new(samples, 44100.0));
        assert_eq!(spec.len(), 1);
        // flat unit spectrum across all one-sided bins
        let bins = (WINDOW_SIZE / 2 + 1) as f64;
        assert!((spec.flux()[0] - bins).abs() < 0.1, "flux {}", spec.flux()[0]);
    }
}
