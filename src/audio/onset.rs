use std::collections::BTreeMap;

use rayon::prelude::*;

use super::signal::AudioSignal;
use super::spectrogram::Spectrogram;
use crate::chart::difficulty::{validate_profiles, Difficulty, DifficultyProfile};
use crate::error::{Error, Result};

/// Half-width of the centered flux baseline, in frames.
pub const BASELINE_RADIUS: usize = 20;
/// Constant added to the flux baseline so near-silent wiggles never count.
pub const BASELINE_BIAS: f64 = 0.5;
/// Every onset is shifted by this lead-in before it reaches the chart.
pub const LEAD_IN: f64 = 2.0;

/// Flux above its local baseline, frame by frame.
#[derive(Clone, Debug)]
pub struct OnsetEnvelope {
    pub times: Vec<f64>,
    pub difference: Vec<f64>,
}

impl OnsetEnvelope {
    pub fn analyze(signal: &AudioSignal) -> Result<Self> {
        signal.validate()?;

        let spectrogram = Spectrogram::compute(signal);
        let flux = spectrogram.flux();
        if let Some(pos) = flux.iter().position(|f| !f.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "spectral flux is not finite at frame {}",
                pos
            )));
        }

        log::info!(
            "Spectrogram: {} frames over {:.2}s",
            spectrogram.len(),
            signal.duration()
        );

        let baseline = rolling_baseline(flux);
        let difference = flux
            .iter()
            .zip(baseline.iter())
            .map(|(f, b)| f - b)
            .collect();

        Ok(Self {
            times: spectrogram.times,
            difference,
        })
    }

    /// Onset times (lead-in applied) for one peak-picking radius.
    pub fn onsets(&self, radius: usize) -> Vec<f64> {
        pick_peaks(&self.difference, radius)
            .into_iter()
            .map(|i| self.times[i] + LEAD_IN)
            .collect()
    }

    /// Onset times for each profile, picked in parallel.
    pub fn onsets_for(&self, profiles: &[DifficultyProfile]) -> BTreeMap<Difficulty, Vec<f64>> {
        profiles
            .par_iter()
            .map(|profile| {
                let onsets = self.onsets(profile.peak_radius);
                log::debug!(
                    "{}: radius {} -> {} onsets",
                    profile.difficulty,
                    profile.peak_radius,
                    onsets.len()
                );
                (profile.difficulty, onsets)
            })
            .collect()
    }
}

/// Detect onsets for each profile.
pub fn detect_onsets(
    signal: &AudioSignal,
    profiles: &[DifficultyProfile],
) -> Result<BTreeMap<Difficulty, Vec<f64>>> {
    validate_profiles(profiles)?;
    let envelope = OnsetEnvelope::analyze(signal)?;
    Ok(envelope.onsets_for(profiles))
}

/// Centered mean over `±BASELINE_RADIUS` frames, clipped at the edges, plus bias.
fn rolling_baseline(flux: &[f64]) -> Vec<f64> {
    let n = flux.len();
    (0..n)
        .map(|i| {
            let start = i.saturating_sub(BASELINE_RADIUS);
            let end = (i + BASELINE_RADIUS + 1).min(n);
            let sum: f64 = flux[start..end].iter().sum();
            sum / (end - start) as f64 + BASELINE_BIAS
        })
        .collect()
}

/// Frames that are positive and attain the maximum of their `±radius` window.
/// Frames closer than `radius` to either edge are never candidates. Plateaus
/// yield every frame that reaches the maximum.
fn pick_peaks(difference: &[f64], radius: usize) -> Vec<usize> {
    let n = difference.len();
    if n <= 2 * radius {
        return Vec::new();
    }

    (radius..n - radius)
        .filter(|&i| {
            let value = difference[i];
            value > 0.0
                && difference[i - radius..=i + radius]
                    .iter()
                    .all(|&other| other <= value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44100.0;

    fn impulse_at(seconds: f64, total: f64) -> AudioSignal {
        let mut samples = vec![0.0f32; (total * SR) as usize];
        samples[(seconds * SR) as usize] = 1.0;
        AudioSignal::new(samples, SR)
    }

    #[test]
    fn baseline_clips_at_edges() {
        let flux: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let baseline = rolling_baseline(&flux);
        // frame 0 averages frames 0..=20
        assert!((baseline[0] - (10.0 + BASELINE_BIAS)).abs() < 1e-12);
        // frame 25 averages frames 5..=45
        assert!((baseline[25] - (25.0 + BASELINE_BIAS)).abs() < 1e-12);
        // frame 49 averages frames 29..=49
        assert!((baseline[49] - (39.0 + BASELINE_BIAS)).abs() < 1e-12);
    }

    #[test]
    fn peaks_skip_edges_and_negatives() {
        let mut diff = vec![-1.0; 20];
        diff[1] = 5.0;
        diff[10] = 3.0;
        diff[14] = -0.1;
        assert_eq!(pick_peaks(&diff, 2), vec![10]);
    }

    #[test]
    fn plateau_yields_every_maximum() {
        let mut diff = vec![-1.0; 20];
        diff[9] = 2.0;
        diff[10] = 2.0;
        assert_eq!(pick_peaks(&diff, 3), vec![9, 10]);
    }

    #[test]
    fn short_series_yields_nothing() {
        let diff = vec![1.0, 2.0, 1.0, 0.5];
        assert!(pick_peaks(&diff, 2).is_empty());
        assert_eq!(pick_peaks(&[1.0, 0.5, 2.0, 1.0, 0.5], 2), vec![2]);
    }

    #[test]
    fn single_impulse_gives_one_onset_per_tier() {
        let signal = impulse_at(5.0, 10.0);
        let onsets = detect_onsets(&signal, &DifficultyProfile::all()).unwrap();
        assert_eq!(onsets.len(), 5);
        let frame_step = 10.0 / 429.0;
        for (tier, times) in &onsets {
            assert_eq!(times.len(), 1, "{} produced {:?}", tier, times);
            assert!(
                (times[0] - 7.0).abs() <= frame_step,
                "{} onset at {}",
                tier,
                times[0]
            );
        }
    }

    #[test]
    fn silence_gives_no_onsets() {
        let signal = AudioSignal::new(vec![0.0; 5 * SR as usize], SR);
        let onsets = detect_onsets(&signal, &DifficultyProfile::all()).unwrap();
        assert!(onsets.values().all(|times| times.is_empty()));
    }

    #[test]
    fn signal_shorter_than_window_gives_no_onsets() {
        let signal = AudioSignal::new(vec![0.5; 1000], SR);
        let onsets = detect_onsets(&signal, &DifficultyProfile::all()).unwrap();
        assert!(onsets.values().all(|times| times.is_empty()));
    }

    #[test]
    fn onsets_include_lead_in() {
        let signal = impulse_at(0.5, 2.0);
        let profile = DifficultyProfile::standard(Difficulty::ExpertPlus);
        let onsets = detect_onsets(&signal, &[profile]).unwrap();
        let times = &onsets[&Difficulty::ExpertPlus];
        assert_eq!(times.len(), 1);
        assert!(times[0] >= LEAD_IN);
        assert!((times[0] - 2.5).abs() < 0.05);
    }

    #[test]
    fn rejects_invalid_input() {
        let profiles = DifficultyProfile::all();
        assert!(detect_onsets(&AudioSignal::new(vec![], SR), &profiles).is_err());
        assert!(detect_onsets(&AudioSignal::new(vec![0.0; 4096], 0.0), &profiles).is_err());
        let mut bad = DifficultyProfile::standard(Difficulty::Easy);
        bad.peak_radius = 0;
        assert!(detect_onsets(&AudioSignal::new(vec![0.0; 4096], SR), &[bad]).is_err());
    }
}
