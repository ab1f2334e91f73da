use crate::error::{Error, Result};

/// Mono PCM handed over by the audio pipeline.
#[derive(Clone, Debug)]
pub struct AudioSignal {
    pub samples: Vec<f32>,
    pub sample_rate: f64,
}

impl AudioSignal {
    pub fn new(samples: Vec<f32>, sample_rate: f64) -> Self {
        Self { samples, sample_rate }
    }

    /// Collapse interleaved multi-channel PCM to mono by summing the
    /// channel values of each sample frame.
    pub fn from_interleaved(samples: &[f32], channels: usize, sample_rate: f64) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidInput("channel count must be at least 1".into()));
        }
        if samples.len() % channels != 0 {
            return Err(Error::InvalidInput(format!(
                "{} interleaved samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }

        let mono = if channels == 1 {
            samples.to_vec()
        } else {
            samples
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>())
                .collect()
        };

        Ok(Self::new(mono, sample_rate))
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// Reject signals the detector cannot analyze.
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.samples.is_empty() {
            return Err(Error::InvalidInput("audio signal is empty".into()));
        }
        if let Some(pos) = self.samples.iter().position(|s| !s.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "non-finite sample at index {}",
                pos
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_channels_per_frame() {
        let stereo = [0.25, 0.5, -1.0, 0.5, 0.0, 0.0];
        let signal = AudioSignal::from_interleaved(&stereo, 2, 8000.0).unwrap();
        assert_eq!(signal.samples, vec![0.75, -0.5, 0.0]);
        assert_eq!(signal.sample_rate, 8000.0);
    }

    #[test]
    fn mono_passes_through() {
        let signal = AudioSignal::from_interleaved(&[0.1, 0.2], 1, 100.0).unwrap();
        assert_eq!(signal.samples, vec![0.1, 0.2]);
        assert!((signal.duration() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn rejects_partial_frames_and_zero_channels() {
        assert!(AudioSignal::from_interleaved(&[0.0; 3], 2, 100.0).is_err());
        assert!(AudioSignal::from_interleaved(&[0.0; 4], 0, 100.0).is_err());
    }

    #[test]
    fn validation() {
        assert!(AudioSignal::new(vec![], 44100.0).validate().is_err());
        assert!(AudioSignal::new(vec![0.0], 0.0).validate().is_err());
        assert!(AudioSignal::new(vec![0.0], -1.0).validate().is_err());
        assert!(AudioSignal::new(vec![0.0], f64::NAN).validate().is_err());
        assert!(AudioSignal::new(vec![0.0, f32::NAN], 44100.0).validate().is_err());
        assert!(AudioSignal::new(vec![0.0], 44100.0).validate().is_ok());
    }
}
