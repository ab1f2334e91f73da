use std::fmt;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Expert,
    ExpertPlus,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Expert,
        Difficulty::ExpertPlus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
            Difficulty::ExpertPlus => "ExpertPlus",
        }
    }

    /// Position in the Easy..ExpertPlus ordering.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name == "Expert+" {
            return Some(Difficulty::ExpertPlus);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-tier knobs for peak picking and sequencing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyProfile {
    pub difficulty: Difficulty,
    /// Half-width of the peak-picking window, in frames
    pub peak_radius: usize,
    /// Gap (seconds) below which note patterns tighten
    pub sequencer_threshold: f64,
}

impl DifficultyProfile {
    pub fn standard(difficulty: Difficulty) -> Self {
        let (peak_radius, sequencer_threshold) = match difficulty {
            Difficulty::Easy => (10, 2.0),
            Difficulty::Normal => (7, 1.0),
            Difficulty::Hard => (5, 0.5),
            Difficulty::Expert => (3, 0.3),
            Difficulty::ExpertPlus => (2, 0.2),
        };
        Self {
            difficulty,
            peak_radius,
            sequencer_threshold,
        }
    }

    pub fn all() -> Vec<Self> {
        Difficulty::ALL.iter().map(|&d| Self::standard(d)).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.peak_radius == 0 {
            return Err(Error::InvalidInput(format!(
                "{}: peak radius must be positive",
                self.difficulty
            )));
        }
        if !self.sequencer_threshold.is_finite() || self.sequencer_threshold <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "{}: sequencer threshold must be positive, got {}",
                self.difficulty, self.sequencer_threshold
            )));
        }
        Ok(())
    }
}

/// Check a profile set: non-empty, each valid, no tier listed twice.
pub fn validate_profiles(profiles: &[DifficultyProfile]) -> Result<()> {
    if profiles.is_empty() {
        return Err(Error::InvalidInput("no difficulty profiles given".into()));
    }
    for (i, profile) in profiles.iter().enumerate() {
        profile.validate()?;
        if profiles[..i].iter().any(|p| p.difficulty == profile.difficulty) {
            return Err(Error::InvalidInput(format!(
                "difficulty {} listed more than once",
                profile.difficulty
            )));
        }
    }
    Ok(())
}
