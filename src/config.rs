use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::chart::difficulty::{Difficulty, DifficultyProfile};
use crate::chart::weights::WeightConfiguration;

#[derive(Debug, Deserialize)]
pub struct GeneratorConfig {
    /// Fixed seed for reproducible charts; drawn from OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_difficulties")]
    pub difficulties: Vec<String>,
    /// JSON file holding the shape weight tables
    #[serde(default)]
    pub weights: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            difficulties: default_difficulties(),
            weights: None,
        }
    }
}

fn default_difficulties() -> Vec<String> {
    Difficulty::ALL.iter().map(|d| d.name().to_string()).collect()
}

impl GeneratorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse generator config")
    }

    /// Standard profiles for the selected tiers, Easy first.
    pub fn profiles(&self) -> Result<Vec<DifficultyProfile>> {
        let mut selected = Vec::with_capacity(self.difficulties.len());
        for name in &self.difficulties {
            let difficulty = Difficulty::from_name(name)
                .with_context(|| format!("Unknown difficulty '{}'", name))?;
            if !selected.contains(&difficulty) {
                selected.push(difficulty);
            }
        }
        if selected.is_empty() {
            anyhow::bail!("No difficulties selected");
        }
        selected.sort();
        Ok(selected.into_iter().map(DifficultyProfile::standard).collect())
    }

    /// The configured seed, or a fresh one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            let seed: u64 = rand::random();
            log::info!("No seed configured, using {}", seed);
            seed
        })
    }
}

pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    GeneratorConfig::from_toml_str(&content)
        .with_context(|| format!("Invalid config: {}", path.display()))
}

pub fn load_weights(path: &Path) -> Result<WeightConfiguration> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read weight tables: {}", path.display()))?;
    let weights = WeightConfiguration::from_json(&content)
        .with_context(|| format!("Invalid weight tables: {}", path.display()))?;
    log::info!("Loaded weight tables from {}", path.display());
    Ok(weights)
}
