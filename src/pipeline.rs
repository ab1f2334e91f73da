use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::audio::onset::OnsetEnvelope;
use crate::audio::signal::AudioSignal;
use crate::chart::difficulty::{validate_profiles, Difficulty, DifficultyProfile};
use crate::chart::event::NoteEvent;
use crate::chart::sequencer::sequence;
use crate::chart::weights::WeightConfiguration;
use crate::config::GeneratorConfig;
use crate::error::Result;

pub type Charts = BTreeMap<Difficulty, Vec<NoteEvent>>;

/// Random source for one tier. Seeding by tier keeps each chart stable no
/// matter which other tiers are generated alongside it.
pub fn tier_rng(seed: u64, difficulty: Difficulty) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(difficulty.index() as u64))
}

/// Detect onsets once, then sequence every requested tier in parallel.
pub fn generate_charts(
    signal: &AudioSignal,
    profiles: &[DifficultyProfile],
    weights: &WeightConfiguration,
    seed: u64,
) -> Result<Charts> {
    validate_profiles(profiles)?;

    log::info!("Detecting onsets...");
    let envelope = OnsetEnvelope::analyze(signal)?;
    let onsets = envelope.onsets_for(profiles);

    log::info!("Sequencing {} difficulties (seed={})...", profiles.len(), seed);
    let charts = profiles
        .par_iter()
        .map(|profile| -> Result<(Difficulty, Vec<NoteEvent>)> {
            let tier = profile.difficulty;
            let times = &onsets[&tier];
            if times.is_empty() {
                log::warn!("{}: no onsets detected", tier);
            }
            let mut rng = tier_rng(seed, tier);
            let notes = sequence(times, profile.sequencer_threshold, weights, &mut rng)
                .map_err(|e| e.in_tier(tier))?;
            log::info!("{}: {} onsets -> {} notes", tier, times.len(), notes.len());
            Ok((tier, notes))
        })
        .collect::<Result<Charts>>()?;

    Ok(charts)
}

/// Generate the tiers a [`GeneratorConfig`] selects, with its seed.
pub fn generate_with_config(
    signal: &AudioSignal,
    config: &GeneratorConfig,
    weights: &WeightConfiguration,
) -> anyhow::Result<Charts> {
    let profiles = config.profiles()?;
    let seed = config.resolve_seed();
    Ok(generate_charts(signal, &profiles, weights, seed)?)
}
