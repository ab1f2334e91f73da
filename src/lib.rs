//! Rhythm-game chart generation from decoded audio.
//!
//! Onsets are picked from the spectral flux of the track at five difficulty
//! tiers, then each tier's onsets are turned into hand-aware note placements
//! by a seeded, weight-driven sequencer.

pub mod audio;
pub mod chart;
pub mod config;
pub mod error;
pub mod pipeline;

pub use audio::onset::detect_onsets;
pub use audio::signal::AudioSignal;
pub use chart::difficulty::{Difficulty, DifficultyProfile};
pub use chart::event::{NoteColor, NoteEvent, NoteRecord, SCHEMA_VERSION};
pub use chart::sequencer::{sequence, SequencerHistory};
pub use chart::shape::{decode, NoteShape, Placement};
pub use chart::weights::{WeightConfiguration, WeightTables};
pub use error::{Error, Result};
pub use pipeline::{generate_charts, generate_with_config, Charts};
