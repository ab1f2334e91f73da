pub mod difficulty;
pub mod event;
pub mod sequencer;
pub mod shape;
pub mod weights;
