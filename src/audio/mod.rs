pub mod onset;
pub mod signal;
pub mod spectrogram;
