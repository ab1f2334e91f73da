use thiserror::Error;

use crate::chart::difficulty::Difficulty;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid weight configuration: {0}")]
    Configuration(String),

    #[error("All shape weights are zero at onset {index} ({time:.3}s)")]
    DegenerateWeights { index: usize, time: f64 },

    #[error("{tier}: {source}")]
    Tier {
        tier: Difficulty,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn in_tier(self, tier: Difficulty) -> Self {
        Error::Tier {
            tier,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
