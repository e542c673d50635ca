use thiserror::Error;

/// Failure to read a textual pitch name such as `C#4` or `Bb-1`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PitchError {
    #[error("invalid pitch format: {0:?}")]
    InvalidPitchFormat(String),
}

/// Rejected session configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("lives must be between {min} and {max}, got {value}")]
    LivesOutOfRange { value: u8, min: u8, max: u8 },

    #[error("sequence length must be between {min} and {max}, got {value}")]
    SequenceLengthOutOfRange {
        value: usize,
        min: usize,
        max: usize,
    },
}
