use serde::{Deserialize, Serialize};

/// Training tier, each mapping to a fixed `DifficultyProfile`
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Range and accidental rules for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub min_note: i32,
    pub max_note: i32,
    pub naturals_only: bool,
    pub accidental_probability: f64,
    pub double_accidental_probability: f64,
    pub max_ledger_lines: u8, // display hint only
    pub default_sequence_length: usize,
}

impl DifficultyProfile {
    pub fn contains(&self, n: i32) -> bool {
        (self.min_note..=self.max_note).contains(&n)
    }
}

const BEGINNER: DifficultyProfile = DifficultyProfile {
    min_note: 48,
    max_note: 72,
    naturals_only: true,
    accidental_probability: 0.0,
    double_accidental_probability: 0.0,
    max_ledger_lines: 1,
    default_sequence_length: 5,
};

const INTERMEDIATE: DifficultyProfile = DifficultyProfile {
    min_note: 43,
    max_note: 79,
    naturals_only: false,
    accidental_probability: 0.3,
    double_accidental_probability: 0.0,
    max_ledger_lines: 2,
    default_sequence_length: 8,
};

const ADVANCED: DifficultyProfile = DifficultyProfile {
    min_note: 36,
    max_note: 84,
    naturals_only: false,
    accidental_probability: 0.5,
    double_accidental_probability: 0.1,
    max_ledger_lines: 3,
    default_sequence_length: 12,
};

impl Difficulty {
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Beginner => BEGINNER,
            Difficulty::Intermediate => INTERMEDIATE,
            Difficulty::Advanced => ADVANCED,
        }
    }

    pub fn all() -> [Difficulty; 3] {
        [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ]
    }
}
