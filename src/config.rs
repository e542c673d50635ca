use crate::app_dirs::AppDirs;
use crate::difficulty::{Difficulty, DifficultyProfile};
use crate::error::ConfigError;
use crate::pitch::Clef;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MIN_LIVES: u8 = 1;
pub const MAX_LIVES: u8 = 5;
pub const MIN_SEQUENCE_LENGTH: usize = 3;
pub const MAX_SEQUENCE_LENGTH: usize = 20;

/// Clef selection: one fixed staff, or per-note assignment
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
pub enum ClefMode {
    Treble,
    Bass,
    #[default]
    Both,
}

impl ClefMode {
    /// The clef every note must carry, `None` for `Both`
    pub fn fixed(self) -> Option<Clef> {
        match self {
            ClefMode::Treble => Some(Clef::Treble),
            ClefMode::Bass => Some(Clef::Bass),
            ClefMode::Both => None,
        }
    }
}

/// Immutable session settings supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Configuration {
    pub difficulty: Difficulty,
    pub clef: ClefMode,
    pub lives: u8,
    pub sequence_length: usize,
    pub allow_double_accidentals: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl Configuration {
    /// Settings for a tier, using its default sequence length
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            clef: ClefMode::default(),
            lives: 3,
            sequence_length: difficulty.profile().default_sequence_length,
            allow_double_accidentals: false,
        }
    }

    pub fn profile(&self) -> DifficultyProfile {
        self.difficulty.profile()
    }

    /// Double accidentals only apply on the advanced tier
    pub fn double_accidentals_enabled(&self) -> bool {
        self.allow_double_accidentals && self.difficulty == Difficulty::Advanced
    }

    /// Copy with lives and sequence length pulled into their allowed ranges
    pub fn normalized(&self) -> Self {
        let lives = self.lives.clamp(MIN_LIVES, MAX_LIVES);
        if lives != self.lives {
            log::warn!("lives {} out of range, using {lives}", self.lives);
        }
        let sequence_length = self.sequence_length_in_range();
        if sequence_length != self.sequence_length {
            log::warn!(
                "sequence length {} out of range, using {sequence_length}",
                self.sequence_length
            );
        }
        Self {
            lives,
            sequence_length,
            ..self.clone()
        }
    }

    pub fn sequence_length_in_range(&self) -> usize {
        self.sequence_length.clamp(MIN_SEQUENCE_LENGTH, MAX_SEQUENCE_LENGTH)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_LIVES..=MAX_LIVES).contains(&self.lives) {
            return Err(ConfigError::LivesOutOfRange {
                value: self.lives,
                min: MIN_LIVES,
                max: MAX_LIVES,
            });
        }
        if !(MIN_SEQUENCE_LENGTH..=MAX_SEQUENCE_LENGTH).contains(&self.sequence_length) {
            return Err(ConfigError::SequenceLengthOutOfRange {
                value: self.sequence_length,
                min: MIN_SEQUENCE_LENGTH,
                max: MAX_SEQUENCE_LENGTH,
            });
        }
        Ok(())
    }
}

pub trait ConfigStore {
    fn load(&self) -> Configuration;
    fn save(&self, cfg: &Configuration) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("notedrill_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Configuration {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => {
                log::debug!("no settings at {}, using defaults", self.path.display());
                return Configuration::default();
            }
        };

        match serde_json::from_slice::<Configuration>(&bytes) {
            Ok(cfg) => match cfg.validate() {
                Ok(()) => cfg,
                Err(e) => {
                    log::warn!("ignoring settings at {}: {e}", self.path.display());
                    Configuration::default()
                }
            },
            Err(e) => {
                log::warn!("unreadable settings at {}: {e}", self.path.display());
                Configuration::default()
            }
        }
    }

    fn save(&self, cfg: &Configuration) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
