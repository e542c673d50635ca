// Library surface for the drill binary and integration tests.
// The engine modules perform no I/O; `runtime` and `config` hold the caller-side seams.
pub mod app_dirs;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod game;
pub mod pitch;
pub mod runtime;
pub mod scoring;
pub mod sequence;
pub mod session;
pub mod util;

pub use config::{ClefMode, Configuration};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use error::{ConfigError, PitchError};
pub use game::GameEngine;
pub use pitch::{Accidental, Clef};
pub use sequence::NoteSpec;
pub use session::{NoteInput, SessionCommand, SessionSnapshot, SessionStatus, SessionSummary};
