use crate::scoring;
use crate::sequence::NoteSpec;
use serde::{Deserialize, Serialize};

/// A note-on event forwarded by the input transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    pub note: u8,
    pub velocity: u8,
}

/// Everything a caller can ask of a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionCommand {
    Input(NoteInput),
    Pause,
    Resume,
    Reset,
    ClearFlashError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum SessionStatus {
    Waiting,
    Paused,
    GameOver,
}

/// Complete state of one session at a point in time.
///
/// Transitions never mutate a snapshot; `GameEngine` returns a new value each call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub sequence: Vec<NoteSpec>,
    pub current_index: usize,
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub attempts: u32,
    pub correct: u32,
    pub lives: u8,
    pub avg_response_ms: u64,
    pub session_started_at: u64,
    pub expecting_note_since: u64,
    pub is_paused: bool,
    pub is_game_over: bool,
    pub flash_error: bool,
    pub last_was_correct: Option<bool>,
}

impl SessionSnapshot {
    pub fn new(sequence: Vec<NoteSpec>, lives: u8, now: u64) -> Self {
        Self {
            sequence,
            current_index: 0,
            score: 0,
            streak: 0,
            best_streak: 0,
            attempts: 0,
            correct: 0,
            lives,
            avg_response_ms: 0,
            session_started_at: now,
            expecting_note_since: now,
            is_paused: false,
            is_game_over: false,
            flash_error: false,
            last_was_correct: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_game_over {
            SessionStatus::GameOver
        } else if self.is_paused {
            SessionStatus::Paused
        } else {
            SessionStatus::Waiting
        }
    }

    pub fn expected_note(&self) -> Option<&NoteSpec> {
        self.sequence.get(self.current_index)
    }

    pub fn accuracy(&self) -> u32 {
        scoring::accuracy(self.correct, self.attempts)
    }

    pub fn notes_per_minute(&self) -> u32 {
        scoring::notes_per_minute(self.avg_response_ms)
    }

    pub fn summary(&self, now: u64) -> SessionSummary {
        let duration_secs = now.saturating_sub(self.session_started_at) as f64 / 1000.0;
        SessionSummary {
            duration_secs,
            score: self.score,
            final_score: scoring::final_score(self.score, duration_secs, self.correct),
            accuracy: self.accuracy(),
            notes_per_minute: self.notes_per_minute(),
            best_streak: self.best_streak,
            attempts: self.attempts,
            correct: self.correct,
        }
    }
}

/// End-of-session figures for the results screen and high-score keeper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub duration_secs: f64,
    pub score: u32,
    pub final_score: u32,
    pub accuracy: u32,
    pub notes_per_minute: u32,
    pub best_streak: u32,
    pub attempts: u32,
    pub correct: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::Clef;

    fn note(n: i32) -> NoteSpec {
        NoteSpec::natural(n, Clef::Treble)
    }

    #[test]
    fn test_new_snapshot() {
        let snap = SessionSnapshot::new(vec![note(60), note(62), note(64)], 3, 500);

        assert_eq!(snap.current_index, 0);
        assert_eq!(snap.lives, 3);
        assert_eq!(snap.session_started_at, 500);
        assert_eq!(snap.expecting_note_since, 500);
        assert_eq!(snap.last_was_correct, None);
        assert_eq!(snap.status(), SessionStatus::Waiting);
        assert_eq!(snap.expected_note().map(|n| n.note_number), Some(60));
    }

    #[test]
    fn test_status_precedence() {
        let mut snap = SessionSnapshot::new(vec![note(60)], 1, 0);
        snap.is_paused = true;
        assert_eq!(snap.status(), SessionStatus::Paused);
        snap.is_game_over = true;
        assert_eq!(snap.status(), SessionStatus::GameOver);
    }

    #[test]
    fn test_derived_metrics() {
        let mut snap = SessionSnapshot::new(vec![note(60)], 3, 0);
        assert_eq!(snap.accuracy(), 100);
        assert_eq!(snap.notes_per_minute(), 0);

        snap.attempts = 3;
        snap.correct = 2;
        snap.avg_response_ms = 500;
        assert_eq!(snap.accuracy(), 67);
        assert_eq!(snap.notes_per_minute(), 120);
    }

    #[test]
    fn test_summary() {
        let mut snap = SessionSnapshot::new(vec![note(60)], 3, 1_000);
        snap.score = 100;
        snap.correct = 10;
        snap.attempts = 12;
        snap.best_streak = 7;

        let summary = snap.summary(21_000);
        assert_eq!(summary.duration_secs, 20.0);
        assert_eq!(summary.final_score, 130);
        assert_eq!(summary.accuracy, 83);
        assert_eq!(summary.best_streak, 7);
    }

    #[test]
    fn test_snapshot_serializes_for_collaborators() {
        let snap = SessionSnapshot::new(vec![note(60)], 2, 0);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["lives"], 2);
        assert_eq!(json["sequence"][0]["clef"], "treble");
        assert_eq!(json["sequence"][0]["notation_key"], "c/4");
    }
}
