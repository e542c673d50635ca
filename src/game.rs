use crate::config::Configuration;
use crate::runtime::{Clock, Randomness};
use crate::scoring;
use crate::sequence::{generate_sequence, regenerate_sequence};
use crate::session::{NoteInput, SessionCommand, SessionSnapshot};

/// Session state machine over an injected clock and randomness source.
///
/// Every transition takes the current snapshot by reference and returns the next
/// one; the engine keeps no reference to either.
#[derive(Debug)]
pub struct GameEngine<C, R> {
    clock: C,
    rng: R,
}

impl<C: Clock, R: Randomness> GameEngine<C, R> {
    pub fn new(clock: C, rng: R) -> Self {
        Self { clock, rng }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Out-of-range lives or sequence length are clamped, never rejected
    pub fn start(&mut self, config: &Configuration) -> SessionSnapshot {
        let now = self.clock.now_ms();
        let config = config.normalized();
        let sequence = generate_sequence(&config, &mut self.rng);
        log::debug!(
            "session started: {} notes, {} lives, {}",
            sequence.len(),
            config.lives,
            config.difficulty
        );
        SessionSnapshot::new(sequence, config.lives, now)
    }

    /// Abandon the current session and begin a new one
    pub fn reset(&mut self, config: &Configuration) -> SessionSnapshot {
        self.start(config)
    }

    pub fn handle_input(
        &mut self,
        snapshot: &SessionSnapshot,
        input: NoteInput,
        config: &Configuration,
    ) -> SessionSnapshot {
        if snapshot.is_paused || snapshot.is_game_over {
            return snapshot.clone();
        }
        let Some(expected) = snapshot.expected_note() else {
            log::debug!("input with no expected note at index {}", snapshot.current_index);
            return snapshot.clone();
        };

        let now = self.clock.now_ms();
        let is_match = i32::from(input.note) == expected.note_number;
        let mut next = snapshot.clone();
        next.attempts += 1;

        if is_match {
            self.on_correct(next, now, config)
        } else {
            self.on_miss(next, now, config)
        }
    }

    fn on_correct(
        &mut self,
        mut next: SessionSnapshot,
        now: u64,
        config: &Configuration,
    ) -> SessionSnapshot {
        let response_ms = now.saturating_sub(next.expecting_note_since);
        let update = scoring::score_for_correct(next.score, next.streak);

        next.score = update.score;
        next.streak = update.streak;
        next.best_streak = next.best_streak.max(update.streak);
        next.correct += 1;
        next.avg_response_ms =
            scoring::update_avg_response_time(next.avg_response_ms, response_ms, next.correct);

        if next.current_index + 1 >= next.sequence.len() {
            log::debug!("sequence completed, streak {}", next.streak);
            next.sequence = regenerate_sequence(config, &mut self.rng);
            next.current_index = 0;
        } else {
            next.current_index += 1;
        }

        next.expecting_note_since = now;
        next.flash_error = false;
        next.last_was_correct = Some(true);
        next
    }

    fn on_miss(
        &mut self,
        mut next: SessionSnapshot,
        now: u64,
        config: &Configuration,
    ) -> SessionSnapshot {
        next.lives = next.lives.saturating_sub(1);
        next.streak = 0;
        next.flash_error = true;
        next.last_was_correct = Some(false);

        if next.lives == 0 {
            log::debug!(
                "game over: score {}, {}/{} correct",
                next.score,
                next.correct,
                next.attempts
            );
            next.is_game_over = true;
            return next;
        }

        log::debug!("miss, {} lives left, new sequence", next.lives);
        next.sequence = regenerate_sequence(config, &mut self.rng);
        next.current_index = 0;
        next.expecting_note_since = now;
        next
    }

    pub fn pause(&self, snapshot: &SessionSnapshot) -> SessionSnapshot {
        SessionSnapshot {
            is_paused: true,
            ..snapshot.clone()
        }
    }

    /// Unpause and restart the response timer so paused time is never scored
    pub fn resume(&self, snapshot: &SessionSnapshot) -> SessionSnapshot {
        SessionSnapshot {
            is_paused: false,
            expecting_note_since: self.clock.now_ms(),
            ..snapshot.clone()
        }
    }

    pub fn clear_flash_error(&self, snapshot: &SessionSnapshot) -> SessionSnapshot {
        SessionSnapshot {
            flash_error: false,
            ..snapshot.clone()
        }
    }

    pub fn apply(
        &mut self,
        snapshot: &SessionSnapshot,
        command: SessionCommand,
        config: &Configuration,
    ) -> SessionSnapshot {
        match command {
            SessionCommand::Input(input) => self.handle_input(snapshot, input, config),
            SessionCommand::Pause => self.pause(snapshot),
            SessionCommand::Resume => self.resume(snapshot),
            SessionCommand::Reset => self.reset(config),
            SessionCommand::ClearFlashError => self.clear_flash_error(snapshot),
        }
    }
}
