use serde::{Deserialize, Serialize};

pub const POINTS_PER_NOTE: u32 = 10;
pub const STREAK_BONUS: u32 = 5;
pub const STREAK_BONUS_EVERY: u32 = 5;

/// Seconds per note under which the final score earns a speed bonus
pub const SPEED_BONUS_TARGET_SECS: f64 = 5.0;

const RESPONSE_HISTORY_WEIGHT: f64 = 0.7;
const RESPONSE_SAMPLE_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub score: u32,
    pub streak: u32,
    pub bonus: u32,
}

pub fn score_for_correct(current_score: u32, current_streak: u32) -> ScoreUpdate {
    let streak = current_streak + 1;
    let bonus = if streak % STREAK_BONUS_EVERY == 0 {
        STREAK_BONUS
    } else {
        0
    };
    ScoreUpdate {
        score: current_score + POINTS_PER_NOTE + bonus,
        streak,
        bonus,
    }
}

/// Percentage of correct attempts, 100 before any attempt
pub fn accuracy(correct: u32, attempts: u32) -> u32 {
    if attempts == 0 {
        return 100;
    }
    ((correct as f64 / attempts as f64) * 100.0).round() as u32
}

/// Exponential moving average of response times, weighted towards recent notes.
/// `total_correct_so_far` counts the note that produced `new_sample_ms`.
pub fn update_avg_response_time(
    current_avg_ms: u64,
    new_sample_ms: u64,
    total_correct_so_far: u32,
) -> u64 {
    if total_correct_so_far <= 1 {
        return new_sample_ms;
    }
    (current_avg_ms as f64 * RESPONSE_HISTORY_WEIGHT + new_sample_ms as f64 * RESPONSE_SAMPLE_WEIGHT)
        .round() as u64
}

pub fn notes_per_minute(avg_ms: u64) -> u32 {
    if avg_ms == 0 {
        return 0;
    }
    (60_000.0 / avg_ms as f64).round() as u32
}

/// Base score plus a bonus for averaging under five seconds per correct note
pub fn final_score(base_score: u32, duration_secs: f64, correct: u32) -> u32 {
    let avg_sec_per_note = duration_secs / correct.max(1) as f64;
    let speed_bonus = ((SPEED_BONUS_TARGET_SECS - avg_sec_per_note) * correct as f64)
        .floor()
        .max(0.0);
    base_score + speed_bonus as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_for_correct_plain() {
        let update = score_for_correct(0, 0);
        assert_eq!(
            update,
            ScoreUpdate {
                score: 10,
                streak: 1,
                bonus: 0
            }
        );
    }

    #[test]
    fn test_score_for_correct_streak_bonus() {
        let update = score_for_correct(40, 4);
        assert_eq!(update.streak, 5);
        assert_eq!(update.bonus, 5);
        assert_eq!(update.score, 55);

        assert_eq!(score_for_correct(0, 9).bonus, 5);
        assert_eq!(score_for_correct(0, 5).bonus, 0);
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(0, 0), 100);
        assert_eq!(accuracy(2, 3), 67);
        assert_eq!(accuracy(1, 3), 33);
        assert_eq!(accuracy(1, 2), 50);
        assert_eq!(accuracy(0, 4), 0);
        assert_eq!(accuracy(7, 7), 100);
    }

    #[test]
    fn test_update_avg_response_time() {
        assert_eq!(update_avg_response_time(0, 800, 1), 800);
        assert_eq!(update_avg_response_time(1000, 500, 2), 850);
        assert_eq!(update_avg_response_time(850, 1200, 3), 955);
        // 0.7 * 1001 + 0.3 * 0 = 700.7
        assert_eq!(update_avg_response_time(1001, 0, 4), 701);
    }

    #[test]
    fn test_notes_per_minute() {
        assert_eq!(notes_per_minute(1000), 60);
        assert_eq!(notes_per_minute(500), 120);
        assert_eq!(notes_per_minute(0), 0);
        assert_eq!(notes_per_minute(700), 86);
    }

    #[test]
    fn test_final_score_speed_bonus() {
        // 20s over 10 notes = 2s per note, bonus floor(3 * 10) = 30
        assert_eq!(final_score(100, 20.0, 10), 130);
        // Slower than five seconds per note earns nothing
        assert_eq!(final_score(100, 80.0, 10), 100);
        // Exactly five seconds per note earns nothing
        assert_eq!(final_score(50, 25.0, 5), 50);
    }

    #[test]
    fn test_final_score_without_correct_notes() {
        assert_eq!(final_score(0, 3.0, 0), 0);
        assert_eq!(final_score(0, 0.0, 0), 0);
    }

    #[test]
    fn test_final_score_floors_fractional_bonus() {
        // 4.5s over 1 note: (5 - 4.5) * 1 = 0.5 -> 0
        assert_eq!(final_score(10, 4.5, 1), 10);
        // 7s over 2 notes: (5 - 3.5) * 2 = 3
        assert_eq!(final_score(20, 7.0, 2), 23);
    }
}
