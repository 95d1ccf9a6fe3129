//! Fixed-table spaced repetition scheduling.
//!
//! Each difficulty has its own ladder of day intervals. A correct answer
//! climbs the ladder by one rung (with ±20% jitter so cards studied
//! together do not all come due on the same day); a miss drops the card
//! back to the first rung.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::intervals::{base_interval_days, intervals};
use crate::config::{JITTER_MAX, JITTER_MIN};
use crate::domain::{Difficulty, StudyRecord};

/// Scale `base_days` by a uniform factor in [JITTER_MIN, JITTER_MAX], truncating toward zero.
///
/// May return 0 for a 1-day base; a review due "today" is valid.
pub fn jittered_days<R: Rng + ?Sized>(base_days: i64, rng: &mut R) -> i64 {
  let variation: f64 = rng.random_range(JITTER_MIN..=JITTER_MAX);
  (base_days as f64 * variation) as i64
}

/// Interval in days until the next review.
pub fn next_interval_days<R: Rng + ?Sized>(
  difficulty: Difficulty,
  repetition_count: u32,
  is_correct: bool,
  rng: &mut R,
) -> i64 {
  if !is_correct {
    return intervals(difficulty)[0];
  }
  jittered_days(base_interval_days(difficulty, repetition_count), rng)
}

/// When a card should next be reviewed.
pub fn compute_next_review<R: Rng + ?Sized>(
  difficulty: Difficulty,
  repetition_count: u32,
  is_correct: bool,
  now: DateTime<Utc>,
  rng: &mut R,
) -> DateTime<Utc> {
  now + Duration::days(next_interval_days(difficulty, repetition_count, is_correct, rng))
}

/// Apply one study-mode answer to a record in place.
///
/// The repetition count is updated first; the next review is then computed
/// from the post-update count and the newly submitted difficulty.
pub fn apply_answer<R: Rng + ?Sized>(
  record: &mut StudyRecord,
  is_correct: bool,
  difficulty: Difficulty,
  now: DateTime<Utc>,
  rng: &mut R,
) {
  record.repetition_count = if is_correct {
    record.repetition_count.saturating_add(1)
  } else {
    0
  };
  record.difficulty = difficulty;
  record.next_review_at = Some(compute_next_review(
    difficulty,
    record.repetition_count,
    is_correct,
    now,
    rng,
  ));
}
