//! Daily challenge lifecycle: pending -> completed, never reopened.

use rand::prelude::IndexedRandom;
use rand::Rng;
use serde::Serialize;

use super::streak::StreakUpdate;
use crate::domain::{DailyChallenge, Deck};
use crate::error::{Result, StudyError};

/// Outcome of completing a challenge, including the streak it fed.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeCompletion {
  pub challenge_id: i64,
  pub score: i64,
  pub total: i64,
  pub accuracy: f64,
  pub streak: StreakUpdate,
}

/// Pick the deck for today's challenge.
///
/// Prefers the user's own public decks, then the fallback pool. None means
/// there is no eligible deck; callers skip the user for the day.
pub fn pick_challenge_deck<'a, R: Rng + ?Sized>(
  own_public: &'a [Deck],
  fallback: &'a [Deck],
  rng: &mut R,
) -> Option<&'a Deck> {
  if !own_public.is_empty() {
    own_public.choose(rng)
  } else {
    fallback.choose(rng)
  }
}

/// Fraction of correct answers; 0 when nothing was asked.
pub fn challenge_accuracy(score: i64, total: i64) -> Result<f64> {
  if score < 0 || total < 0 {
    return Err(StudyError::InvalidArgument(format!(
      "score and total must be non-negative, got {}/{}",
      score, total
    )));
  }
  if total == 0 {
    return Ok(0.0);
  }
  if score > total {
    return Err(StudyError::InvalidArgument(format!(
      "score {} exceeds total {}",
      score, total
    )));
  }
  Ok(score as f64 / total as f64)
}

/// Mark a pending challenge completed. Returns the accuracy in [0, 1].
///
/// A challenge that is already completed is left untouched.
pub fn complete_challenge(challenge: &mut DailyChallenge, score: i64, total: i64) -> Result<f64> {
  if challenge.completed {
    return Err(StudyError::AlreadyCompletedOrNotFound(challenge.id));
  }
  let accuracy = challenge_accuracy(score, total)?;
  challenge.completed = true;
  challenge.score = Some(score);
  challenge.accuracy_percent = Some(accuracy * 100.0);
  Ok(accuracy)
}
