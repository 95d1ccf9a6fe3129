use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Difficulty;

/// A deck as seen by the scheduler: ownership and visibility only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
  pub id: i64,
  pub owner_id: i64,
  pub title: String,
  pub is_public: bool,
}

/// The unit being scheduled. Content lives with the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
  pub id: i64,
  pub deck_id: i64,
  pub question: String,
}

/// Per-user, per-card spaced repetition state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRecord {
  pub user_id: i64,
  pub card_id: i64,
  /// Consecutive correct study-mode answers; reset to 0 on a miss
  pub repetition_count: u32,
  /// Most recent self-assessment, not an average
  pub difficulty: Difficulty,
  /// None only before the first scheduled review
  pub next_review_at: Option<DateTime<Utc>>,
}

impl StudyRecord {
  pub fn new(user_id: i64, card_id: i64, difficulty: Difficulty) -> Self {
    Self {
      user_id,
      card_id,
      repetition_count: 0,
      difficulty,
      next_review_at: None,
    }
  }

  /// A record with no scheduled time is treated as due.
  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.next_review_at.is_none_or(|at| at <= now)
  }
}
