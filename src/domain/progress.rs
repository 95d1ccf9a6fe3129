//! Gamification state: streaks, daily challenges and the activity trail.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Consecutive-day activity streak for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
  pub user_id: i64,
  pub current_streak: u32,
  /// Always >= current_streak
  pub longest_streak: u32,
  pub last_activity_date: Option<DateTime<Utc>>,
}

impl Streak {
  pub fn new(user_id: i64) -> Self {
    Self {
      user_id,
      current_streak: 0,
      longest_streak: 0,
      last_activity_date: None,
    }
  }

  /// Calendar day (UTC) of the last counted activity.
  pub fn last_activity_day(&self) -> Option<NaiveDate> {
    self.last_activity_date.map(|dt| dt.date_naive())
  }
}

/// One challenge per user per calendar day; `completed` flips false -> true once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChallenge {
  pub id: i64,
  pub user_id: i64,
  pub deck_id: i64,
  pub date: DateTime<Utc>,
  pub completed: bool,
  pub score: Option<i64>,
  pub accuracy_percent: Option<f64>,
}

impl DailyChallenge {
  pub fn new(user_id: i64, deck_id: i64, date: DateTime<Utc>) -> Self {
    Self {
      id: 0,
      user_id,
      deck_id,
      date,
      completed: false,
      score: None,
      accuracy_percent: None,
    }
  }

  pub fn day(&self) -> NaiveDate {
    self.date.date_naive()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
  CompleteChallenge,
}

impl ActionType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::CompleteChallenge => "complete_challenge",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "complete_challenge" => Some(Self::CompleteChallenge),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
  pub id: i64,
  pub user_id: i64,
  pub action_type: ActionType,
  pub resource_type: String,
  pub resource_id: i64,
  pub extra_data: serde_json::Value,
  pub created_at: DateTime<Utc>,
}
