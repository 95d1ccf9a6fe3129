//! Daily streak state machine.
//!
//! A streak advances at most once per UTC calendar day. The first update of
//! a day decides the outcome; later updates that day leave state untouched.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::config::STREAK_ACCURACY_THRESHOLD;
use crate::domain::Streak;
use crate::error::{Result, StudyError};

/// What a single update did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTransition {
  /// Already updated today; nothing changed
  AlreadyCounted,
  /// Active yesterday and cleared the bar today
  Continued,
  /// Cleared the bar after a gap (or for the first time)
  Restarted,
  /// Missed the bar
  Broken,
}

impl StreakTransition {
  pub fn changed_state(&self) -> bool {
    !matches!(self, Self::AlreadyCounted)
  }
}

/// Result handed back to callers after a streak update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakUpdate {
  pub current_streak: u32,
  pub longest_streak: u32,
  /// Whether the submitted accuracy cleared the threshold
  pub maintained: bool,
  pub transition: StreakTransition,
}

/// Reject accuracies that are not finite or fall outside [0, 1].
pub fn validate_accuracy(accuracy: f64) -> Result<f64> {
  if !accuracy.is_finite() {
    return Err(StudyError::InvalidArgument(format!(
      "accuracy must be finite, got {}",
      accuracy
    )));
  }
  if !(0.0..=1.0).contains(&accuracy) {
    return Err(StudyError::InvalidArgument(format!(
      "accuracy must be within [0, 1], got {}",
      accuracy
    )));
  }
  Ok(accuracy)
}

pub fn meets_threshold(accuracy: f64) -> bool {
  accuracy >= STREAK_ACCURACY_THRESHOLD
}

/// Record one day's accuracy against the streak.
pub fn record_activity(streak: &mut Streak, accuracy: f64, now: DateTime<Utc>) -> Result<StreakUpdate> {
  let accuracy = validate_accuracy(accuracy)?;
  let maintained = meets_threshold(accuracy);
  let today = now.date_naive();
  let last_day = streak.last_activity_day();

  let transition = if last_day == Some(today) {
    StreakTransition::AlreadyCounted
  } else {
    let transition = if !maintained {
      streak.current_streak = 0;
      StreakTransition::Broken
    } else if last_day == today.pred_opt() {
      streak.current_streak = streak.current_streak.saturating_add(1);
      StreakTransition::Continued
    } else {
      streak.current_streak = 1;
      StreakTransition::Restarted
    };
    streak.longest_streak = streak.longest_streak.max(streak.current_streak);
    streak.last_activity_date = Some(now);
    transition
  };

  Ok(StreakUpdate {
    current_streak: streak.current_streak,
    longest_streak: streak.longest_streak,
    maintained,
    transition,
  })
}

/// Zero the current streak when the user had no activity yesterday or today.
///
/// Returns true if the streak was reset.
pub fn lapse_if_missed(streak: &mut Streak, today: NaiveDate) -> bool {
  let Some(last_day) = streak.last_activity_day() else {
    return false;
  };
  let yesterday = today - Duration::days(1);
  if last_day < yesterday && streak.current_streak > 0 {
    streak.current_streak = 0;
    return true;
  }
  false
}
