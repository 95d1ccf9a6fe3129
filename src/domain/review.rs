use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::StudyError;

/// Self-assessed difficulty submitted with a study-mode answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Easy => "easy",
      Self::Medium => "medium",
      Self::Hard => "hard",
    }
  }
}

impl FromStr for Difficulty {
  type Err = StudyError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "easy" | "EASY" => Ok(Self::Easy),
      "medium" | "MEDIUM" => Ok(Self::Medium),
      "hard" | "HARD" => Ok(Self::Hard),
      other => Err(StudyError::InvalidArgument(format!(
        "unknown difficulty '{}'",
        other
      ))),
    }
  }
}

/// Quiz session type. Only `Study` sessions feed the spaced repetition scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
  Exam,    // All cards, random order
  Study,   // Spaced repetition queue
  Review,  // Previously missed cards
}

impl QuizMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Exam => "exam",
      Self::Study => "study",
      Self::Review => "review",
    }
  }

  pub fn updates_study_records(&self) -> bool {
    matches!(self, Self::Study)
  }
}

impl FromStr for QuizMode {
  type Err = StudyError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "exam" => Ok(Self::Exam),
      "study" => Ok(Self::Study),
      "review" => Ok(Self::Review),
      other => Err(StudyError::InvalidArgument(format!(
        "unknown quiz mode '{}'",
        other
      ))),
    }
  }
}
