use crate::domain::Difficulty;

const EASY_INTERVALS: [i64; 6] = [1, 3, 7, 14, 30, 60];
const MEDIUM_INTERVALS: [i64; 6] = [1, 2, 5, 10, 21, 45];
const HARD_INTERVALS: [i64; 6] = [1, 1, 3, 6, 12, 24];

/// Day intervals for each repetition depth at the given difficulty.
pub fn intervals(difficulty: Difficulty) -> &'static [i64] {
  match difficulty {
    Difficulty::Easy => &EASY_INTERVALS,
    Difficulty::Medium => &MEDIUM_INTERVALS,
    Difficulty::Hard => &HARD_INTERVALS,
  }
}

/// Index into the table for a repetition depth; clamps to the last entry.
pub fn interval_index(difficulty: Difficulty, repetition_count: u32) -> usize {
  let table = intervals(difficulty);
  (repetition_count as usize).min(table.len() - 1)
}

/// Base (un-jittered) interval in days.
pub fn base_interval_days(difficulty: Difficulty, repetition_count: u32) -> i64 {
  intervals(difficulty)[interval_index(difficulty, repetition_count)]
}
