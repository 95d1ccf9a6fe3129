pub mod challenge;
pub mod streak;

pub use challenge::{challenge_accuracy, complete_challenge, pick_challenge_deck, ChallengeCompletion};
pub use streak::{lapse_if_missed, record_activity, StreakTransition, StreakUpdate};
