pub mod card;
pub mod progress;
pub mod review;

pub use card::{Card, Deck, StudyRecord};
pub use progress::{ActionType, ActivityLog, DailyChallenge, Streak};
pub use review::{Difficulty, QuizMode};
