//! Scheduling and gamification services.
//!
//! These are the operations hosts call: each loads state through `db`,
//! applies a pure transition, and persists the result on the caller's
//! connection.

pub mod gamification;
pub mod study;

pub use gamification::{
    complete_challenge_for_session, complete_daily_challenge, create_daily_challenge,
    lapse_stale_streak, streak_summary, update_streak,
};
pub use study::{
    build_study_queue, deck_buckets, due_cards_for_review, record_answer, start_study_session,
    update_study_record, AnswerEvent,
};
