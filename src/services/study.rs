//! Study-mode scheduling service.
//!
//! Loads scheduling state, applies the pure transitions from `srs`, and
//! persists the result. Each call is one unit of work; callers serialize
//! writes per (user, card).

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::Connection;

use crate::config::SchedulerConfig;
use crate::db;
use crate::domain::{Card, Difficulty, QuizMode, StudyRecord};
use crate::error::Result;
use crate::srs::{self, DeckBuckets};

/// One submitted quiz answer as seen by the scheduler.
#[derive(Debug, Clone, Copy)]
pub struct AnswerEvent {
    pub user_id: i64,
    pub card_id: i64,
    pub mode: QuizMode,
    pub is_correct: bool,
    /// Self-assessment; answers without one never touch the schedule
    pub difficulty: Option<Difficulty>,
}

/// Apply one study-mode answer to the (user, card) record, creating it on first answer.
pub fn update_study_record<R: Rng + ?Sized>(
    conn: &Connection,
    rng: &mut R,
    now: DateTime<Utc>,
    user_id: i64,
    card_id: i64,
    is_correct: bool,
    difficulty: Difficulty,
) -> Result<StudyRecord> {
    let mut record = db::get_study_record(conn, user_id, card_id)?
        .unwrap_or_else(|| StudyRecord::new(user_id, card_id, difficulty));

    srs::apply_answer(&mut record, is_correct, difficulty, now, rng);
    db::upsert_study_record(conn, &record)?;

    tracing::debug!(
        user_id,
        card_id,
        is_correct,
        repetition_count = record.repetition_count,
        difficulty = difficulty.as_str(),
        "Study record updated"
    );
    Ok(record)
}

/// Route a quiz answer to the scheduler when it belongs to a study session.
///
/// Exam and review answers, and study answers without a difficulty rating,
/// return `Ok(None)` and leave the schedule alone.
pub fn record_answer<R: Rng + ?Sized>(
    conn: &Connection,
    rng: &mut R,
    now: DateTime<Utc>,
    answer: &AnswerEvent,
) -> Result<Option<StudyRecord>> {
    if !answer.mode.updates_study_records() {
        return Ok(None);
    }
    let Some(difficulty) = answer.difficulty else {
        return Ok(None);
    };

    update_study_record(
        conn,
        rng,
        now,
        answer.user_id,
        answer.card_id,
        answer.is_correct,
        difficulty,
    )
    .map(Some)
}

/// The deck's cards split into due / new / future for this user.
pub fn deck_buckets(conn: &Connection, user_id: i64, deck_id: i64, now: DateTime<Utc>) -> Result<DeckBuckets> {
    let cards = db::get_deck_cards(conn, deck_id)?;
    let records = db::get_deck_study_records(conn, user_id, deck_id)?;
    Ok(srs::partition_deck(cards, &records, now))
}

/// Full priority-ordered queue over a deck: due, then new, then future.
pub fn build_study_queue(conn: &Connection, user_id: i64, deck_id: i64, now: DateTime<Utc>) -> Result<Vec<Card>> {
    let buckets = deck_buckets(conn, user_id, deck_id, now)?;
    tracing::debug!(
        user_id,
        deck_id,
        due = buckets.due.len(),
        new = buckets.new.len(),
        future = buckets.future.len(),
        "Built study queue"
    );
    Ok(buckets.into_queue())
}

/// The first `config.session_size` cards of the study queue, for a study-mode session.
pub fn start_study_session(
    conn: &Connection,
    config: &SchedulerConfig,
    user_id: i64,
    deck_id: i64,
    now: DateTime<Utc>,
) -> Result<Vec<Card>> {
    let mut queue = build_study_queue(conn, user_id, deck_id, now)?;
    queue.truncate(config.session_size);
    Ok(queue)
}

/// Due cards across every deck the user has studied, most overdue first.
///
/// At most `config.due_card_limit` cards are returned.
pub fn due_cards_for_review(
    conn: &Connection,
    config: &SchedulerConfig,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<Vec<Card>> {
    Ok(db::get_due_cards(conn, user_id, now, config.due_card_limit)?)
}
