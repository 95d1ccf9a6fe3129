//! Per-user, per-card study record storage.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use super::{format_timestamp, parse_timestamp};
use crate::domain::{Card, Difficulty, StudyRecord};

pub fn get_study_record(conn: &Connection, user_id: i64, card_id: i64) -> Result<Option<StudyRecord>> {
    conn.query_row(
        r#"
        SELECT user_id, card_id, repetition_count, difficulty, next_review_at
        FROM study_records
        WHERE user_id = ?1 AND card_id = ?2
        "#,
        params![user_id, card_id],
        row_to_study_record,
    )
    .optional()
}

/// Insert or replace the record for (user_id, card_id).
pub fn upsert_study_record(conn: &Connection, record: &StudyRecord) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO study_records (user_id, card_id, repetition_count, difficulty, next_review_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (user_id, card_id) DO UPDATE SET
            repetition_count = excluded.repetition_count,
            difficulty = excluded.difficulty,
            next_review_at = excluded.next_review_at
        "#,
        params![
            record.user_id,
            record.card_id,
            record.repetition_count,
            record.difficulty.as_str(),
            record.next_review_at.as_ref().map(format_timestamp),
        ],
    )?;
    Ok(())
}

/// The user's records for cards in `deck_id`.
pub fn get_deck_study_records(conn: &Connection, user_id: i64, deck_id: i64) -> Result<Vec<StudyRecord>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT s.user_id, s.card_id, s.repetition_count, s.difficulty, s.next_review_at
        FROM study_records s
        JOIN cards c ON c.id = s.card_id
        WHERE s.user_id = ?1 AND c.deck_id = ?2
        "#,
    )?;

    let records = stmt
        .query_map(params![user_id, deck_id], row_to_study_record)?
        .collect::<Result<Vec<_>>>()?;
    Ok(records)
}

/// Cards due for `user_id` across all decks, most overdue first.
pub fn get_due_cards(conn: &Connection, user_id: i64, now: DateTime<Utc>, limit: usize) -> Result<Vec<Card>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT c.id, c.deck_id, c.question
        FROM study_records s
        JOIN cards c ON c.id = s.card_id
        WHERE s.user_id = ?1
          AND (s.next_review_at IS NULL OR s.next_review_at <= ?2)
        ORDER BY s.next_review_at ASC, c.id ASC
        LIMIT ?3
        "#,
    )?;

    let cards = stmt
        .query_map(
            params![user_id, format_timestamp(&now), limit as i64],
            super::decks::row_to_card,
        )?
        .collect::<Result<Vec<_>>>()?;
    Ok(cards)
}

fn row_to_study_record(row: &Row) -> Result<StudyRecord> {
    let difficulty: String = row.get(3)?;
    let difficulty = difficulty.parse::<Difficulty>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let next_review_at: Option<String> = row.get(4)?;

    Ok(StudyRecord {
        user_id: row.get(0)?,
        card_id: row.get(1)?,
        repetition_count: row.get(2)?,
        difficulty,
        next_review_at: next_review_at
            .map(|s| parse_timestamp(4, &s))
            .transpose()?,
    })
}
