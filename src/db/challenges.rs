//! Daily challenge storage

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use super::{format_timestamp, parse_timestamp};
use crate::domain::DailyChallenge;

const CHALLENGE_COLUMNS: &str = "id, user_id, deck_id, date, completed, score, accuracy_percent";

pub fn get_challenge(conn: &Connection, challenge_id: i64) -> Result<Option<DailyChallenge>> {
    conn.query_row(
        &format!("SELECT {} FROM daily_challenges WHERE id = ?1", CHALLENGE_COLUMNS),
        params![challenge_id],
        row_to_challenge,
    )
    .optional()
}

/// The user's challenge for a calendar day, if one was created.
pub fn get_challenge_for_day(conn: &Connection, user_id: i64, day: NaiveDate) -> Result<Option<DailyChallenge>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM daily_challenges WHERE user_id = ?1 AND challenge_day = ?2",
            CHALLENGE_COLUMNS
        ),
        params![user_id, day.to_string()],
        row_to_challenge,
    )
    .optional()
}

/// Insert a new challenge unless one already exists for that (user, day).
///
/// Returns the stored challenge for the day either way.
pub fn insert_challenge_if_absent(conn: &Connection, challenge: &DailyChallenge) -> Result<DailyChallenge> {
    let inserted = conn.execute(
        r#"
        INSERT OR IGNORE INTO daily_challenges (user_id, deck_id, date, challenge_day, completed)
        VALUES (?1, ?2, ?3, ?4, 0)
        "#,
        params![
            challenge.user_id,
            challenge.deck_id,
            format_timestamp(&challenge.date),
            challenge.day().to_string(),
        ],
    )?;
    if inserted == 0 {
        tracing::debug!(
            "Challenge for user {} on {} already exists",
            challenge.user_id,
            challenge.day()
        );
    }

    get_challenge_for_day(conn, challenge.user_id, challenge.day())?
        .ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Flip a pending challenge to completed. Returns false if it was not pending.
pub fn mark_challenge_completed(conn: &Connection, challenge: &DailyChallenge) -> Result<bool> {
    let updated = conn.execute(
        r#"
        UPDATE daily_challenges
        SET completed = 1, score = ?1, accuracy_percent = ?2
        WHERE id = ?3 AND completed = 0
        "#,
        params![challenge.score, challenge.accuracy_percent, challenge.id],
    )?;
    Ok(updated == 1)
}

/// Today's still-pending challenge for a specific deck.
pub fn get_pending_challenge_for_deck(
    conn: &Connection,
    user_id: i64,
    deck_id: i64,
    day: NaiveDate,
) -> Result<Option<DailyChallenge>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM daily_challenges \
             WHERE user_id = ?1 AND deck_id = ?2 AND challenge_day = ?3 AND completed = 0",
            CHALLENGE_COLUMNS
        ),
        params![user_id, deck_id, day.to_string()],
        row_to_challenge,
    )
    .optional()
}

fn row_to_challenge(row: &Row) -> Result<DailyChallenge> {
    let date: String = row.get(3)?;
    Ok(DailyChallenge {
        id: row.get(0)?,
        user_id: row.get(1)?,
        deck_id: row.get(2)?,
        date: parse_timestamp(3, &date)?,
        completed: row.get(4)?,
        score: row.get(5)?,
        accuracy_percent: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::insert_deck;
    use crate::testing::TestEnv;
    use chrono::{DateTime, Utc};

    fn date(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_insert_is_idempotent_per_day() {
        let env = TestEnv::new().unwrap();
        let conn = &env.conn;
        let deck_a = insert_deck(conn, 1, "a", true).unwrap();
        let deck_b = insert_deck(conn, 1, "b", true).unwrap();

        let first = insert_challenge_if_absent(conn, &DailyChallenge::new(1, deck_a, date("2024-05-10T00:01:00Z"))).unwrap();
        let second = insert_challenge_if_absent(conn, &DailyChallenge::new(1, deck_b, date("2024-05-10T18:00:00Z"))).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.deck_id, deck_a);
        assert!(!second.completed);

        let next_day = insert_challenge_if_absent(conn, &DailyChallenge::new(1, deck_b, date("2024-05-11T00:01:00Z"))).unwrap();
        assert_ne!(next_day.id, first.id);
    }

    #[test]
    fn test_mark_completed_only_once() {
        let env = TestEnv::new().unwrap();
        let conn = &env.conn;
        let deck = insert_deck(conn, 1, "a", true).unwrap();
        let mut challenge = insert_challenge_if_absent(conn, &DailyChallenge::new(1, deck, date("2024-05-10T00:01:00Z"))).unwrap();

        challenge.completed = true;
        challenge.score = Some(7);
        challenge.accuracy_percent = Some(70.0);
        assert!(mark_challenge_completed(conn, &challenge).unwrap());

        challenge.score = Some(1);
        assert!(!mark_challenge_completed(conn, &challenge).unwrap());

        let stored = get_challenge(conn, challenge.id).unwrap().unwrap();
        assert!(stored.completed);
        assert_eq!(stored.score, Some(7));
    }

    #[test]
    fn test_pending_for_deck() {
        let env = TestEnv::new().unwrap();
        let conn = &env.conn;
        let deck = insert_deck(conn, 1, "a", true).unwrap();
        let other = insert_deck(conn, 1, "b", true).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        insert_challenge_if_absent(conn, &DailyChallenge::new(1, deck, date("2024-05-10T00:01:00Z"))).unwrap();

        assert!(get_pending_challenge_for_deck(conn, 1, deck, day).unwrap().is_some());
        assert!(get_pending_challenge_for_deck(conn, 1, other, day).unwrap().is_none());
        assert!(get_pending_challenge_for_deck(conn, 2, deck, day).unwrap().is_none());
    }

    #[test]
    fn test_missing_challenge() {
        let env = TestEnv::new().unwrap();
        assert!(get_challenge(&env.conn, 404).unwrap().is_none());
    }
}
