//! Streak storage

use rusqlite::{params, Connection, OptionalExtension, Result};

use super::{format_timestamp, parse_timestamp};
use crate::domain::Streak;

pub fn get_streak(conn: &Connection, user_id: i64) -> Result<Option<Streak>> {
    conn.query_row(
        r#"
        SELECT user_id, current_streak, longest_streak, last_activity_date
        FROM streaks
        WHERE user_id = ?1
        "#,
        params![user_id],
        |row| {
            let last: Option<String> = row.get(3)?;
            Ok(Streak {
                user_id: row.get(0)?,
                current_streak: row.get(1)?,
                longest_streak: row.get(2)?,
                last_activity_date: last.map(|s| parse_timestamp(3, &s)).transpose()?,
            })
        },
    )
    .optional()
}

pub fn save_streak(conn: &Connection, streak: &Streak) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO streaks (user_id, current_streak, longest_streak, last_activity_date)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT (user_id) DO UPDATE SET
            current_streak = excluded.current_streak,
            longest_streak = excluded.longest_streak,
            last_activity_date = excluded.last_activity_date
        "#,
        params![
            streak.user_id,
            streak.current_streak,
            streak.longest_streak,
            streak.last_activity_date.as_ref().map(format_timestamp),
        ],
    )?;
    Ok(())
}
