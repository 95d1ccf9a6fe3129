//! Activity trail

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use super::{format_timestamp, parse_timestamp};
use crate::domain::{ActionType, ActivityLog};

pub fn insert_activity(
    conn: &Connection,
    user_id: i64,
    action_type: ActionType,
    resource_type: &str,
    resource_id: i64,
    extra_data: &serde_json::Value,
    created_at: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO activity_logs (user_id, action_type, resource_type, resource_id, extra_data, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            user_id,
            action_type.as_str(),
            resource_type,
            resource_id,
            extra_data.to_string(),
            format_timestamp(&created_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent activity first.
pub fn get_user_activity(conn: &Connection, user_id: i64, limit: usize) -> Result<Vec<ActivityLog>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, user_id, action_type, resource_type, resource_id, extra_data, created_at
        FROM activity_logs
        WHERE user_id = ?1
        ORDER BY created_at DESC, id DESC
        LIMIT ?2
        "#,
    )?;

    let logs = stmt
        .query_map(params![user_id, limit as i64], |row| {
            let action: String = row.get(2)?;
            let extra: String = row.get(5)?;
            let created_at: String = row.get(6)?;
            Ok(ActivityLog {
                id: row.get(0)?,
                user_id: row.get(1)?,
                action_type: ActionType::from_str(&action).ok_or_else(|| {
                    rusqlite::Error::InvalidColumnType(2, action.clone(), rusqlite::types::Type::Text)
                })?,
                resource_type: row.get(3)?,
                resource_id: row.get(4)?,
                extra_data: serde_json::from_str(&extra).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
                })?,
                created_at: parse_timestamp(6, &created_at)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(logs)
}
