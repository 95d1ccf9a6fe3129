//! Streak and daily challenge service.
//!
//! Challenge completion is the only path by which a challenge feeds the
//! streak. The nightly rollover calls `create_daily_challenge` and
//! `lapse_stale_streak` once per user.

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::Connection;
use serde_json::json;

use crate::config::CHALLENGE_FALLBACK_DECK_LIMIT;
use crate::db::{self, LogOnError};
use crate::domain::{ActionType, DailyChallenge, Streak};
use crate::error::{Result, StudyError};
use crate::gamification::{self, ChallengeCompletion, StreakUpdate};

/// Record a day's accuracy against the user's streak.
///
/// Only the first call per UTC day changes state.
pub fn update_streak(conn: &Connection, now: DateTime<Utc>, user_id: i64, accuracy: f64) -> Result<StreakUpdate> {
    let mut streak = db::get_streak(conn, user_id)?.unwrap_or_else(|| Streak::new(user_id));
    let update = gamification::record_activity(&mut streak, accuracy, now)?;

    if update.transition.changed_state() {
        db::save_streak(conn, &streak)?;
        tracing::info!(
            user_id,
            transition = ?update.transition,
            current = update.current_streak,
            longest = update.longest_streak,
            "Streak updated"
        );
    } else {
        tracing::debug!(user_id, "Streak already updated today");
    }

    Ok(update)
}

/// Stored streak, or an empty one for users who never had activity.
pub fn streak_summary(conn: &Connection, user_id: i64) -> Result<Streak> {
    Ok(db::get_streak(conn, user_id)?.unwrap_or_else(|| Streak::new(user_id)))
}

/// Nightly check: zero the current streak if the user skipped yesterday.
pub fn lapse_stale_streak(conn: &Connection, now: DateTime<Utc>, user_id: i64) -> Result<bool> {
    let Some(mut streak) = db::get_streak(conn, user_id)? else {
        return Ok(false);
    };
    let lapsed = gamification::lapse_if_missed(&mut streak, now.date_naive());
    if lapsed {
        db::save_streak(conn, &streak)?;
        tracing::info!(user_id, "Reset streak after missed day");
    }
    Ok(lapsed)
}

/// Today's challenge for the user, creating it if needed.
///
/// `Ok(None)` means no eligible deck exists; the caller skips this user today.
pub fn create_daily_challenge<R: Rng + ?Sized>(
    conn: &Connection,
    rng: &mut R,
    now: DateTime<Utc>,
    user_id: i64,
) -> Result<Option<DailyChallenge>> {
    if let Some(existing) = db::get_challenge_for_day(conn, user_id, now.date_naive())? {
        return Ok(Some(existing));
    }

    let own_public = db::get_owned_public_decks(conn, user_id)?;
    let fallback = if own_public.is_empty() {
        db::get_public_decks(conn, CHALLENGE_FALLBACK_DECK_LIMIT)?
    } else {
        Vec::new()
    };

    let Some(deck) = gamification::pick_challenge_deck(&own_public, &fallback, rng) else {
        tracing::debug!(user_id, "No eligible deck for daily challenge");
        return Ok(None);
    };

    let challenge = db::insert_challenge_if_absent(conn, &DailyChallenge::new(user_id, deck.id, now))?;
    tracing::info!(user_id, challenge_id = challenge.id, deck_id = challenge.deck_id, "Created daily challenge");
    Ok(Some(challenge))
}

/// Complete a pending challenge and feed its accuracy into the streak.
///
/// The completion flag and the streak are separate writes. Run this inside
/// one transaction (`Connection::unchecked_transaction`, or a `Transaction`
/// passed through its `Deref` to `Connection`) so a failed streak write rolls
/// the completion back; otherwise a retry sees `AlreadyCompletedOrNotFound`.
pub fn complete_daily_challenge(
    conn: &Connection,
    now: DateTime<Utc>,
    challenge_id: i64,
    score: i64,
    total: i64,
) -> Result<ChallengeCompletion> {
    let mut challenge =
        db::get_challenge(conn, challenge_id)?.ok_or(StudyError::AlreadyCompletedOrNotFound(challenge_id))?;

    let accuracy = gamification::complete_challenge(&mut challenge, score, total)?;
    if !db::mark_challenge_completed(conn, &challenge)? {
        return Err(StudyError::AlreadyCompletedOrNotFound(challenge_id));
    }

    let streak = update_streak(conn, now, challenge.user_id, accuracy)?;

    db::insert_activity(
        conn,
        challenge.user_id,
        ActionType::CompleteChallenge,
        "challenge",
        challenge_id,
        &json!({ "score": score, "total": total, "accuracy": accuracy }),
        now,
    )
    .log_warn("Failed to log challenge completion");

    tracing::info!(challenge_id, user_id = challenge.user_id, accuracy, "Completed daily challenge");

    Ok(ChallengeCompletion {
        challenge_id,
        score,
        total,
        accuracy,
        streak,
    })
}

/// Complete today's pending challenge for `deck_id`, if the finished exam session matches one.
pub fn complete_challenge_for_session(
    conn: &Connection,
    now: DateTime<Utc>,
    user_id: i64,
    deck_id: i64,
    score: i64,
    total: i64,
) -> Result<Option<ChallengeCompletion>> {
    match db::get_pending_challenge_for_deck(conn, user_id, deck_id, now.date_naive())? {
        Some(challenge) => complete_daily_challenge(conn, now, challenge.id, score, total).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_deck, save_streak};
    use crate::gamification::StreakTransition;
    use crate::testing::TestEnv;
    use chrono::{Duration, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, h, 0, 0).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(3)
    }

    #[test]
    fn test_update_streak_creates_row() {
        let env = TestEnv::new().unwrap();
        let update = update_streak(&env.conn, at(10, 9), 1, 0.9).unwrap();
        assert_eq!(update.current_streak, 1);
        assert_eq!(update.transition, StreakTransition::Restarted);

        let stored = streak_summary(&env.conn, 1).unwrap();
        assert_eq!(stored.current_streak, 1);
        assert_eq!(stored.last_activity_date, Some(at(10, 9)));
    }

    #[test]
    fn test_update_streak_same_day_noop() {
        let env = TestEnv::new().unwrap();
        update_streak(&env.conn, at(10, 9), 1, 0.9).unwrap();
        let second = update_streak(&env.conn, at(10, 20), 1, 0.3).unwrap();

        assert_eq!(second.current_streak, 1);
        assert!(!second.maintained);
        let stored = streak_summary(&env.conn, 1).unwrap();
        assert_eq!(stored.current_streak, 1);
        assert_eq!(stored.last_activity_date, Some(at(10, 9)));
    }

    #[test]
    fn test_update_streak_rejects_nan() {
        let env = TestEnv::new().unwrap();
        assert!(matches!(
            update_streak(&env.conn, at(10, 9), 1, f64::NAN),
            Err(StudyError::InvalidArgument(_))
        ));
        assert!(db::get_streak(&env.conn, 1).unwrap().is_none());
    }

    #[test]
    fn test_streak_summary_unknown_user() {
        let env = TestEnv::new().unwrap();
        assert_eq!(streak_summary(&env.conn, 77).unwrap(), Streak::new(77));
    }

    #[test]
    fn test_lapse_stale_streak() {
        let env = TestEnv::new().unwrap();
        let mut streak = Streak::new(1);
        streak.current_streak = 3;
        streak.longest_streak = 3;
        streak.last_activity_date = Some(at(5, 12));
        save_streak(&env.conn, &streak).unwrap();

        assert!(lapse_stale_streak(&env.conn, at(10, 0), 1).unwrap());
        let stored = streak_summary(&env.conn, 1).unwrap();
        assert_eq!(stored.current_streak, 0);
        assert_eq!(stored.longest_streak, 3);

        assert!(!lapse_stale_streak(&env.conn, at(10, 0), 1).unwrap());
        assert!(!lapse_stale_streak(&env.conn, at(10, 0), 2).unwrap());
    }

    #[test]
    fn test_create_challenge_is_idempotent() {
        let env = TestEnv::new().unwrap();
        insert_deck(&env.conn, 1, "Mine A", true).unwrap();
        insert_deck(&env.conn, 1, "Mine B", true).unwrap();
        let mut rng = rng();

        let first = create_daily_challenge(&env.conn, &mut rng, at(10, 0), 1).unwrap().unwrap();
        let second = create_daily_challenge(&env.conn, &mut rng, at(10, 15), 1).unwrap().unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.deck_id, second.deck_id);

        let tomorrow = create_daily_challenge(&env.conn, &mut rng, at(11, 0), 1).unwrap().unwrap();
        assert_ne!(tomorrow.id, first.id);
    }

    #[test]
    fn test_create_challenge_prefers_own_public_deck() {
        let env = TestEnv::new().unwrap();
        let mine = insert_deck(&env.conn, 1, "Mine", true).unwrap();
        insert_deck(&env.conn, 1, "Mine private", false).unwrap();
        insert_deck(&env.conn, 2, "Theirs", true).unwrap();

        let challenge = create_daily_challenge(&env.conn, &mut rng(), at(10, 0), 1).unwrap().unwrap();
        assert_eq!(challenge.deck_id, mine);
        assert!(!challenge.completed);
    }

    #[test]
    fn test_create_challenge_falls_back_to_public() {
        let env = TestEnv::new().unwrap();
        insert_deck(&env.conn, 1, "Mine private", false).unwrap();
        let theirs = insert_deck(&env.conn, 2, "Theirs", true).unwrap();

        let challenge = create_daily_challenge(&env.conn, &mut rng(), at(10, 0), 1).unwrap().unwrap();
        assert_eq!(challenge.deck_id, theirs);
    }

    #[test]
    fn test_create_challenge_without_decks() {
        let env = TestEnv::new().unwrap();
        insert_deck(&env.conn, 1, "Private", false).unwrap();
        assert!(create_daily_challenge(&env.conn, &mut rng(), at(10, 0), 1).unwrap().is_none());
    }

    #[test]
    fn test_complete_challenge_updates_streak_and_logs() {
        let env = TestEnv::new().unwrap();
        insert_deck(&env.conn, 1, "Mine", true).unwrap();
        let challenge = create_daily_challenge(&env.conn, &mut rng(), at(10, 0), 1).unwrap().unwrap();

        let done = complete_daily_challenge(&env.conn, at(10, 18), challenge.id, 9, 10).unwrap();
        assert_eq!(done.accuracy, 0.9);
        assert_eq!(done.streak.current_streak, 1);
        assert!(done.streak.maintained);

        let stored = db::get_challenge(&env.conn, challenge.id).unwrap().unwrap();
        assert!(stored.completed);
        assert_eq!(stored.score, Some(9));
        assert!((stored.accuracy_percent.unwrap() - 90.0).abs() < 1e-9);

        let logs = db::get_user_activity(&env.conn, 1, 5).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].resource_id, challenge.id);
        assert_eq!(logs[0].extra_data["total"], 10);
    }

    #[test]
    fn test_complete_twice_fails_without_mutation() {
        let env = TestEnv::new().unwrap();
        insert_deck(&env.conn, 1, "Mine", true).unwrap();
        let challenge = create_daily_challenge(&env.conn, &mut rng(), at(10, 0), 1).unwrap().unwrap();
        complete_daily_challenge(&env.conn, at(10, 18), challenge.id, 9, 10).unwrap();

        let err = complete_daily_challenge(&env.conn, at(10, 19), challenge.id, 1, 10).unwrap_err();
        assert!(matches!(err, StudyError::AlreadyCompletedOrNotFound(id) if id == challenge.id));

        let stored = db::get_challenge(&env.conn, challenge.id).unwrap().unwrap();
        assert_eq!(stored.score, Some(9));
        assert_eq!(db::get_user_activity(&env.conn, 1, 5).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_streak_write_rolls_back_completion() {
        let env = TestEnv::new().unwrap();
        insert_deck(&env.conn, 1, "mine", true).unwrap();
        let challenge = create_daily_challenge(&env.conn, &mut rng(), at(10, 0), 1).unwrap().unwrap();

        {
            let tx = env.conn.unchecked_transaction().unwrap();
            tx.execute_batch("DROP TABLE streaks").unwrap();
            assert!(complete_daily_challenge(&tx, at(10, 9), challenge.id, 9, 10).is_err());
            // dropped without commit
        }

        let stored = db::get_challenge(&env.conn, challenge.id).unwrap().unwrap();
        assert!(!stored.completed);

        let tx = env.conn.unchecked_transaction().unwrap();
        let done = complete_daily_challenge(&tx, at(10, 9), challenge.id, 9, 10).unwrap();
        tx.commit().unwrap();
        assert_eq!(done.streak.current_streak, 1);
        assert_eq!(streak_summary(&env.conn, 1).unwrap().current_streak, 1);
    }

    #[test]
    fn test_complete_missing_challenge() {
        let env = TestEnv::new().unwrap();
        let err = complete_daily_challenge(&env.conn, at(10, 18), 404, 1, 1).unwrap_err();
        assert!(matches!(err, StudyError::AlreadyCompletedOrNotFound(404)));
    }

    #[test]
    fn test_complete_with_zero_total_breaks_streak() {
        let env = TestEnv::new().unwrap();
        insert_deck(&env.conn, 1, "Mine", true).unwrap();
        let mut streak = Streak::new(1);
        streak.current_streak = 4;
        streak.longest_streak = 4;
        streak.last_activity_date = Some(at(10, 0) - Duration::days(1));
        save_streak(&env.conn, &streak).unwrap();

        let challenge = create_daily_challenge(&env.conn, &mut rng(), at(10, 0), 1).unwrap().unwrap();
        let done = complete_daily_challenge(&env.conn, at(10, 8), challenge.id, 0, 0).unwrap();

        assert_eq!(done.accuracy, 0.0);
        assert_eq!(done.streak.current_streak, 0);
        assert_eq!(done.streak.longest_streak, 4);
    }

    #[test]
    fn test_complete_challenge_for_session() {
        let env = TestEnv::new().unwrap();
        let deck = insert_deck(&env.conn, 1, "Mine", true).unwrap();
        let other = insert_deck(&env.conn, 2, "Other", false).unwrap();
        create_daily_challenge(&env.conn, &mut rng(), at(10, 0), 1).unwrap().unwrap();

        assert!(complete_challenge_for_session(&env.conn, at(10, 9), 1, other, 5, 5).unwrap().is_none());

        let done = complete_challenge_for_session(&env.conn, at(10, 9), 1, deck, 5, 5).unwrap().unwrap();
        assert_eq!(done.accuracy, 1.0);

        // Already completed: nothing pending any more
        assert!(complete_challenge_for_session(&env.conn, at(10, 10), 1, deck, 5, 5).unwrap().is_none());
    }
}
