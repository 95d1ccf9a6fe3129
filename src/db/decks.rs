//! Deck and card reads used by the scheduler.
//!
//! Deck/card authoring belongs to the host; the inserts here exist for
//! seeding and tests.

use rusqlite::{params, Connection, Result, Row};

use crate::domain::{Card, Deck};

pub fn insert_deck(conn: &Connection, owner_id: i64, title: &str, is_public: bool) -> Result<i64> {
    conn.execute(
        "INSERT INTO decks (owner_id, title, is_public) VALUES (?1, ?2, ?3)",
        params![owner_id, title, is_public],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_card(conn: &Connection, deck_id: i64, question: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO cards (deck_id, question) VALUES (?1, ?2)",
        params![deck_id, question],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All cards of a deck in fetch order (id ascending).
pub fn get_deck_cards(conn: &Connection, deck_id: i64) -> Result<Vec<Card>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, deck_id, question
        FROM cards
        WHERE deck_id = ?1
        ORDER BY id ASC
        "#,
    )?;

    let cards = stmt
        .query_map(params![deck_id], row_to_card)?
        .collect::<Result<Vec<_>>>()?;
    Ok(cards)
}

/// Public decks owned by `user_id`.
pub fn get_owned_public_decks(conn: &Connection, user_id: i64) -> Result<Vec<Deck>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, owner_id, title, is_public
        FROM decks
        WHERE owner_id = ?1 AND is_public = 1
        ORDER BY id ASC
        "#,
    )?;

    let decks = stmt
        .query_map(params![user_id], row_to_deck)?
        .collect::<Result<Vec<_>>>()?;
    Ok(decks)
}

/// Up to `limit` public decks from anyone.
pub fn get_public_decks(conn: &Connection, limit: usize) -> Result<Vec<Deck>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, owner_id, title, is_public
        FROM decks
        WHERE is_public = 1
        ORDER BY id ASC
        LIMIT ?1
        "#,
    )?;

    let decks = stmt
        .query_map(params![limit as i64], row_to_deck)?
        .collect::<Result<Vec<_>>>()?;
    Ok(decks)
}

pub(crate) fn row_to_card(row: &Row) -> Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        deck_id: row.get(1)?,
        question: row.get(2)?,
    })
}

fn row_to_deck(row: &Row) -> Result<Deck> {
    Ok(Deck {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        is_public: row.get(3)?,
    })
}
