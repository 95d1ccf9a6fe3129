//! Study queue ordering for a single deck.
//!
//! Cards are split into three buckets and concatenated in priority order:
//! - due: scheduled at or before now, most overdue first
//! - new: never studied, in fetch order
//! - future: not yet due, in fetch order (deliberately not re-sorted)

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::{Card, StudyRecord};

/// A deck's cards partitioned by review urgency.
#[derive(Debug, Clone, Default)]
pub struct DeckBuckets {
  pub due: Vec<Card>,
  pub new: Vec<Card>,
  pub future: Vec<Card>,
}

impl DeckBuckets {
  /// Total cards across all buckets
  pub fn len(&self) -> usize {
    self.due.len() + self.new.len() + self.future.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Flatten into the final queue order.
  pub fn into_queue(self) -> Vec<Card> {
    let mut queue = self.due;
    queue.extend(self.new);
    queue.extend(self.future);
    queue
  }
}

/// Partition `cards` (in fetch order) using the user's study records.
///
/// Records for cards outside `cards` are ignored.
pub fn partition_deck(cards: Vec<Card>, records: &[StudyRecord], now: DateTime<Utc>) -> DeckBuckets {
  let by_card: HashMap<i64, &StudyRecord> = records.iter().map(|r| (r.card_id, r)).collect();

  let mut due: Vec<(Option<DateTime<Utc>>, Card)> = Vec::new();
  let mut buckets = DeckBuckets::default();

  for card in cards {
    match by_card.get(&card.id) {
      None => buckets.new.push(card),
      Some(record) if record.is_due(now) => due.push((record.next_review_at, card)),
      Some(_) => buckets.future.push(card),
    }
  }

  // Stable: ties keep fetch order. Unscheduled (None) sorts first.
  due.sort_by_key(|(at, _)| *at);
  buckets.due = due.into_iter().map(|(_, card)| card).collect();

  buckets
}

/// Full priority ordering over a deck's cards.
pub fn build_study_queue(cards: Vec<Card>, records: &[StudyRecord], now: DateTime<Utc>) -> Vec<Card> {
  partition_deck(cards, records, now).into_queue()
}
