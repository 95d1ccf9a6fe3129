pub mod intervals;
pub mod queue;
pub mod scheduler;

pub use intervals::{base_interval_days, intervals};
pub use queue::{build_study_queue, partition_deck, DeckBuckets};
pub use scheduler::{apply_answer, compute_next_review};
