//! Spaced repetition scheduling and streak tracking for a quiz backend.
//!
//! `srs` and `gamification` hold pure state transitions; `services` wires
//! them to SQLite storage in `db`.

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod gamification;
pub mod services;
pub mod srs;

#[cfg(test)]
mod testing;

pub use error::{Result, StudyError};
