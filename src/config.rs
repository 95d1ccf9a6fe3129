//! Scheduler configuration.
//!
//! Fixed policy constants live here alongside the small runtime config
//! (database location, session size, due card limit) that hosts may override.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::db::LogOnError;

// ==================== Review Scheduling ====================

/// Lower bound of the jitter multiplier applied to correct-answer intervals
pub const JITTER_MIN: f64 = 0.8;

/// Upper bound of the jitter multiplier applied to correct-answer intervals
pub const JITTER_MAX: f64 = 1.2;

// ==================== Study Sessions ====================

/// Cards handed to a study-mode session
pub const DEFAULT_SESSION_SIZE: usize = 20;

/// Limit for the cross-deck due card listing
pub const DEFAULT_DUE_CARD_LIMIT: usize = 20;

// ==================== Gamification ====================

/// Daily accuracy needed to keep a streak alive
pub const STREAK_ACCURACY_THRESHOLD: f64 = 0.85;

/// Public decks considered when a user owns no public deck
pub const CHALLENGE_FALLBACK_DECK_LIMIT: usize = 10;

// ==================== Runtime Configuration ====================

const DEFAULT_DATABASE_PATH: &str = "data/study.db";

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    scheduler: Option<SchedulerSection>,
}

#[derive(Debug, Default, Deserialize)]
struct SchedulerSection {
    database_path: Option<String>,
    session_size: Option<usize>,
    due_card_limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub database_path: PathBuf,
    pub session_size: usize,
    pub due_card_limit: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            session_size: DEFAULT_SESSION_SIZE,
            due_card_limit: DEFAULT_DUE_CARD_LIMIT,
        }
    }
}

impl SchedulerConfig {
    /// Load from the working directory with priority: config.toml > .env / environment > default
    pub fn load() -> Self {
        Self::load_from(Path::new("."))
    }

    /// Load using `dir/config.toml` and `dir/.env`.
    ///
    /// Variables already set in the process environment win over `.env`
    /// entries, the same rule `dotenvy::dotenv()` applies.
    pub fn load_from(dir: &Path) -> Self {
        let section = match std::fs::read_to_string(dir.join("config.toml")) {
            Ok(contents) => Self::parse_section(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config.toml: {}", e);
                SchedulerSection::default()
            }),
            Err(_) => SchedulerSection::default(),
        };

        let dotenv = read_dotenv(&dir.join(".env"));
        Self::resolve(section, |key| {
            std::env::var(key).ok().or_else(|| dotenv.get(key).cloned())
        })
    }

    /// Parse a config.toml body, falling back to defaults for missing keys.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        Ok(Self::resolve(Self::parse_section(contents)?, |_| None))
    }

    fn parse_section(contents: &str) -> Result<SchedulerSection, toml::de::Error> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(file.scheduler.unwrap_or_default())
    }

    /// File value, then `env` lookup, then default. `due_card_limit` is file-only.
    fn resolve(section: SchedulerSection, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = section.database_path {
            tracing::info!("Using database from config.toml: {}", path);
            config.database_path = PathBuf::from(path);
        } else if let Some(path) = env("QUIZ_DB_PATH") {
            tracing::info!("Using database from QUIZ_DB_PATH env: {}", path);
            config.database_path = PathBuf::from(path);
        } else {
            tracing::info!(
                "Using default database path: {}",
                config.database_path.display()
            );
        }

        if let Some(size) = section.session_size {
            config.session_size = size;
        } else if let Some(size) = env("QUIZ_SESSION_SIZE").and_then(|v| v.trim().parse().ok()) {
            config.session_size = size;
        }

        if let Some(limit) = section.due_card_limit {
            config.due_card_limit = limit;
        }

        config
    }
}

/// Entries of a `.env` file without touching the process environment.
fn read_dotenv(path: &Path) -> HashMap<String, String> {
    match dotenvy::from_path_iter(path) {
        Ok(entries) => entries
            .filter_map(|entry| entry.log_warn("Skipping malformed .env entry"))
            .collect(),
        Err(_) => HashMap::new(),
    }
}
