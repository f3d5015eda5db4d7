#![forbid(unsafe_code)]

//! Core domain model and business logic for the mnemo study engine.
//!
//! This crate provides:
//! - Domain types (cards, review grades, progress statistics)
//! - The review scheduler
//! - Progress aggregation and daily rollups
//! - Study-session selection and analytics
//! - Persistence (deck store, review journal, CSV export)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod scheduler;
pub mod stats;
pub mod queue;
pub mod deck;
pub mod analytics;
pub mod store;
pub mod journal;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use analytics::{
    EventSink, NullNotifier, ReviewNotifier, SessionRecorder, SessionSummary, StudyEvent,
};
pub use config::{Config, StudyConfig};
pub use journal::{read_entries, JournalEntry, JsonlJournal, ReviewSink};
pub use queue::build_session;
pub use scheduler::review;
pub use stats::{accuracy_trend, daily_progress, mastery_percent, summarize};
pub use store::Deck;
