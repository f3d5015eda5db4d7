//! Core domain types for the mnemo study engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Cards and their scheduling state
//! - Review grades and per-review records
//! - Aggregated progress statistics and daily rollups

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard floor for a card's strength factor.
pub const MIN_STRENGTH_FACTOR: f64 = 1.3;

/// Strength factor assigned to a freshly created card.
pub const INITIAL_STRENGTH_FACTOR: f64 = 2.5;

/// Consecutive successful reviews before a card counts as mastered.
pub const MASTERY_THRESHOLD: u32 = 5;

// ============================================================================
// Review Grades
// ============================================================================

/// A recall grade on the 1..=5 scale.
///
/// Grades of 3 and above mean the card was recalled correctly; 1 and 2 are
/// lapses. Construction validates the range, so a `Quality` in hand is
/// always a legal grade.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validate and wrap a raw grade
    pub fn new(value: u8) -> crate::Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(crate::Error::InvalidQuality(value))
        }
    }

    /// The raw 1..=5 value
    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether this grade counts as a correct recall (>= 3)
    pub fn is_passing(self) -> bool {
        self.0 >= 3
    }
}

impl TryFrom<u8> for Quality {
    type Error = crate::Error;

    fn try_from(value: u8) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> u8 {
        quality.0
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Cards and Reviews
// ============================================================================

/// One grading event in a card's history
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReviewRecord {
    pub reviewed_at: DateTime<Utc>,
    pub quality: Quality,
    pub was_correct: bool,
}

impl ReviewRecord {
    pub fn new(reviewed_at: DateTime<Utc>, quality: Quality) -> Self {
        Self {
            reviewed_at,
            quality,
            was_correct: quality.is_passing(),
        }
    }
}

/// A reviewable unit of knowledge with its scheduling state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,

    /// Interval-growth multiplier, never below [`MIN_STRENGTH_FACTOR`]
    pub strength_factor: f64,
    /// Days until the next scheduled review; 0 for a brand-new card
    pub interval_days: u32,
    /// Consecutive successful reviews since the last lapse
    pub repetition_count: u32,
    /// The card is due once the current time reaches this instant
    pub next_review_at: Option<DateTime<Utc>>,

    /// Past review outcomes, append-only, oldest first
    #[serde(default)]
    pub history: Vec<ReviewRecord>,
}

impl Card {
    /// Create a new card, immediately due for its first review
    pub fn new(
        front: impl Into<String>,
        back: impl Into<String>,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            front: front.into(),
            back: back.into(),
            tags,
            created_at: now,
            strength_factor: INITIAL_STRENGTH_FACTOR,
            interval_days: 0,
            repetition_count: 0,
            next_review_at: Some(now),
            history: Vec::new(),
        }
    }

    /// Whether the card is due at the given instant
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at.is_some_and(|at| at <= now)
    }

    /// Whether the card has never been reviewed
    pub fn is_new(&self) -> bool {
        self.repetition_count == 0 && self.history.is_empty()
    }

    /// The most recent review outcome, if any
    pub fn last_review(&self) -> Option<&ReviewRecord> {
        self.history.last()
    }
}

// ============================================================================
// Aggregation Types
// ============================================================================

/// Aggregate review activity for one calendar day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub reviewed_count: u32,
    pub correct_count: u32,
    /// Running day streak as of this date
    pub streak: u32,
}

/// Summary statistics over a whole card collection
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressStats {
    pub total_cards: usize,
    pub due_cards: usize,
    pub mastered_cards: usize,
    pub learning_cards: usize,
    pub new_cards: usize,
    /// Percentage of correct reviews across all history, 0 when unreviewed
    pub accuracy: f64,
    /// Consecutive correct most-recent outcomes, one per calendar day
    pub streak: u32,
    pub last_review_at: Option<DateTime<Utc>>,
}
