//! Study-session analytics.
//!
//! Events are tagged variants carrying exactly the fields each event
//! needs. The recorder is an explicit context object the host constructs
//! and threads through its review loop; nothing here is reachable through
//! globals. Streak numbers are not computed here — the single streak rule
//! lives in [`crate::stats`].

use crate::Quality;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// How many card ids the summary lists per ranking
const RANKING_SIZE: usize = 5;

/// Reviews a card needs this session before it can rank as difficult
const DIFFICULTY_MIN_REVIEWS: u32 = 3;

// ============================================================================
// Events
// ============================================================================

/// One study event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StudyEvent {
    SessionStarted {
        at: DateTime<Utc>,
    },
    SessionEnded {
        at: DateTime<Utc>,
    },
    CardAdded {
        card_id: Uuid,
        at: DateTime<Utc>,
    },
    CardReviewed {
        card_id: Uuid,
        at: DateTime<Utc>,
        quality: Quality,
        /// Time the learner took to answer, when the host measures it
        response_ms: Option<u64>,
        repetition_count: u32,
        strength_factor: f64,
    },
}

/// Receiver for study events
pub trait EventSink {
    fn record(&mut self, event: StudyEvent);
}

/// Hook for per-review feedback (the host decides how to present it)
pub trait ReviewNotifier {
    fn on_review(&mut self, correct: bool);
}

/// Notifier that does nothing, for hosts without feedback
pub struct NullNotifier;

impl ReviewNotifier for NullNotifier {
    fn on_review(&mut self, _correct: bool) {}
}

// ============================================================================
// Session Recording
// ============================================================================

/// Per-card tallies within one session
#[derive(Clone, Copy, Debug, Default)]
struct CardTally {
    reviews: u32,
    correct: u32,
}

/// Collects the events of one study session
#[derive(Clone, Debug)]
pub struct SessionRecorder {
    events: Vec<StudyEvent>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    response_times: Vec<u64>,
}

/// What happened in one study session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub cards_reviewed: u32,
    pub correct: u32,
    pub incorrect: u32,
    /// Mean response time in milliseconds over the timed reviews
    pub average_response_ms: Option<f64>,
    /// Up to five card ids, most reviewed first
    pub most_reviewed: Vec<Uuid>,
    /// Up to five card ids with the lowest pass rate, at least
    /// [`DIFFICULTY_MIN_REVIEWS`] reviews each
    pub most_difficult: Vec<Uuid>,
}

impl SessionRecorder {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            events: vec![StudyEvent::SessionStarted { at: started_at }],
            started_at,
            ended_at: None,
            response_times: Vec::new(),
        }
    }

    /// Mark the session over
    pub fn finish(&mut self, at: DateTime<Utc>) {
        self.ended_at = Some(at);
        self.events.push(StudyEvent::SessionEnded { at });
    }

    pub fn events(&self) -> &[StudyEvent] {
        &self.events
    }

    /// Summarize the session recorded so far
    pub fn summary(&self) -> SessionSummary {
        let mut tallies: HashMap<Uuid, CardTally> = HashMap::new();
        let mut cards_reviewed = 0;
        let mut correct = 0;
        let mut incorrect = 0;

        for event in &self.events {
            if let StudyEvent::CardReviewed {
                card_id, quality, ..
            } = event
            {
                cards_reviewed += 1;
                let tally = tallies.entry(*card_id).or_default();
                tally.reviews += 1;
                if quality.is_passing() {
                    tally.correct += 1;
                    correct += 1;
                } else {
                    incorrect += 1;
                }
            }
        }

        let mut by_reviews: Vec<(Uuid, CardTally)> =
            tallies.iter().map(|(id, tally)| (*id, *tally)).collect();
        by_reviews.sort_by(|a, b| b.1.reviews.cmp(&a.1.reviews).then_with(|| a.0.cmp(&b.0)));
        let most_reviewed = by_reviews
            .iter()
            .take(RANKING_SIZE)
            .map(|(id, _)| *id)
            .collect();

        let mut by_difficulty: Vec<(Uuid, CardTally)> = tallies
            .iter()
            .filter(|(_, tally)| tally.reviews >= DIFFICULTY_MIN_REVIEWS)
            .map(|(id, tally)| (*id, *tally))
            .collect();
        by_difficulty.sort_by(|a, b| {
            let left = f64::from(a.1.correct) / f64::from(a.1.reviews);
            let right = f64::from(b.1.correct) / f64::from(b.1.reviews);
            left.partial_cmp(&right)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        let most_difficult = by_difficulty
            .iter()
            .take(RANKING_SIZE)
            .map(|(id, _)| *id)
            .collect();

        let average_response_ms = if self.response_times.is_empty() {
            None
        } else {
            Some(
                self.response_times.iter().sum::<u64>() as f64
                    / self.response_times.len() as f64,
            )
        };

        SessionSummary {
            started_at: self.started_at,
            ended_at: self.ended_at,
            cards_reviewed,
            correct,
            incorrect,
            average_response_ms,
            most_reviewed,
            most_difficult,
        }
    }
}

impl EventSink for SessionRecorder {
    fn record(&mut self, event: StudyEvent) {
        if let StudyEvent::CardReviewed {
            response_ms: Some(ms),
            ..
        } = &event
        {
            self.response_times.push(*ms);
        }
        self.events.push(event);
    }
}
