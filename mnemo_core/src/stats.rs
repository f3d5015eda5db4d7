//! Progress aggregation over a card collection.
//!
//! Everything here is a pure computation over in-memory cards: stage
//! counts, accuracy, the day streak, and the per-day rollup that feeds
//! dashboards and CSV export. Aggregation treats its input as a set; the
//! order cards arrive in never changes the result.

use crate::{Card, DailyStat, ProgressStats, MASTERY_THRESHOLD};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Number of most recent days considered "recent" by [`accuracy_trend`].
const TREND_WINDOW_DAYS: usize = 7;

/// Summarize a card collection at the given instant.
///
/// Every card lands in exactly one stage bucket: mastered
/// (`repetition_count >= 5`), learning (at least one success since the
/// last lapse), or new. Accuracy is the percentage of correct reviews
/// across all card histories, 0 when nothing has been reviewed yet.
pub fn summarize(cards: &[Card], now: DateTime<Utc>) -> ProgressStats {
    let mut stats = ProgressStats {
        total_cards: cards.len(),
        ..ProgressStats::default()
    };

    let mut total_reviews = 0u64;
    let mut correct_reviews = 0u64;

    for card in cards {
        if card.repetition_count >= MASTERY_THRESHOLD {
            stats.mastered_cards += 1;
        } else if card.repetition_count > 0 {
            stats.learning_cards += 1;
        } else {
            stats.new_cards += 1;
        }

        if card.is_due(now) {
            stats.due_cards += 1;
        }

        for record in &card.history {
            total_reviews += 1;
            if record.was_correct {
                correct_reviews += 1;
            }
        }

        if let Some(last) = card.last_review() {
            if stats.last_review_at.map_or(true, |at| last.reviewed_at > at) {
                stats.last_review_at = Some(last.reviewed_at);
            }
        }
    }

    stats.accuracy = if total_reviews > 0 {
        correct_reviews as f64 / total_reviews as f64 * 100.0
    } else {
        0.0
    };
    stats.streak = review_streak(cards);

    tracing::debug!(
        total = stats.total_cards,
        due = stats.due_cards,
        accuracy = stats.accuracy,
        "summarized card collection"
    );

    stats
}

/// Count the current review streak.
///
/// Takes each card's most recent outcome, keeps only the newest outcome
/// per calendar day, and walks those days newest-first counting correct
/// outcomes until the first incorrect one.
fn review_streak(cards: &[Card]) -> u32 {
    let mut latest: Vec<(Uuid, &crate::ReviewRecord)> = cards
        .iter()
        .filter_map(|card| card.last_review().map(|record| (card.id, record)))
        .collect();

    // Newest first; ties broken by card id so input order cannot matter.
    latest.sort_by(|a, b| {
        b.1.reviewed_at
            .cmp(&a.1.reviewed_at)
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut streak = 0;
    let mut seen_days = HashSet::new();
    for (_, record) in latest {
        if !seen_days.insert(record.reviewed_at.date_naive()) {
            continue;
        }
        if record.was_correct {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Roll up review activity per calendar day, newest first.
///
/// One entry per day with at least one recorded review. Each day carries
/// the running streak as of that day: a day with at least one correct
/// answer extends the streak, a day without one resets it.
pub fn daily_progress(cards: &[Card]) -> Vec<DailyStat> {
    let mut by_day: BTreeMap<chrono::NaiveDate, (u32, u32)> = BTreeMap::new();

    for card in cards {
        for record in &card.history {
            let entry = by_day.entry(record.reviewed_at.date_naive()).or_default();
            entry.0 += 1;
            if record.was_correct {
                entry.1 += 1;
            }
        }
    }

    // Streaks accumulate oldest-to-newest; output is newest-first.
    let mut streak = 0;
    let mut days: Vec<DailyStat> = by_day
        .into_iter()
        .map(|(date, (reviewed_count, correct_count))| {
            streak = if correct_count > 0 { streak + 1 } else { 0 };
            DailyStat {
                date,
                reviewed_count,
                correct_count,
                streak,
            }
        })
        .collect();
    days.reverse();
    days
}

/// Week-over-week accuracy change, in percent.
///
/// Compares the mean daily accuracy of the last [`TREND_WINDOW_DAYS`]
/// recorded days against the mean over all recorded days. Defined as 0
/// when the overall mean is 0 or fewer than two days are recorded, so a
/// quiet deck never produces a division artifact.
pub fn accuracy_trend(daily: &[DailyStat]) -> f64 {
    if daily.len() < 2 {
        return 0.0;
    }

    let day_accuracy = |stat: &DailyStat| {
        if stat.reviewed_count > 0 {
            f64::from(stat.correct_count) / f64::from(stat.reviewed_count)
        } else {
            0.0
        }
    };

    let overall: f64 =
        daily.iter().map(day_accuracy).sum::<f64>() / daily.len() as f64 * 100.0;
    if overall == 0.0 {
        return 0.0;
    }

    let recent_days = &daily[..daily.len().min(TREND_WINDOW_DAYS)];
    let recent: f64 =
        recent_days.iter().map(day_accuracy).sum::<f64>() / recent_days.len() as f64 * 100.0;

    (recent - overall) / overall * 100.0
}

/// Share of the collection that is mastered, in percent
pub fn mastery_percent(stats: &ProgressStats) -> f64 {
    if stats.total_cards == 0 {
        return 0.0;
    }
    stats.mastered_cards as f64 / stats.total_cards as f64 * 100.0
}
