//! Review scheduling in the SM-2 family.
//!
//! Applying one review outcome to one card produces the card's next
//! scheduling state: strength factor, interval, repetition count, and due
//! instant. The functions here are pure; the caller supplies the clock and
//! persists the result.

use crate::{Card, Quality, ReviewRecord, MIN_STRENGTH_FACTOR};
use chrono::{DateTime, Days, Utc};

/// Apply one review outcome to a card.
///
/// Scheduling rules:
/// 1. The strength factor moves by `0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)`
///    and is floored at [`MIN_STRENGTH_FACTOR`]. Quality 5 gains 0.1,
///    quality 4 holds steady, lower grades shed strength quadratically.
/// 2. A lapse (quality < 3) sends the card back to daily review and resets
///    the repetition count, no matter how mature the card was.
/// 3. The first two consecutive successes use fixed intervals of 1 and 6
///    days; after that the interval is `round(interval * strength)`,
///    rounding half-away-from-zero (`f64::round`).
/// 4. The new due instant is `now` plus the new interval in calendar days.
///
/// Everything outside the scheduling fields is carried over unchanged,
/// except that the outcome is appended to the card's history.
pub fn review(card: &Card, quality: Quality, now: DateTime<Utc>) -> Card {
    let strength_factor = next_strength(card.strength_factor, quality);
    let (interval_days, repetition_count) = next_interval(card, quality, strength_factor);

    let next_review_at = now + Days::new(u64::from(interval_days));

    let mut history = card.history.clone();
    history.push(ReviewRecord::new(now, quality));

    tracing::debug!(
        card_id = %card.id,
        quality = %quality,
        interval_days,
        repetition_count,
        "scheduled next review for {}",
        next_review_at
    );

    Card {
        strength_factor,
        interval_days,
        repetition_count,
        next_review_at: Some(next_review_at),
        history,
        ..card.clone()
    }
}

/// Compute the updated strength factor for a grade
fn next_strength(current: f64, quality: Quality) -> f64 {
    let q = f64::from(quality.value());
    let delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
    (current + delta).max(MIN_STRENGTH_FACTOR)
}

/// Compute the next interval and repetition count
fn next_interval(card: &Card, quality: Quality, strength: f64) -> (u32, u32) {
    if !quality.is_passing() {
        return (1, 0);
    }

    match card.repetition_count {
        0 => (1, 1),
        1 => (6, 2),
        repetitions => {
            if card.interval_days == 0 {
                // Inconsistent stored state: a card this far along always has
                // a positive interval. Recover with the minimum instead of
                // scheduling a zero-day interval.
                tracing::warn!(
                    card_id = %card.id,
                    repetitions,
                    "repetition count with zero interval, clamping to 1 day"
                );
            }
            let grown = (f64::from(card.interval_days) * strength).round() as u32;
            (grown.max(1), repetitions + 1)
        }
    }
}
