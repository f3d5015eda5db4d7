//! Study session selection.
//!
//! Builds the ordered queue of cards for one sitting: overdue reviews
//! first (most overdue leading), then a capped batch of never-reviewed
//! cards in creation order. Selection is deterministic; ties fall back to
//! the card id so repeated calls over the same collection agree.

use crate::{Card, StudyConfig};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Select the cards to study now, in presentation order
pub fn build_session(cards: &[Card], now: DateTime<Utc>, config: &StudyConfig) -> Vec<Uuid> {
    let mut due: Vec<&Card> = cards
        .iter()
        .filter(|card| !card.is_new() && card.is_due(now))
        .collect();
    due.sort_by(|a, b| {
        a.next_review_at
            .cmp(&b.next_review_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    due.truncate(config.max_due_per_session);

    let mut fresh: Vec<&Card> = cards.iter().filter(|card| card.is_new()).collect();
    fresh.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    fresh.truncate(config.new_per_session);

    let queue: Vec<Uuid> = due.iter().chain(fresh.iter()).map(|card| card.id).collect();

    tracing::debug!(
        due = due.len(),
        fresh = fresh.len(),
        "built study session of {} cards",
        queue.len()
    );

    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Quality, ReviewRecord};
    use chrono::Days;

    fn config() -> StudyConfig {
        StudyConfig {
            max_due_per_session: 3,
            new_per_session: 2,
        }
    }

    fn reviewed_card(days_overdue: u64, now: DateTime<Utc>) -> Card {
        let mut card = Card::new("front", "back", vec![], now - Days::new(days_overdue + 1));
        card.repetition_count = 1;
        card.interval_days = 1;
        card.next_review_at = Some(now - Days::new(days_overdue));
        card.history.push(ReviewRecord::new(
            now - Days::new(days_overdue + 1),
            Quality::new(4).unwrap(),
        ));
        card
    }

    #[test]
    fn test_overdue_cards_come_first_oldest_leading() {
        let now = Utc::now();
        let slightly = reviewed_card(1, now);
        let very = reviewed_card(5, now);
        let fresh = Card::new("new", "card", vec![], now);

        let queue = build_session(
            &[slightly.clone(), fresh.clone(), very.clone()],
            now,
            &config(),
        );

        assert_eq!(queue, vec![very.id, slightly.id, fresh.id]);
    }

    #[test]
    fn test_future_cards_are_excluded() {
        let now = Utc::now();
        let mut scheduled = reviewed_card(0, now);
        scheduled.next_review_at = Some(now + Days::new(4));

        let queue = build_session(&[scheduled], now, &config());

        assert!(queue.is_empty());
    }

    #[test]
    fn test_session_caps_apply() {
        let now = Utc::now();
        let mut cards = Vec::new();
        for days in 0..5 {
            cards.push(reviewed_card(days, now));
        }
        for _ in 0..4 {
            cards.push(Card::new("new", "card", vec![], now));
        }

        let queue = build_session(&cards, now, &config());

        // 3 due + 2 new from the caps in `config`.
        assert_eq!(queue.len(), 5);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let now = Utc::now();
        let cards = vec![
            reviewed_card(2, now),
            reviewed_card(2, now),
            Card::new("a", "b", vec![], now),
        ];
        let mut reversed = cards.clone();
        reversed.reverse();

        assert_eq!(
            build_session(&cards, now, &config()),
            build_session(&reversed, now, &config())
        );
    }

    #[test]
    fn test_lapsed_card_is_due_not_new() {
        let now = Utc::now();
        // A lapse resets the repetition count but the card keeps history.
        let mut lapsed = reviewed_card(1, now);
        lapsed.repetition_count = 0;

        let queue = build_session(&[lapsed.clone()], now, &config());

        assert_eq!(queue, vec![lapsed.id]);
    }
}
