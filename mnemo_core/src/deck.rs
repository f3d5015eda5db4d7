//! Card collection utilities: filtering, ordering, and search.

use crate::Card;
use chrono::{DateTime, Utc};

/// Orderings for listing a card collection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    /// Soonest next review first; never-scheduled cards last
    Due,
    /// Least-practiced cards first
    Newest,
    /// Most-practiced cards first
    Mastered,
}

/// Cards due at the given instant
pub fn due_cards<'a>(cards: &'a [Card], now: DateTime<Utc>) -> Vec<&'a Card> {
    cards.iter().filter(|card| card.is_due(now)).collect()
}

/// Sort a card collection for display
pub fn sort_cards<'a>(cards: &'a [Card], order: SortOrder) -> Vec<&'a Card> {
    let mut sorted: Vec<&Card> = cards.iter().collect();
    match order {
        SortOrder::Due => sorted.sort_by(|a, b| {
            match (a.next_review_at, b.next_review_at) {
                (Some(left), Some(right)) => left.cmp(&right),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| a.id.cmp(&b.id))
        }),
        SortOrder::Newest => sorted.sort_by(|a, b| {
            a.repetition_count
                .cmp(&b.repetition_count)
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortOrder::Mastered => sorted.sort_by(|a, b| {
            b.repetition_count
                .cmp(&a.repetition_count)
                .then_with(|| a.id.cmp(&b.id))
        }),
    }
    sorted
}

/// Cards carrying every one of the requested tags.
///
/// An empty tag list matches everything.
pub fn filter_by_tags<'a>(cards: &'a [Card], tags: &[String]) -> Vec<&'a Card> {
    if tags.is_empty() {
        return cards.iter().collect();
    }
    cards
        .iter()
        .filter(|card| tags.iter().all(|tag| card.tags.contains(tag)))
        .collect()
}

/// Case-insensitive search over front, back, and tags
pub fn search<'a>(cards: &'a [Card], query: &str) -> Vec<&'a Card> {
    let needle = query.to_lowercase();
    cards
        .iter()
        .filter(|card| {
            card.front.to_lowercase().contains(&needle)
                || card.back.to_lowercase().contains(&needle)
                || card
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Humanized description of when a card comes up next
pub fn describe_next_review(card: &Card, now: DateTime<Utc>) -> String {
    let Some(next_review_at) = card.next_review_at else {
        return "Not scheduled".into();
    };

    let until = next_review_at - now;
    if until <= chrono::Duration::zero() {
        return "Due now".into();
    }

    let hours = until.num_hours();
    if hours >= 24 {
        let days = hours / 24;
        format!("Due in {} day{}", days, if days > 1 { "s" } else { "" })
    } else if hours > 0 {
        format!("Due in {} hour{}", hours, if hours > 1 { "s" } else { "" })
    } else {
        let minutes = until.num_minutes().max(1);
        format!(
            "Due in {} minute{}",
            minutes,
            if minutes > 1 { "s" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, Duration, Utc};

    fn tagged_card(front: &str, tags: &[&str], now: DateTime<Utc>) -> Card {
        Card::new(
            front,
            "back",
            tags.iter().map(|t| t.to_string()).collect(),
            now,
        )
    }

    #[test]
    fn test_due_cards_filter() {
        let now = Utc::now();
        let due = Card::new("due", "back", vec![], now - Days::new(1));
        let mut future = Card::new("future", "back", vec![], now);
        future.next_review_at = Some(now + Days::new(2));

        let cards = vec![due, future];
        let found = due_cards(&cards, now);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].front, "due");
    }

    #[test]
    fn test_sort_due_puts_unscheduled_last() {
        let now = Utc::now();
        let mut soon = Card::new("soon", "back", vec![], now);
        soon.next_review_at = Some(now + Days::new(1));
        let mut later = Card::new("later", "back", vec![], now);
        later.next_review_at = Some(now + Days::new(5));
        let mut unscheduled = Card::new("unscheduled", "back", vec![], now);
        unscheduled.next_review_at = None;

        let cards = vec![later, unscheduled, soon];
        let sorted = sort_cards(&cards, SortOrder::Due);

        let fronts: Vec<&str> = sorted.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(fronts, vec!["soon", "later", "unscheduled"]);
    }

    #[test]
    fn test_sort_by_practice_level() {
        let now = Utc::now();
        let mut practiced = Card::new("practiced", "back", vec![], now);
        practiced.repetition_count = 6;
        let fresh = Card::new("fresh", "back", vec![], now);

        let cards = vec![practiced, fresh];

        assert_eq!(sort_cards(&cards, SortOrder::Newest)[0].front, "fresh");
        assert_eq!(sort_cards(&cards, SortOrder::Mastered)[0].front, "practiced");
    }

    #[test]
    fn test_filter_requires_every_tag() {
        let now = Utc::now();
        let cards = vec![
            tagged_card("both", &["rust", "async"], now),
            tagged_card("one", &["rust"], now),
            tagged_card("none", &[], now),
        ];

        let both = filter_by_tags(&cards, &["rust".into(), "async".into()]);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].front, "both");

        let all = filter_by_tags(&cards, &[]);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let now = Utc::now();
        let mut card = tagged_card("Borrow checker", &["rust"], now);
        card.back = "Ownership rules".into();

        let cards = vec![card];

        assert_eq!(search(&cards, "BORROW").len(), 1);
        assert_eq!(search(&cards, "ownership").len(), 1);
        assert_eq!(search(&cards, "RUST").len(), 1);
        assert!(search(&cards, "python").is_empty());
    }

    #[test]
    fn test_describe_next_review() {
        let now = Utc::now();
        let mut card = Card::new("front", "back", vec![], now);

        card.next_review_at = None;
        assert_eq!(describe_next_review(&card, now), "Not scheduled");

        card.next_review_at = Some(now - Duration::minutes(5));
        assert_eq!(describe_next_review(&card, now), "Due now");

        card.next_review_at = Some(now + Duration::minutes(30));
        assert_eq!(describe_next_review(&card, now), "Due in 30 minutes");

        card.next_review_at = Some(now + Duration::hours(5));
        assert_eq!(describe_next_review(&card, now), "Due in 5 hours");

        card.next_review_at = Some(now + Days::new(3));
        assert_eq!(describe_next_review(&card, now), "Due in 3 days");
    }
}
