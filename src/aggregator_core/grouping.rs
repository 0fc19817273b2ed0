//! Per-company login tallies

use super::normalizer::LoginEvent;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Count events per category, largest count first.
///
/// Categories with equal counts keep the order in which they first appear
/// in `events`.
pub fn group_by_category(events: &[LoginEvent]) -> Vec<CategoryCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for event in events {
        let idx = *positions.entry(event.category.as_str()).or_insert_with(|| {
            counts.push(CategoryCount {
                category: event.category.clone(),
                count: 0,
            });
            counts.len() - 1
        });
        counts[idx].count += 1;
    }

    // sort_by is stable, so first-seen order survives among ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Fraction of all events held by one category
pub fn category_share(count: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(count as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(categories: &[&str]) -> Vec<LoginEvent> {
        categories
            .iter()
            .enumerate()
            .map(|(i, c)| LoginEvent::new(*c, format!("emp{}", i), "2025-07-08T07:00:00+07:00"))
            .collect()
    }

    #[test]
    fn test_group_counts_descending() {
        let counts = group_by_category(&events(&["A", "A", "B"]));
        assert_eq!(
            counts,
            vec![
                CategoryCount { category: "A".to_string(), count: 2 },
                CategoryCount { category: "B".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let counts = group_by_category(&events(&["C", "B", "A", "B", "C", "A", "D"]));
        let order: Vec<&str> = counts.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A", "D"]);
    }

    #[test]
    fn test_minority_first_seen_still_sorted_by_count() {
        let counts = group_by_category(&events(&["0999", "5678", "5678", "1234", "5678"]));
        let order: Vec<(&str, usize)> =
            counts.iter().map(|c| (c.category.as_str(), c.count)).collect();
        assert_eq!(order, vec![("5678", 3), ("0999", 1), ("1234", 1)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_category(&[]).is_empty());
    }

    #[test]
    fn test_category_share() {
        assert_eq!(category_share(1, 4), Some(0.25));
        assert_eq!(category_share(0, 0), None);
    }
}
