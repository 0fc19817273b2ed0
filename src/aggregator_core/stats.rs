//! Scalar statistics shown in the dashboard summary cards

use super::grouping::CategoryCount;
use super::normalizer::LoginEvent;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_count: usize,
    pub unique_category_count: usize,
    /// `None` when there are no categories to divide by
    pub average_per_category: Option<f64>,
}

impl SummaryStats {
    pub fn from_counts(events: &[LoginEvent], counts: &[CategoryCount]) -> Self {
        let total_count = events.len();
        let unique_category_count = counts.len();

        Self {
            total_count,
            unique_category_count,
            average_per_category: average(total_count, unique_category_count),
        }
    }
}

fn average(total: usize, categories: usize) -> Option<f64> {
    if categories == 0 {
        return None;
    }
    Some(total as f64 / categories as f64)
}
