//! loginflow - employee login analytics
//!
//! Derives the dashboard views (per-company counts, login time trend,
//! recent logins and summary statistics) from a list of login events.

pub mod aggregator_core;
pub mod config;

pub use aggregator_core::{
    bucket_by_time, group_by_category, order_by_recency, DashboardSnapshot, LoginEvent,
    SnapshotOptions,
};
