//! Air Crash Dashboard - Historical Air Crash Data Analysis
//!
//! Loads a CSV of air crash records once, normalizes it into a typed table,
//! and answers filter-and-aggregate queries for the dashboard.

pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod gui;
pub mod stats;

pub use config::DashboardConfig;
pub use data::{
    CrashLoader, CrashRecord, CrashTable, FilterField, FilteredView, LoaderError, Predicates,
    TableCache, YearBin,
};
pub use stats::{CrashAggregator, DashboardSummary, GroupTotal, Metrics};
