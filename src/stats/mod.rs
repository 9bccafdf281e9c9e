//! Stats module - Metrics and grouped fatality totals

mod calculator;
mod report;

pub use calculator::{
    CrashAggregator, DashboardSummary, GroupTotal, Metrics, DEFAULT_TOP_N,
};
