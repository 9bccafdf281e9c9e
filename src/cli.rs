//! Command-line arguments.

use crate::data::{FilterField, Predicates};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "air-crash-dashboard",
    version,
    about = "Interactive dashboard for historical air crash records"
)]
pub struct Args {
    /// CSV file with air crash records (overrides the config file)
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level filter when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print metrics and totals to stdout instead of opening a window
    #[arg(long)]
    pub report: bool,

    /// Render the charts as PNG files into DIR instead of opening a window
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Only include these years (repeatable)
    #[arg(long = "year", value_name = "YEAR")]
    pub years: Vec<String>,

    /// Only include these quarters (repeatable)
    #[arg(long = "quarter", value_name = "QUARTER")]
    pub quarters: Vec<String>,

    /// Only include these month labels (repeatable)
    #[arg(long = "month", value_name = "MONTH")]
    pub months: Vec<String>,
}

impl Args {
    pub fn is_headless(&self) -> bool {
        self.report || self.export_dir.is_some()
    }

    pub fn predicates(&self) -> Predicates {
        Predicates::new()
            .with(FilterField::Year, self.years.iter().cloned())
            .with(FilterField::Quarter, self.quarters.iter().cloned())
            .with(FilterField::Month, self.months.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_filters_build_predicates() {
        let args = Args::parse_from([
            "air-crash-dashboard",
            "--report",
            "--year",
            "1977",
            "--year",
            "1985",
            "--month",
            "March",
        ]);
        assert!(args.is_headless());
        let predicates = args.predicates();
        assert!(predicates.is_selected(FilterField::Year, "1985"));
        assert!(predicates.is_selected(FilterField::Month, "March"));
        assert!(predicates.allowed(FilterField::Quarter).is_none());
    }

    #[test]
    fn no_flags_opens_the_window() {
        let args = Args::parse_from(["air-crash-dashboard"]);
        assert!(!args.is_headless());
        assert!(args.predicates().is_empty());
    }
}
