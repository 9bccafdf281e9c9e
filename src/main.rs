//! Air Crash Dashboard - Historical Air Crash Data Analysis
//!
//! Opens the interactive dashboard, or prints a report / exports chart
//! images when run headless.

use air_crash_dashboard::charts::StaticChartRenderer;
use air_crash_dashboard::cli::Args;
use air_crash_dashboard::gui::DashboardApp;
use air_crash_dashboard::{CrashAggregator, DashboardConfig, TableCache};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Print the summary and/or export charts without opening a window.
fn run_headless(config: &DashboardConfig, args: &Args) -> Result<()> {
    let mut cache = TableCache::new(config.data_path.clone());
    let table = cache
        .get_or_load()
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    let view = table.filter(&args.predicates());
    let summary = CrashAggregator::summarize(&view, config.top_n);

    if args.report {
        print!("{}", summary);
    }

    if let Some(dir) = &args.export_dir {
        let size = (config.export.width, config.export.height);
        let paths = StaticChartRenderer::export_all(&summary, dir, size, config.top_n)
            .context("exporting charts")?;
        for path in paths {
            info!(path = %path.display(), "wrote chart");
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config =
        DashboardConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }
    info!(data = %config.data_path.display(), "starting");

    if args.is_headless() {
        return run_headless(&config, &args);
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Air Crash Data Analysis"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Air Crash Data Analysis",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
