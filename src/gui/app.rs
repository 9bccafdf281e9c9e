//! Air Crash Dashboard Main Application
//! Main window with the filter panel and the chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{CrashLoader, CrashTable, TableCache};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, ViewerContent};
use crate::stats::CrashAggregator;
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{error, info, warn};

/// Outcome of a background table load.
enum LoadResult {
    Complete(CrashTable),
    Error(String),
}

/// Dashboard window: filter panel on the left, charts in the middle.
pub struct DashboardApp {
    config: DashboardConfig,
    cache: TableCache,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Background table load
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            cache: TableCache::new(config.data_path.clone()),
            control_panel: ControlPanel::new(config.data_path.clone()),
            chart_viewer: ChartViewer::new(),
            config,
            load_rx: None,
            is_loading: false,
        };
        app.start_load();
        app
    }

    /// Load the cached source on a background thread.
    fn start_load(&mut self) {
        if self.is_loading {
            return;
        }

        self.chart_viewer.clear();
        self.control_panel.clear_options();
        self.control_panel.csv_path = self.cache.path().to_path_buf();
        self.control_panel.set_status("Loading CSV file...");
        self.control_panel.is_busy = true;
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let path = self.cache.path().to_path_buf();
        thread::spawn(move || {
            let result = match CrashLoader::load(&path) {
                Ok(table) => LoadResult::Complete(table),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Poll the loader thread without blocking the frame.
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(table)) => {
                let table = self.cache.store(table);
                self.control_panel.update_options(&table);
                self.control_panel.set_status(format!(
                    "Loaded {} records, {} columns",
                    table.len(),
                    table.columns().len()
                ));
                self.finish_load();
                self.recompute();
            }
            Ok(LoadResult::Error(message)) => {
                error!(%message, "failed to load crash data");
                self.control_panel.set_status(format!("Error: {}", message));
                self.finish_load();
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.set_status("Error: loader stopped unexpectedly");
                self.finish_load();
            }
        }
    }

    fn finish_load(&mut self) {
        self.is_loading = false;
        self.control_panel.is_busy = false;
    }

    /// Re-run the filter and aggregation pipeline for the current selection.
    fn recompute(&mut self) {
        let Some(table) = self.cache.get() else {
            return;
        };
        let view = table.filter(&self.control_panel.predicates);
        let summary = CrashAggregator::summarize(&view, self.config.top_n);
        let content = ViewerContent {
            summary,
            top_n: self.config.top_n,
            columns: table.column_names(),
            preview: view.preview(self.config.preview_rows),
        };
        self.chart_viewer.set_content(content);
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            info!(path = %path.display(), "selected data file");
            self.cache.set_path(path);
            self.start_load();
        }
    }

    fn handle_reload(&mut self) {
        self.cache.clear();
        self.start_load();
    }

    /// Render the current charts to PNG files in a chosen folder.
    fn handle_export_png(&mut self) {
        let Some(summary) = self.chart_viewer.summary().cloned() else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        let size = (self.config.export.width, self.config.export.height);
        match StaticChartRenderer::export_all(&summary, &dir, size, self.config.top_n) {
            Ok(paths) => {
                self.control_panel
                    .set_status(format!("Exported {} charts", paths.len()));
                if let Err(e) = open::that(&dir) {
                    warn!(error = %e, dir = %dir.display(), "could not open export folder");
                }
            }
            Err(e) => {
                error!(error = %e, "chart export failed");
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Filters
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::FiltersChanged => self.recompute(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
