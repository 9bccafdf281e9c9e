//! Chart Viewer Widget
//! Right side scrollable panel with metric tiles, a table preview and the
//! five fatality charts. Chart cards wrap into columns based on width.

use crate::charts::{ChartKind, ChartPlotter};
use crate::stats::{DashboardSummary, Metrics};
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const CHART_WIDTH: f32 = 620.0; // Fixed width for each chart card
const ACCENT: Color32 = Color32::from_rgb(100, 149, 237);

/// What the viewer shows for the current filter selection.
#[derive(Debug, Clone, Default)]
pub struct ViewerContent {
    pub summary: DashboardSummary,
    /// Group count of the top-N charts, shown in their titles.
    pub top_n: usize,
    pub columns: Vec<String>,
    pub preview: Vec<Vec<String>>,
}

#[derive(Default)]
pub struct ChartViewer {
    content: Option<ViewerContent>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.content = None;
    }

    pub fn set_content(&mut self, content: ViewerContent) {
        self.content = Some(content);
    }

    pub fn summary(&self) -> Option<&DashboardSummary> {
        self.content.as_ref().map(|c| &c.summary)
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(content) = &self.content else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("Air Crash Data Analysis").size(26.0).strong());
                ui.add_space(10.0);

                Self::draw_preview(ui, content);
                ui.add_space(CHART_SPACING);

                Self::draw_metrics(ui, &content.summary.metrics);
                ui.add_space(CHART_SPACING);

                let avail_width = ui.available_width();
                let num_columns =
                    ((avail_width / (CHART_WIDTH + CHART_SPACING)).floor() as usize).max(1);

                for row in ChartKind::ALL.chunks(num_columns) {
                    ui.horizontal_top(|ui| {
                        for &kind in row {
                            Self::draw_chart_card(ui, kind, content);
                            ui.add_space(CHART_SPACING);
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    fn draw_preview(ui: &mut egui::Ui, content: &ViewerContent) {
        egui::CollapsingHeader::new(RichText::new("Data Preview").size(14.0).strong())
            .default_open(true)
            .show(ui, |ui| {
                ScrollArea::horizontal()
                    .id_salt("preview_scroll")
                    .show(ui, |ui| {
                        egui::Grid::new("preview_table")
                            .striped(true)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for column in &content.columns {
                                    ui.label(RichText::new(column).strong().size(11.0));
                                }
                                ui.end_row();
                                for row in &content.preview {
                                    for cell in row {
                                        ui.label(RichText::new(cell).size(11.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
                ui.add_space(5.0);
                ui.label(
                    RichText::new(format!("Columns: {}", content.columns.join(", ")))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            });
    }

    fn draw_metrics(ui: &mut egui::Ui, metrics: &Metrics) {
        let tiles = [
            ("Fatality Records", metrics.record_count.to_string()),
            ("Sum of Years", metrics.year_sum.to_string()),
            ("Total Fatalities (Air)", metrics.fatalities_sum.to_string()),
            ("Unique Aircraft", metrics.unique_aircraft.to_string()),
        ];

        ui.horizontal(|ui| {
            for (title, value) in tiles {
                egui::Frame::none()
                    .rounding(8.0)
                    .stroke(egui::Stroke::new(1.0, ACCENT))
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_min_width(170.0);
                        ui.vertical(|ui| {
                            ui.label(RichText::new(title).size(12.0).color(Color32::GRAY));
                            ui.label(RichText::new(value).size(24.0).strong());
                        });
                    });
                ui.add_space(10.0);
            }
        });
    }

    fn draw_chart_card(ui: &mut egui::Ui, kind: ChartKind, content: &ViewerContent) {
        let card_width = CHART_WIDTH - 20.0;
        let series = kind.series(&content.summary);
        let id = format!("chart_{:?}", kind);

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, ACCENT))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(card_width);
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(kind.title(content.top_n))
                            .size(16.0)
                            .strong()
                            .color(ACCENT),
                    );
                    ui.add_space(8.0);

                    if kind == ChartKind::TopCountries {
                        ChartPlotter::draw_pie_chart(ui, &id, &series);
                    } else {
                        ChartPlotter::draw_bar_chart(
                            ui,
                            &id,
                            &series,
                            kind.orientation(),
                            kind.category_title(),
                        );
                    }

                    ui.add_space(8.0);
                    ChartPlotter::draw_totals_table(ui, &id, kind.category_title(), &series);
                });
            });
    }
}
