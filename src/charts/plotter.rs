//! Chart Plotter Module
//! Interactive fatality charts drawn with egui_plot.

use crate::data::normalize::format_number;
use crate::stats::GroupTotal;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};
use std::f64::consts::TAU;
use std::fmt::Display;

pub const NO_DATA_MESSAGE: &str = "No data to display for the selected filters.";

const CHART_HEIGHT: f32 = 300.0;

pub const PALETTE: [Color32; 12] = [
    Color32::from_rgb(31, 119, 180),  // Blue
    Color32::from_rgb(255, 127, 14),  // Orange
    Color32::from_rgb(44, 160, 44),   // Green
    Color32::from_rgb(214, 39, 40),   // Red
    Color32::from_rgb(148, 103, 189), // Purple
    Color32::from_rgb(140, 86, 75),   // Brown
    Color32::from_rgb(227, 119, 194), // Pink
    Color32::from_rgb(127, 127, 127), // Grey
    Color32::from_rgb(188, 189, 34),  // Olive
    Color32::from_rgb(23, 190, 207),  // Cyan
    Color32::from_rgb(174, 199, 232), // Light Blue
    Color32::from_rgb(255, 187, 120), // Light Orange
];

/// Bar orientation; horizontal bars put categories on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Labels and values ready to plot, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn from_groups<K: Display>(groups: &[GroupTotal<K>]) -> Self {
        Self {
            labels: groups.iter().map(|g| g.key.to_string()).collect(),
            values: groups.iter().map(|g| g.total).collect(),
        }
    }

    /// Years print without a trailing `.0`.
    pub fn from_years(groups: &[GroupTotal<f64>]) -> Self {
        Self {
            labels: groups.iter().map(|g| format_number(g.key)).collect(),
            values: groups.iter().map(|g| g.total).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    pub fn draw_no_data(ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.label(RichText::new(format!("ℹ {}", NO_DATA_MESSAGE)).color(Color32::GRAY));
        ui.add_space(10.0);
    }

    /// Bar chart with one colored bar per category.
    ///
    /// Horizontal charts keep the first category on top.
    pub fn draw_bar_chart(
        ui: &mut egui::Ui,
        id: &str,
        series: &ChartSeries,
        orientation: Orientation,
        category_title: &str,
    ) {
        if series.is_empty() {
            Self::draw_no_data(ui);
            return;
        }

        let n = series.labels.len();
        let position = move |i: usize| match orientation {
            Orientation::Vertical => i as f64,
            Orientation::Horizontal => (n - 1 - i) as f64,
        };

        let bars: Vec<Bar> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                Bar::new(position(i), value)
                    .name(&series.labels[i])
                    .fill(Self::series_color(i))
                    .width(0.7)
            })
            .collect();

        let mut chart = BarChart::new(bars).name("Total Fatalities");
        if orientation == Orientation::Horizontal {
            chart = chart.horizontal();
        }

        // Category label at each integer position
        let mut by_position: Vec<String> = vec![String::new(); n];
        for (i, label) in series.labels.iter().enumerate() {
            by_position[position(i) as usize] = label.clone();
        }
        let category_formatter = move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            by_position.get(idx as usize).cloned().unwrap_or_default()
        };
        let category_marks = move |_input: egui_plot::GridInput| {
            (0..n)
                .map(|i| GridMark {
                    value: i as f64,
                    step_size: 1.0,
                })
                .collect::<Vec<_>>()
        };

        let plot = Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false);

        let plot = match orientation {
            Orientation::Vertical => plot
                .x_axis_label(category_title)
                .y_axis_label("Total Fatalities")
                .x_axis_formatter(category_formatter)
                .x_grid_spacer(category_marks)
                .include_y(0.0),
            Orientation::Horizontal => plot
                .x_axis_label("Total Fatalities")
                .y_axis_label(category_title)
                .y_axis_formatter(category_formatter)
                .y_grid_spacer(category_marks)
                .include_x(0.0),
        };

        plot.show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
    }

    /// Pie chart with a legend entry and percentage label per slice.
    pub fn draw_pie_chart(ui: &mut egui::Ui, id: &str, series: &ChartSeries) {
        if series.is_empty() {
            Self::draw_no_data(ui);
            return;
        }
        let total = series.total();
        if total <= 0.0 {
            ui.label(RichText::new("No fatalities recorded for these groups.").color(Color32::GRAY));
            return;
        }

        Plot::new(id)
            .height(CHART_HEIGHT)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                let mut start = 0.0;
                for (i, (label, &value)) in series.labels.iter().zip(&series.values).enumerate() {
                    if value <= 0.0 {
                        continue;
                    }
                    let sweep = value / total * TAU;
                    let color = Self::series_color(i);

                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(Self::slice_points(start, sweep)))
                            .fill_color(color)
                            .stroke(egui::Stroke::new(1.0, Color32::WHITE))
                            .name(format!("{} ({})", label, format_number(value))),
                    );

                    let mid = start + sweep / 2.0;
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                            RichText::new(format!("{:.1}%", value / total * 100.0))
                                .color(Color32::WHITE)
                                .strong(),
                        ),
                    );
                    start += sweep;
                }
            });
    }

    /// Outline of a unit-circle slice starting at `start` radians.
    fn slice_points(start: f64, sweep: f64) -> Vec<[f64; 2]> {
        let steps = ((sweep / TAU) * 96.0).ceil().max(2.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push([0.0, 0.0]);
        for step in 0..=steps {
            let angle = start + sweep * step as f64 / steps as f64;
            points.push([angle.cos(), angle.sin()]);
        }
        points
    }

    /// Small table of group totals under a chart.
    pub fn draw_totals_table(ui: &mut egui::Ui, id: &str, key_title: &str, series: &ChartSeries) {
        if series.is_empty() {
            return;
        }
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("totals_{}", id)))
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new(key_title).strong().size(11.0));
                        ui.label(RichText::new("Total Fatalities").strong().size(11.0));
                        ui.end_row();

                        for (label, value) in series.labels.iter().zip(&series.values) {
                            ui.label(RichText::new(label).size(11.0));
                            ui.label(RichText::new(format_number(*value)).size(11.0));
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_formats_year_keys() {
        let series = ChartSeries::from_years(&[
            GroupTotal::new(2001.0, 2996.0),
            GroupTotal::new(1985.0, 520.0),
        ]);
        assert_eq!(series.labels, vec!["2001", "1985"]);
        assert_eq!(series.total(), 3516.0);
    }

    #[test]
    fn slice_closes_at_center() {
        let points = ChartPlotter::slice_points(0.0, TAU / 4.0);
        assert_eq!(points[0], [0.0, 0.0]);
        let last = points[points.len() - 1];
        assert!(last[0].abs() < 1e-9);
        assert!((last[1] - 1.0).abs() < 1e-9);
    }
}
