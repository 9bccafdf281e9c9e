//! Static Chart Renderer
//! Renders the five dashboard charts to PNG files with plotters.
//!
//! Charts render in parallel; each one is independent of the others.

use super::plotter::{ChartSeries, Orientation, NO_DATA_MESSAGE};
use crate::stats::DashboardSummary;
use plotters::coord::ranged1d::SegmentValue;
use plotters::element::Pie;
use plotters::prelude::*;
use rayon::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const FONT: &str = "sans-serif";

const PALETTE: [RGBColor; 12] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
    RGBColor(174, 199, 232),
    RGBColor(255, 187, 120),
];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create export directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to render {chart}: {message}")]
    Draw { chart: &'static str, message: String },
}

/// The five dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    TopYears,
    TopCountries,
    Monthly,
    TopManufacturers,
    Decades,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::TopYears,
        ChartKind::TopCountries,
        ChartKind::Monthly,
        ChartKind::TopManufacturers,
        ChartKind::Decades,
    ];

    /// Chart heading; top-N charts name the configured group count.
    pub fn title(self, top_n: usize) -> String {
        match self {
            ChartKind::TopYears => format!("Top {} Years With Highest Fatalities", top_n),
            ChartKind::TopCountries => format!("Top {} Countries by Fatalities", top_n),
            ChartKind::Monthly => "Monthly Distribution of Fatalities".to_string(),
            ChartKind::TopManufacturers => {
                format!("Top {} Aircraft Manufacturers by Fatalities", top_n)
            }
            ChartKind::Decades => "Air Crashes by Decade/Period".to_string(),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::TopYears => "top_years.png",
            ChartKind::TopCountries => "top_countries.png",
            ChartKind::Monthly => "monthly_distribution.png",
            ChartKind::TopManufacturers => "top_manufacturers.png",
            ChartKind::Decades => "decade_distribution.png",
        }
    }

    /// Title of the category axis.
    pub fn category_title(self) -> &'static str {
        match self {
            ChartKind::TopYears => "Year",
            ChartKind::TopCountries => "Country/Region",
            ChartKind::Monthly => "Month",
            ChartKind::TopManufacturers => "Aircraft Manufacturer",
            ChartKind::Decades => "Decade/Period",
        }
    }

    pub fn orientation(self) -> Orientation {
        match self {
            ChartKind::TopYears | ChartKind::TopManufacturers => Orientation::Horizontal,
            _ => Orientation::Vertical,
        }
    }

    pub fn series(self, summary: &DashboardSummary) -> ChartSeries {
        match self {
            ChartKind::TopYears => ChartSeries::from_years(&summary.top_years),
            ChartKind::TopCountries => ChartSeries::from_groups(&summary.top_countries),
            ChartKind::Monthly => ChartSeries::from_groups(&summary.monthly),
            ChartKind::TopManufacturers => ChartSeries::from_groups(&summary.top_manufacturers),
            ChartKind::Decades => ChartSeries::from_groups(&summary.decades),
        }
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every chart into `dir`, creating it if needed.
    ///
    /// Returns the written file paths in [`ChartKind::ALL`] order.
    pub fn export_all(
        summary: &DashboardSummary,
        dir: &Path,
        size: (u32, u32),
        top_n: usize,
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir).map_err(|source| RenderError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let paths = ChartKind::ALL
            .par_iter()
            .map(|&kind| {
                let path = dir.join(kind.file_name());
                Self::render_chart(kind, summary, &path, size, top_n).map_err(|e| {
                    RenderError::Draw {
                        chart: kind.file_name(),
                        message: e.to_string(),
                    }
                })?;
                debug!(chart = kind.file_name(), path = %path.display(), "rendered chart");
                Ok(path)
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        info!(count = paths.len(), dir = %dir.display(), "exported charts");
        Ok(paths)
    }

    /// Render one chart to a PNG file.
    pub fn render_chart(
        kind: ChartKind,
        summary: &DashboardSummary,
        path: &Path,
        size: (u32, u32),
        top_n: usize,
    ) -> Result<(), Box<dyn Error>> {
        let series = kind.series(summary);
        let title = kind.title(top_n);
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        if series.is_empty() {
            Self::draw_message(&root, &title, NO_DATA_MESSAGE)?;
        } else if kind == ChartKind::TopCountries {
            Self::draw_pie(&root, &title, &series)?;
        } else {
            Self::draw_bars(&root, kind, &title, &series)?;
        }

        root.present()?;
        Ok(())
    }

    fn draw_message(
        root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        title: &str,
        message: &str,
    ) -> Result<(), Box<dyn Error>> {
        let area = root.titled(title, (FONT, 28))?;
        let (w, h) = area.dim_in_pixel();
        area.draw(&Text::new(
            message.to_string(),
            (w as i32 / 10, h as i32 / 2),
            (FONT, 22).into_font().color(&BLACK.mix(0.6)),
        ))?;
        Ok(())
    }

    fn draw_pie(
        root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        title: &str,
        series: &ChartSeries,
    ) -> Result<(), Box<dyn Error>> {
        if series.total() <= 0.0 {
            return Self::draw_message(root, title, "No fatalities recorded for these groups.");
        }

        let area = root.titled(title, (FONT, 28))?;
        let (w, h) = area.dim_in_pixel();
        let center = ((w / 2) as i32, (h / 2) as i32);
        let radius = f64::from(w.min(h)) * 0.35;
        let colors: Vec<RGBColor> = (0..series.values.len())
            .map(|i| PALETTE[i % PALETTE.len()])
            .collect();

        let mut pie = Pie::new(&center, &radius, &series.values, &colors, &series.labels);
        pie.label_style((FONT, 18).into_font());
        pie.percentages((FONT, 16).into_font().color(&WHITE));
        area.draw(&pie)?;
        Ok(())
    }

    fn draw_bars(
        root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        kind: ChartKind,
        title: &str,
        series: &ChartSeries,
    ) -> Result<(), Box<dyn Error>> {
        let n = series.labels.len();
        let max = series.values.iter().copied().fold(0.0_f64, f64::max).max(1.0) * 1.1;
        let labels = &series.labels;
        let label_of = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        };
        let bar_style = |v: &SegmentValue<usize>, _: &f64| {
            let idx = match v {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => *i,
                SegmentValue::Last => 0,
            };
            PALETTE[idx % PALETTE.len()].filled()
        };

        match kind.orientation() {
            Orientation::Vertical => {
                let mut chart = ChartBuilder::on(root)
                    .caption(title, (FONT, 28))
                    .margin(20)
                    .x_label_area_size(60)
                    .y_label_area_size(70)
                    .build_cartesian_2d((0..n).into_segmented(), 0.0..max)?;

                chart
                    .configure_mesh()
                    .disable_x_mesh()
                    .x_labels(n)
                    .x_label_formatter(&label_of)
                    .x_desc(kind.category_title())
                    .y_desc("Total Fatalities")
                    .draw()?;

                chart.draw_series(
                    Histogram::vertical(&chart)
                        .style_func(bar_style)
                        .margin(8)
                        .data(series.values.iter().enumerate().map(|(i, &v)| (i, v))),
                )?;
            }
            Orientation::Horizontal => {
                // Largest total on top
                let mut chart = ChartBuilder::on(root)
                    .caption(title, (FONT, 28))
                    .margin(20)
                    .x_label_area_size(50)
                    .y_label_area_size(200)
                    .build_cartesian_2d(0.0..max, (0..n).into_segmented())?;

                let flipped = |v: &SegmentValue<usize>| match v {
                    SegmentValue::CenterOf(i) | SegmentValue::Exact(i) if *i < n => {
                        label_of(&SegmentValue::CenterOf(n - 1 - *i))
                    }
                    _ => String::new(),
                };

                chart
                    .configure_mesh()
                    .disable_y_mesh()
                    .y_labels(n)
                    .y_label_formatter(&flipped)
                    .x_desc("Total Fatalities")
                    .y_desc(kind.category_title())
                    .draw()?;

                chart.draw_series(
                    Histogram::horizontal(&chart)
                        .style_func(move |v: &SegmentValue<usize>, x: &f64| {
                            let original = match v {
                                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) if *i < n => {
                                    SegmentValue::Exact(n - 1 - *i)
                                }
                                _ => SegmentValue::Last,
                            };
                            bar_style(&original, x)
                        })
                        .margin(8)
                        .data(
                            series
                                .values
                                .iter()
                                .enumerate()
                                .map(|(i, &v)| (n - 1 - i, v)),
                        ),
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_chart_has_a_distinct_file() {
        let mut names: Vec<_> = ChartKind::ALL.iter().map(|k| k.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ChartKind::ALL.len());
    }

    #[test]
    fn titles_name_the_configured_group_count() {
        assert_eq!(
            ChartKind::TopYears.title(3),
            "Top 3 Years With Highest Fatalities"
        );
        assert_eq!(
            ChartKind::TopManufacturers.title(5),
            "Top 5 Aircraft Manufacturers by Fatalities"
        );
        assert_eq!(ChartKind::Monthly.title(3), "Monthly Distribution of Fatalities");
    }

    #[test]
    fn empty_summary_exports_every_chart() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("charts");
        let paths =
            StaticChartRenderer::export_all(&DashboardSummary::default(), &out, (400, 300), 5)
                .unwrap();

        assert_eq!(paths.len(), ChartKind::ALL.len());
        for (path, kind) in paths.iter().zip(ChartKind::ALL) {
            assert_eq!(path, &out.join(kind.file_name()));
            assert!(path.is_file());
        }
    }

    #[test]
    fn top_n_charts_are_horizontal() {
        assert_eq!(ChartKind::TopYears.orientation(), Orientation::Horizontal);
        assert_eq!(
            ChartKind::TopManufacturers.orientation(),
            Orientation::Horizontal
        );
        assert_eq!(ChartKind::Decades.orientation(), Orientation::Vertical);
    }

    #[test]
    fn series_follow_summary_order() {
        let summary = DashboardSummary {
            monthly: vec![
                crate::stats::GroupTotal::new("March".to_string(), 5.0),
                crate::stats::GroupTotal::new("October".to_string(), 7.0),
            ],
            ..Default::default()
        };
        let series = ChartKind::Monthly.series(&summary);
        assert_eq!(series.labels, vec!["March", "October"]);
        assert!(ChartKind::TopYears.series(&summary).is_empty());
    }
}
