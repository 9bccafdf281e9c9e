//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, ChartSeries, Orientation, NO_DATA_MESSAGE};
pub use renderer::{ChartKind, RenderError, StaticChartRenderer};
