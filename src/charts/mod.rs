//! Charts module - Chart series, on-screen plotting and PNG export

mod data;
mod plotter;
mod renderer;

pub use data::{BarChartData, BarLayout, Orientation, SDG_BLUE, SDG_DARK, SDG_PINK, SDG_RED};
pub use plotter::{to_color32, ChartPlotter};
pub use renderer::{RenderError, StaticChartRenderer};
