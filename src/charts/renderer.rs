//! Static Chart Renderer
//! Renders a dashboard bar chart to a PNG file with plotters.
//!
//! Layout:
//! 1. Title centered at the top
//! 2. Bars (grouped or stacked, vertical or horizontal) with a value axis
//! 3. Category labels drawn along the category axis
//! 4. Series legend in the upper right

use crate::charts::{BarChartData, BarLayout, Orientation};
use crate::stats::format_compact_number;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

const FONT: &str = "sans-serif";
const CATEGORY_AREA: u32 = 200;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to render for chart '{0}'")]
    EmptyChart(String),
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// One rectangle of a bar chart in category-slot coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSegment {
    pub series: usize,
    pub category: usize,
    /// Center of the bar along the category axis (slot `i` is centered on `i`).
    pub center: f64,
    pub width: f64,
    pub start: f64,
    pub end: f64,
}

/// Lay out every bar of a chart. Stacked series sit on the running sum of the
/// series before them; grouped series share each slot side by side.
pub fn bar_segments(chart: &BarChartData) -> Vec<BarSegment> {
    let n_series = chart.series.len().max(1);
    let mut stack_base = vec![0.0; chart.categories.len()];
    let mut segments = Vec::new();

    for (s, series) in chart.series.iter().enumerate() {
        for (i, &value) in series.values.iter().enumerate().take(chart.categories.len()) {
            let segment = match chart.layout {
                BarLayout::Stacked => {
                    let start = stack_base[i];
                    stack_base[i] += value;
                    BarSegment {
                        series: s,
                        category: i,
                        center: i as f64,
                        width: 0.8,
                        start,
                        end: start + value,
                    }
                }
                BarLayout::Grouped => {
                    let width = 0.8 / n_series as f64;
                    BarSegment {
                        series: s,
                        category: i,
                        center: i as f64 + (s as f64 - (n_series as f64 - 1.0) / 2.0) * width,
                        width,
                        start: 0.0,
                        end: value,
                    }
                }
            };
            segments.push(segment);
        }
    }
    segments
}

fn rgb(color: [u8; 3]) -> RGBColor {
    RGBColor(color[0], color[1], color[2])
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart to a PNG at `path`.
    pub fn render_png(
        chart: &BarChartData,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if chart.is_empty() {
            return Err(RenderError::EmptyChart(chart.id.clone()));
        }

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        match chart.orientation {
            Orientation::Vertical => Self::draw_vertical(&root, chart)?,
            Orientation::Horizontal => Self::draw_horizontal(&root, chart)?,
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn format_value(chart: &BarChartData, value: f64) -> String {
        if chart.percent {
            format!("{:.0}%", value)
        } else {
            format_compact_number(value)
        }
    }

    fn draw_vertical(
        root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
        chart: &BarChartData,
    ) -> Result<(), RenderError> {
        let n = chart.categories.len() as f64;
        let max = (chart.max_extent() * 1.1).max(1.0);
        let value_fmt = |v: &f64| Self::format_value(chart, *v);
        let blank = |_: &f64| String::new();

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, (FONT, 26))
            .margin(20)
            .x_label_area_size(CATEGORY_AREA)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..(n - 0.5), 0f64..max)
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&blank)
            .y_label_formatter(&value_fmt)
            .y_desc(chart.value_label.as_str())
            .draw()
            .map_err(draw_err)?;

        let segments = bar_segments(chart);
        for (s, series) in chart.series.iter().enumerate() {
            let color = rgb(series.color);
            ctx.draw_series(segments.iter().filter(|seg| seg.series == s).map(|seg| {
                Rectangle::new(
                    [
                        (seg.center - seg.width / 2.0, seg.start),
                        (seg.center + seg.width / 2.0, seg.end),
                    ],
                    color.filled(),
                )
            }))
            .map_err(draw_err)?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;

        let label_style = (FONT, 14)
            .into_font()
            .color(&BLACK)
            .transform(FontTransform::Rotate90)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (i, category) in chart.categories.iter().enumerate() {
            let (x, y) = ctx.backend_coord(&(i as f64, 0.0));
            root.draw_text(category, &label_style, (x, y + 10))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_horizontal(
        root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
        chart: &BarChartData,
    ) -> Result<(), RenderError> {
        let n_categories = chart.categories.len();
        let n = n_categories as f64;
        let max = (chart.max_extent() * 1.1).max(1.0);
        let value_fmt = |v: &f64| Self::format_value(chart, *v);
        let blank = |_: &f64| String::new();
        // First category on top.
        let slot = |category: usize| n_categories.saturating_sub(category + 1) as f64;

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, (FONT, 26))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(CATEGORY_AREA)
            .build_cartesian_2d(0f64..max, -0.5f64..(n - 0.5))
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .disable_y_mesh()
            .y_label_formatter(&blank)
            .x_label_formatter(&value_fmt)
            .x_desc(chart.value_label.as_str())
            .draw()
            .map_err(draw_err)?;

        let segments = bar_segments(chart);
        for (s, series) in chart.series.iter().enumerate() {
            let color = rgb(series.color);
            ctx.draw_series(segments.iter().filter(|seg| seg.series == s).map(|seg| {
                let center = slot(seg.category);
                Rectangle::new(
                    [
                        (seg.start, center - seg.width / 2.0),
                        (seg.end, center + seg.width / 2.0),
                    ],
                    color.filled(),
                )
            }))
            .map_err(draw_err)?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;

        let label_style = (FONT, 14)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        for (i, category) in chart.categories.iter().enumerate() {
            let (x, y) = ctx.backend_coord(&(0.0, slot(i)));
            root.draw_text(category, &label_style, (x - 10, y))
                .map_err(draw_err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{SDG_DARK, SDG_RED};

    fn chart() -> BarChartData {
        BarChartData::new("oosc", "Out of School", "Region", "Children")
            .with_categories(vec!["Jaranwala".into(), "Samundri".into()])
            .with_series("Boys", vec![41_000.0, 21_000.0], SDG_DARK)
            .with_series("Girls", vec![49_000.0, 24_000.0], SDG_RED)
    }

    #[test]
    fn test_grouped_segments_side_by_side() {
        let segments = bar_segments(&chart());
        assert_eq!(segments.len(), 4);
        let boys_0 = &segments[0];
        let girls_0 = &segments[2];
        assert!((boys_0.center - (-0.2)).abs() < 1e-9);
        assert!((girls_0.center - 0.2).abs() < 1e-9);
        assert_eq!((girls_0.start, girls_0.end), (0.0, 49_000.0));
        assert!((boys_0.width - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_stacked_segments_accumulate() {
        let segments = bar_segments(&chart().stacked());
        let girls_1 = segments
            .iter()
            .find(|s| s.series == 1 && s.category == 1)
            .unwrap();
        assert_eq!((girls_1.start, girls_1.end), (21_000.0, 45_000.0));
        assert_eq!(girls_1.center, 1.0);
    }

    #[test]
    fn test_empty_chart_not_rendered() {
        let empty = BarChartData::new("empty", "Empty", "", "");
        let dir = tempfile::tempdir().unwrap();
        let err =
            StaticChartRenderer::render_png(&empty, &dir.path().join("empty.png"), 400, 300)
                .unwrap_err();
        assert!(matches!(err, RenderError::EmptyChart(ref id) if id == "empty"));
        assert!(!dir.path().join("empty.png").exists());
    }
}
