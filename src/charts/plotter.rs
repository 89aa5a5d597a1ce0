//! Chart Plotter Module
//! Draws bar charts and the region map with egui_plot.

use crate::charts::{BarChartData, BarLayout, Orientation, SDG_PINK, SDG_RED};
use crate::data::BoundaryLayer;
use crate::stats::format_compact_number;
use egui::{Color32, Stroke};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Polygon};

/// Share of a category slot filled by its bars.
const GROUP_WIDTH: f64 = 0.8;

pub fn to_color32(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Linear blend between two palette colors, `t` in 0..=1.
pub fn blend(from: [u8; 3], to: [u8; 3], t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Color32::from_rgb(mix(from[0], to[0]), mix(from[1], to[1]), mix(from[2], to[2]))
}

/// Label for the category at an axis position; empty between categories.
fn category_label(categories: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    categories.get(rounded as usize).cloned().unwrap_or_default()
}

/// Creates interactive dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw a grouped or stacked bar chart, vertical or horizontal.
    pub fn draw_bar_chart(ui: &mut egui::Ui, chart: &BarChartData, height: f32) {
        let n_series = chart.series.len().max(1);
        let horizontal = chart.orientation == Orientation::Horizontal;
        let stacked = chart.layout == BarLayout::Stacked;
        let bar_width = if stacked {
            GROUP_WIDTH
        } else {
            GROUP_WIDTH / n_series as f64
        };

        // Horizontal charts list the first category at the top.
        let n_categories = chart.categories.len();
        let position = move |i: usize| {
            if horizontal {
                n_categories.saturating_sub(i + 1) as f64
            } else {
                i as f64
            }
        };

        let axis_categories: Vec<String> = if horizontal {
            chart.categories.iter().rev().cloned().collect()
        } else {
            chart.categories.clone()
        };
        let percent = chart.percent;
        let value_formatter = move |mark: egui_plot::GridMark, _range: &std::ops::RangeInclusive<f64>| {
            if percent {
                format!("{:.0}%", mark.value)
            } else {
                format_compact_number(mark.value)
            }
        };
        let category_formatter =
            move |mark: egui_plot::GridMark, _range: &std::ops::RangeInclusive<f64>| {
                category_label(&axis_categories, mark.value)
            };

        let mut plot = Plot::new(format!("bar_{}", chart.id))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_drag(false);

        plot = if horizontal {
            plot.x_axis_label(chart.value_label.clone())
                .y_axis_label(chart.category_label.clone())
                .x_axis_formatter(value_formatter)
                .y_axis_formatter(category_formatter)
        } else {
            plot.x_axis_label(chart.category_label.clone())
                .y_axis_label(chart.value_label.clone())
                .x_axis_formatter(category_formatter)
                .y_axis_formatter(value_formatter)
        };

        plot.show(ui, |plot_ui| {
            let mut charts: Vec<BarChart> = Vec::new();

            for (s, series) in chart.series.iter().enumerate() {
                let offset = if stacked {
                    0.0
                } else {
                    (s as f64 - (n_series as f64 - 1.0) / 2.0) * bar_width
                };

                let bars: Vec<Bar> = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &value)| {
                        let label = chart.categories.get(i).cloned().unwrap_or_default();
                        Bar::new(position(i) + offset, value)
                            .width(bar_width)
                            .name(label)
                    })
                    .collect();

                let mut bar_chart = BarChart::new(bars)
                    .name(&series.name)
                    .color(to_color32(series.color));
                if horizontal {
                    bar_chart = bar_chart.horizontal();
                }
                if stacked {
                    let below: Vec<&BarChart> = charts.iter().collect();
                    bar_chart = bar_chart.stack_on(&below);
                }
                charts.push(bar_chart);
            }

            for bar_chart in charts {
                plot_ui.bar_chart(bar_chart);
            }
        });
    }

    /// Draw region outlines shaded by value, light for low and SDG red for high.
    pub fn draw_region_map(
        ui: &mut egui::Ui,
        id: &str,
        layer: &BoundaryLayer,
        values: &[(String, f64)],
        height: f32,
    ) {
        let max = values.iter().map(|(_, v)| *v).fold(0.0, f64::max);

        Plot::new(format!("map_{}", id))
            .height(height)
            .data_aspect(1.0)
            .show_axes([false, false])
            .show_grid(false)
            .legend(Legend::default())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (region, shape) in layer.regions() {
                    let value = values
                        .iter()
                        .find(|(name, _)| name == region)
                        .map(|(_, v)| *v);
                    let fill = match value {
                        Some(v) if max > 0.0 => blend(SDG_PINK, SDG_RED, v / max),
                        _ => Color32::from_gray(220),
                    };
                    let name = match value {
                        Some(v) => format!("{}: {}", region, format_compact_number(v)),
                        None => format!("{}: no data", region),
                    };

                    for ring in &shape.rings {
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::new(ring.clone()))
                                .fill_color(fill)
                                .stroke(Stroke::new(1.0, Color32::DARK_GRAY))
                                .name(&name),
                        );
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_only_on_slots() {
        let categories = vec!["Jaranwala".to_string(), "Samundri".to_string()];
        assert_eq!(category_label(&categories, 0.0), "Jaranwala");
        assert_eq!(category_label(&categories, 1.0), "Samundri");
        assert_eq!(category_label(&categories, 0.5), "");
        assert_eq!(category_label(&categories, 2.0), "");
        assert_eq!(category_label(&categories, -1.0), "");
    }

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(blend(SDG_PINK, SDG_RED, 0.0), to_color32(SDG_PINK));
        assert_eq!(blend(SDG_PINK, SDG_RED, 1.0), to_color32(SDG_RED));
        assert_eq!(blend(SDG_PINK, SDG_RED, 7.0), to_color32(SDG_RED));
    }
}
