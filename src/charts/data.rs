//! Chart-ready series shared by the interactive plots and the PNG export.

use serde::Serialize;

/// SDG 4 palette.
pub const SDG_RED: [u8; 3] = [229, 36, 59];
pub const SDG_DARK: [u8; 3] = [46, 46, 46];
pub const SDG_PINK: [u8; 3] = [252, 228, 228];
pub const SDG_BLUE: [u8; 3] = [52, 152, 219];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarLayout {
    Grouped,
    Stacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// One named series; `values[i]` belongs to `categories[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
    pub color: [u8; 3],
}

/// A categorical bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartData {
    pub id: String,
    pub title: String,
    pub category_label: String,
    pub value_label: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
    pub layout: BarLayout,
    pub orientation: Orientation,
    /// Values are percentages (axis and labels get a `%`).
    pub percent: bool,
}

impl BarChartData {
    pub fn new(id: &str, title: &str, category_label: &str, value_label: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            category_label: category_label.to_string(),
            value_label: value_label.to_string(),
            categories: Vec::new(),
            series: Vec::new(),
            layout: BarLayout::Grouped,
            orientation: Orientation::Vertical,
            percent: false,
        }
    }

    pub fn stacked(mut self) -> Self {
        self.layout = BarLayout::Stacked;
        self
    }

    pub fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }

    pub fn percent(mut self) -> Self {
        self.percent = true;
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_series(mut self, name: &str, values: Vec<f64>, color: [u8; 3]) -> Self {
        self.series.push(BarSeries {
            name: name.to_string(),
            values,
            color,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() || self.series.is_empty()
    }

    /// Largest bar extent: the tallest stack for stacked charts, else the tallest bar.
    pub fn max_extent(&self) -> f64 {
        let extent = match self.layout {
            BarLayout::Stacked => (0..self.categories.len())
                .map(|i| {
                    self.series
                        .iter()
                        .map(|s| s.values.get(i).copied().unwrap_or(0.0))
                        .sum::<f64>()
                })
                .fold(0.0, f64::max),
            BarLayout::Grouped => self
                .series
                .iter()
                .flat_map(|s| s.values.iter().copied())
                .fold(0.0, f64::max),
        };
        extent.max(0.0)
    }
}
