//! Page Viewer Widget
//! Central scrollable panel that renders the selected dashboard page.
//! Cards and charts whose metric failed show a "Data unavailable" placeholder.

use crate::charts::{to_color32, BarChartData, ChartPlotter, SDG_BLUE, SDG_PINK, SDG_RED};
use crate::data::{BoundaryLayer, Indicator};
use crate::pages::{
    Dashboard, LiteracyPage, NeverAttendedPage, OutOfSchoolPage, OverviewPage, PageId,
};
use crate::stats::{format_compact_number, format_grouped, MetricResult, PercentageRow};
use egui::{Color32, ComboBox, RichText, ScrollArea};
use tracing::warn;

const CARD_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 380.0;
const MAP_HEIGHT: f32 = 420.0;
const UNAVAILABLE: &str = "Data unavailable";

/// Actions triggered from a page
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    None,
    Navigate(PageId),
    SavePng(BarChartData),
}

/// Renders page models. Holds no metrics of its own beyond the last built dashboard.
pub struct PageViewer {
    pub dashboard: Option<Dashboard>,
    pub boundaries: Option<BoundaryLayer>,
    /// Indicator shown on the never-attended page.
    pub never_attended: Indicator,
    pub load_error: Option<String>,
}

impl Default for PageViewer {
    fn default() -> Self {
        Self {
            dashboard: None,
            boundaries: None,
            never_attended: Indicator::NeverToSchoolAll,
            load_error: None,
        }
    }
}

fn count_text(value: &MetricResult<f64>) -> Result<String, String> {
    value
        .as_ref()
        .map(|v| format_compact_number(*v))
        .map_err(|e| e.to_string())
}

fn percent_text(value: &MetricResult<f64>) -> Result<String, String> {
    value
        .as_ref()
        .map(|v| format!("{:.1}%", v))
        .map_err(|e| e.to_string())
}

impl PageViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the selected page
    pub fn show(&mut self, ui: &mut egui::Ui, page: PageId) -> ViewerAction {
        if let Some(error) = &self.load_error {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!("⚠ {}", error))
                        .size(18.0)
                        .color(to_color32(SDG_RED)),
                );
            });
            return ViewerAction::None;
        }

        let Some(dashboard) = self.dashboard.as_ref() else {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() / 3.0);
                ui.spinner();
                ui.label(RichText::new("Loading dataset...").size(16.0));
            });
            return ViewerAction::None;
        };

        let mut action = ViewerAction::None;
        let boundaries = self.boundaries.as_ref();
        let never_attended = &mut self.never_attended;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match page {
                PageId::Overview => Self::draw_overview(ui, &dashboard.overview, &mut action),
                PageId::Literacy => Self::draw_literacy(ui, &dashboard.literacy, &mut action),
                PageId::OutOfSchool => Self::draw_out_of_school(
                    ui,
                    &dashboard.out_of_school,
                    boundaries,
                    &mut action,
                ),
                PageId::NeverAttended => {
                    let page = dashboard.never_attended(never_attended);
                    Self::draw_never_attended(ui, page, never_attended, &mut action)
                }
            });

        action
    }

    fn draw_overview(ui: &mut egui::Ui, page: &OverviewPage, action: &mut ViewerAction) {
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.label(
                RichText::new("📚 Education Access in Faisalabad")
                    .size(30.0)
                    .strong()
                    .color(to_color32(SDG_RED)),
            );
            ui.label(
                RichText::new("Exploring Educational Disparities and SDG 4 Progress")
                    .size(16.0)
                    .color(Color32::GRAY),
            );
            ui.add_space(6.0);
            egui::Frame::none()
                .fill(to_color32(SDG_RED))
                .rounding(12.0)
                .inner_margin(egui::Margin::symmetric(12.0, 4.0))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new("SDG 4: Quality Education • Census 2023")
                            .size(12.0)
                            .color(Color32::WHITE),
                    );
                });
            ui.add_space(10.0);
        });

        ui.columns(3, |cols| {
            Self::metric_card(
                &mut cols[0],
                "Out of school children",
                count_text(&page.out_of_school_total),
                "Ages 5-16 not in education",
            );
            Self::metric_card(
                &mut cols[1],
                "Lowest female literacy",
                percent_text(&page.lowest_female_literacy),
                "In rural areas",
            );
            Self::metric_card(
                &mut cols[2],
                "Never attended school",
                count_text(&page.never_attended_total),
                "Total population",
            );
        });

        ui.add_space(CARD_SPACING);
        ui.separator();
        ui.label(RichText::new("Key Insights").size(22.0).strong());
        ui.add_space(8.0);

        ui.columns(3, |cols| {
            Self::insight_card(
                &mut cols[0],
                "📚 Literacy Rates",
                "A significant gap exists between urban and rural literacy rates in \
                 Faisalabad, with urban areas showing consistently higher rates.",
                percent_text(&page.literacy_gap).map(|gap| format!("{} urban-rural gap", gap)),
                PageId::Literacy,
                action,
            );
            Self::insight_card(
                &mut cols[1],
                "🚫 Out of School Children",
                "Children aged 5-16 who are currently not enrolled in any educational \
                 institution.",
                count_text(&page.out_of_school_total).map(|n| format!("{} children", n)),
                PageId::OutOfSchool,
                action,
            );
            Self::insight_card(
                &mut cols[2],
                "❌ Never Attended School",
                "Population that has never had access to formal education, highlighting \
                 systemic barriers.",
                count_text(&page.never_attended_total).map(|n| format!("{} people", n)),
                PageId::NeverAttended,
                action,
            );
        });
    }

    fn draw_literacy(ui: &mut egui::Ui, page: &LiteracyPage, action: &mut ViewerAction) {
        Self::page_header(
            ui,
            "📚 Literacy Rates",
            "Urban and rural literacy across Faisalabad District by gender",
        );

        ui.columns(3, |cols| {
            Self::metric_card(
                &mut cols[0],
                "Urban literacy",
                percent_text(&page.urban_literacy),
                "District urban areas",
            );
            Self::metric_card(
                &mut cols[1],
                "Rural literacy",
                percent_text(&page.rural_literacy),
                "District rural areas",
            );
            Self::metric_card(
                &mut cols[2],
                "Gender gap",
                percent_text(&page.gender_gap),
                "Male minus female literacy",
            );
        });
        ui.add_space(CARD_SPACING);

        Self::chart_card(ui, &page.gender_chart, action);

        ui.label(
            RichText::new("Rural Female Literacy Across Tehsils")
                .size(16.0)
                .strong(),
        );
        ui.add_space(8.0);
        match &page.rural_female_spread {
            Ok(spread) => {
                ui.columns(4, |cols| {
                    Self::metric_card(
                        &mut cols[0],
                        "Lowest",
                        Ok(format!("{:.1}%", spread.min)),
                        &spread.lowest_region,
                    );
                    Self::metric_card(
                        &mut cols[1],
                        "Highest",
                        Ok(format!("{:.1}%", spread.max)),
                        &spread.highest_region,
                    );
                    Self::metric_card(
                        &mut cols[2],
                        "Mean",
                        Ok(format!("{:.1}%", spread.mean)),
                        &format!("{} tehsils", spread.count),
                    );
                    Self::metric_card(
                        &mut cols[3],
                        "Median",
                        Ok(format!("{:.1}%", spread.median)),
                        "",
                    );
                });
            }
            Err(e) => Self::metric_card(ui, "Regional spread", Err(e.to_string()), ""),
        }
    }

    fn draw_out_of_school(
        ui: &mut egui::Ui,
        page: &OutOfSchoolPage,
        boundaries: Option<&BoundaryLayer>,
        action: &mut ViewerAction,
    ) {
        Self::page_header(
            ui,
            "🚫 Out of School Children",
            "Children aged 5-16 not enrolled in any educational institution",
        );

        ui.columns(4, |cols| {
            Self::metric_card(&mut cols[0], "Total", count_text(&page.total), "Ages 5-16");
            Self::metric_card(&mut cols[1], "Boys", count_text(&page.boys), "Out of school");
            Self::metric_card(&mut cols[2], "Girls", count_text(&page.girls), "Out of school");
            Self::metric_card(
                &mut cols[3],
                "Girls' share",
                percent_text(&page.girls_share),
                "Of all out-of-school children",
            );
        });
        ui.add_space(CARD_SPACING);

        Self::chart_card(ui, &page.distribution_chart, action);
        Self::chart_card(ui, &page.urban_rural_chart, action);

        if let Some(layer) = boundaries {
            Self::card_frame(ui, |ui| {
                ui.label(
                    RichText::new("Out-of-School Children by Tehsil")
                        .size(16.0)
                        .strong(),
                );
                ui.add_space(8.0);
                ChartPlotter::draw_region_map(
                    ui,
                    "out_of_school",
                    layer,
                    &page.region_totals,
                    MAP_HEIGHT,
                );

                let unmapped: Vec<&str> = page
                    .region_totals
                    .iter()
                    .filter(|(region, _)| layer.get(region).is_none())
                    .map(|(region, _)| region.as_str())
                    .collect();
                if !unmapped.is_empty() {
                    ui.label(
                        RichText::new(format!("No outline for: {}", unmapped.join(", ")))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }
            });
        }
    }

    fn draw_never_attended(
        ui: &mut egui::Ui,
        page: &NeverAttendedPage,
        selected: &mut Indicator,
        action: &mut ViewerAction,
    ) {
        Self::page_header(
            ui,
            "❌ Never Attended School",
            "Population that has never had access to formal education",
        );

        ui.horizontal(|ui| {
            ui.label("Indicator:");
            ComboBox::from_id_salt("never_attended_indicator")
                .width(220.0)
                .selected_text(selected.label())
                .show_ui(ui, |ui| {
                    for indicator in [Indicator::NeverToSchoolAll, Indicator::NeverToSchoolChildren] {
                        ui.selectable_value(selected, indicator.clone(), indicator.label());
                    }
                });
        });
        ui.add_space(8.0);

        ui.columns(4, |cols| {
            Self::metric_card(&mut cols[0], "Total", count_text(&page.total), page.indicator.label());
            Self::metric_card(&mut cols[1], "Male", count_text(&page.male), "District");
            Self::metric_card(&mut cols[2], "Female", count_text(&page.female), "District");
            Self::metric_card(
                &mut cols[3],
                "Rural population",
                count_text(&page.rural_population),
                "Sum over tehsils",
            );
        });
        ui.add_space(CARD_SPACING);

        Self::chart_card(ui, &page.percentage_chart, action);

        if let Ok(rows) = &page.rows {
            Self::card_frame(ui, |ui| {
                ui.label(RichText::new("Raw Data").size(16.0).strong());
                ui.add_space(8.0);
                Self::draw_rows_grid(ui, rows);
                if rows.iter().any(|r| r.row.synthesized) {
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new("Rows in italics are missing from the census table and shown as zero.")
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }
            });
        }
    }

    fn draw_rows_grid(ui: &mut egui::Ui, rows: &[PercentageRow]) {
        egui::Grid::new("never_attended_rows")
            .striped(true)
            .num_columns(6)
            .spacing([24.0, 6.0])
            .show(ui, |ui| {
                for header in ["Region", "AreaType", "Total", "Male", "Female", "Percentage"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for r in rows {
                    let cell = |text: String| {
                        if r.row.synthesized {
                            RichText::new(text).italics().color(Color32::GRAY)
                        } else {
                            RichText::new(text)
                        }
                    };
                    ui.label(cell(r.row.region.clone()));
                    ui.label(cell(r.row.area_type.to_string()));
                    ui.label(cell(format_grouped(r.row.total)));
                    ui.label(cell(format_grouped(r.row.male)));
                    ui.label(cell(format_grouped(r.row.female)));
                    ui.label(cell(format!("{:.1}%", r.percentage)));
                    ui.end_row();
                }
            });
    }

    fn page_header(ui: &mut egui::Ui, title: &str, subtitle: &str) {
        ui.add_space(10.0);
        ui.label(RichText::new(title).size(26.0).strong());
        ui.label(RichText::new(subtitle).size(13.0).color(Color32::GRAY));
        ui.add_space(8.0);
        ui.separator();
        ui.add_space(8.0);
    }

    fn card_frame(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, to_color32(SDG_PINK)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                add_contents(ui);
            });
        ui.add_space(CARD_SPACING);
    }

    fn metric_card(ui: &mut egui::Ui, label: &str, value: Result<String, String>, subtext: &str) {
        Self::card_frame(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(label.to_uppercase())
                        .size(12.0)
                        .color(Color32::GRAY),
                );
                match value {
                    Ok(text) => {
                        ui.label(
                            RichText::new(text)
                                .size(28.0)
                                .strong()
                                .color(to_color32(SDG_RED)),
                        );
                    }
                    Err(reason) => {
                        ui.label(RichText::new(UNAVAILABLE).size(18.0).color(Color32::GRAY))
                            .on_hover_text(reason);
                    }
                }
                ui.label(RichText::new(subtext).size(11.0).color(Color32::GRAY));
            });
        });
    }

    fn insight_card(
        ui: &mut egui::Ui,
        title: &str,
        text: &str,
        stat: Result<String, String>,
        target: PageId,
        action: &mut ViewerAction,
    ) {
        Self::card_frame(ui, |ui| {
            ui.label(RichText::new(title).size(16.0).strong());
            ui.add_space(4.0);
            ui.label(RichText::new(text).size(12.0));
            ui.add_space(6.0);
            match stat {
                Ok(stat) => ui.label(RichText::new(stat).size(15.0).strong().color(to_color32(SDG_RED))),
                Err(reason) => ui
                    .label(RichText::new(UNAVAILABLE).color(Color32::GRAY))
                    .on_hover_text(reason),
            };
            ui.add_space(6.0);
            if ui
                .link(RichText::new("View Detailed Analysis →").color(to_color32(SDG_BLUE)))
                .clicked()
            {
                *action = ViewerAction::Navigate(target);
            }
        });
    }

    fn chart_card(
        ui: &mut egui::Ui,
        chart: &MetricResult<BarChartData>,
        action: &mut ViewerAction,
    ) {
        Self::card_frame(ui, |ui| match chart {
            Ok(chart) => {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&chart.title).size(16.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("💾 Save PNG").clicked() {
                            *action = ViewerAction::SavePng(chart.clone());
                        }
                        if ui.button("📋 Copy JSON").clicked() {
                            match serde_json::to_string_pretty(chart) {
                                Ok(json) => ui.ctx().copy_text(json),
                                Err(e) => warn!(chart = %chart.id, error = %e, "Chart serialization failed"),
                            }
                        }
                    });
                });
                ui.add_space(8.0);
                ChartPlotter::draw_bar_chart(ui, chart, CHART_HEIGHT);
            }
            Err(e) => {
                ui.label(RichText::new(UNAVAILABLE).size(16.0).color(Color32::GRAY));
                ui.label(RichText::new(e.to_string()).size(11.0).color(Color32::GRAY));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MetricError;

    #[test]
    fn test_card_text_formats() {
        assert_eq!(count_text(&Ok(472_000.0)), Ok("472.0K".to_string()));
        assert_eq!(count_text(&Ok(2_500_000.0)), Ok("2.5M".to_string()));
        assert_eq!(percent_text(&Ok(53.84)), Ok("53.8%".to_string()));
    }

    #[test]
    fn test_card_text_carries_failure_reason() {
        let missing: MetricResult<f64> = Err(MetricError::NotFound("Literate % / X / Total".into()));
        let reason = percent_text(&missing).unwrap_err();
        assert!(reason.contains("Literate % / X / Total"));
    }

    #[test]
    fn test_viewer_starts_on_all_ages_indicator() {
        let viewer = PageViewer::new();
        assert_eq!(viewer.never_attended, Indicator::NeverToSchoolAll);
        assert!(viewer.dashboard.is_none());
    }
}
