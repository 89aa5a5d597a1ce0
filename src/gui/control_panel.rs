//! Control Panel Widget
//! Left side panel with page navigation and dataset status.

use crate::charts::{to_color32, SDG_RED};
use crate::pages::PageId;
use egui::{Color32, RichText};

/// Left side control panel with page navigation and data source status.
pub struct ControlPanel {
    pub page: PageId,
    pub data_path: String,
    pub boundary_status: String,
    pub progress: f32,
    pub status: String,
    pub refresh_enabled: bool,
}

impl ControlPanel {
    pub fn new(data_path: &str) -> Self {
        Self {
            page: PageId::Overview,
            data_path: data_path.to_string(),
            boundary_status: "No map layer".to_string(),
            progress: 0.0,
            status: "Ready".to_string(),
            refresh_enabled: false,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📚 Education Access")
                    .size(22.0)
                    .color(to_color32(SDG_RED)),
            );
            ui.label(
                RichText::new("Faisalabad • Census 2023")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Pages =====
        ui.label(RichText::new("🧭 Pages").size(14.0).strong());
        ui.add_space(5.0);

        for page in PageId::ALL {
            let selected = self.page == page;
            let button = egui::Button::new(RichText::new(page.title()).size(14.0))
                .selected(selected)
                .min_size(egui::vec2(ui.available_width(), 30.0));
            if ui.add(button).clicked() && !selected {
                self.page = page;
                action = ControlPanelAction::PageChanged(page);
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&self.data_path).size(12.0));
                ui.label(
                    RichText::new(&self.boundary_status)
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            });

        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.refresh_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🔄 Refresh").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Refresh;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") || self.status.contains("unavailable") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("Saved") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
            ui.add_space(5.0);
            ui.hyperlink_to(
                RichText::new("Pakistan Bureau of Statistics").size(10.0),
                "https://www.pbs.gov.pk/digital-census/detailed-results",
            );
            ui.label(RichText::new("Data source:").size(10.0).color(Color32::GRAY));
        });

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    PageChanged(PageId),
    Refresh,
}
