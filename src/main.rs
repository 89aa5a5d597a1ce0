//! Education Access Dashboard - Faisalabad District, Census 2023
//!
//! Literacy, out-of-school and never-attended indicators per tehsil,
//! computed from the census indicator table and shown in a native window.

mod charts;
mod data;
mod gui;
mod pages;
mod settings;
mod stats;

use anyhow::Context;
use eframe::egui;
use gui::DashboardApp;
use settings::Settings;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load().context("Failed to load dashboard settings")?;
    info!(data_path = %settings.data_path, district = %settings.district_label, "Starting dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Education Access in Faisalabad"),
        ..Default::default()
    };

    eframe::run_native(
        "Education Access Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Window failed: {}", e))
}
