//! Education Access Dashboard Main Application
//! Main window with navigation panel and page viewer.

use crate::charts::{BarChartData, StaticChartRenderer};
use crate::data::{load_boundaries, BoundaryLayer, DataStore};
use crate::gui::{ControlPanel, ControlPanelAction, PageViewer, ViewerAction};
use crate::pages::{Dashboard, PageId};
use crate::settings::Settings;
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use tracing::{error, info};

/// Loading result from background thread
enum LoadResult {
    Progress(f32, String),
    Complete {
        dashboard: Dashboard,
        boundaries: Option<BoundaryLayer>,
        rows: usize,
    },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    settings: Settings,
    store: &'static DataStore,
    control_panel: ControlPanel,
    page_viewer: PageViewer,

    // Async loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let store = DataStore::install(&settings.data_path);
        let mut app = Self {
            control_panel: ControlPanel::new(&store.path().display().to_string()),
            page_viewer: PageViewer::new(),
            settings,
            store,
            load_rx: None,
            is_loading: false,
        };
        app.start_loading();
        app
    }

    /// Build page models in a background thread. The table itself is read at most once.
    fn start_loading(&mut self) {
        if self.is_loading {
            return;
        }

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.refresh_enabled = false;
        let status = if self.store.is_loaded() {
            "Refreshing page metrics..."
        } else {
            "Loading dataset..."
        };
        self.control_panel.set_progress(5.0, status);

        let settings = self.settings.clone();
        let store = self.store;
        let fetch_boundaries = self.page_viewer.boundaries.is_none();

        thread::spawn(move || {
            Self::run_loading(tx, store, settings, fetch_boundaries);
        });
    }

    /// Load and build (called from background thread)
    fn run_loading(
        tx: Sender<LoadResult>,
        store: &'static DataStore,
        settings: Settings,
        fetch_boundaries: bool,
    ) {
        let _ = tx.send(LoadResult::Progress(10.0, "Reading indicator table...".to_string()));

        let table = match store.table() {
            Ok(table) => table,
            Err(e) => {
                let _ = tx.send(LoadResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(LoadResult::Progress(50.0, "Computing page metrics...".to_string()));
        let dashboard = Dashboard::build(&table, &settings.district_label);

        let boundaries = match (&settings.boundary_source, fetch_boundaries) {
            (Some(source), true) => {
                let _ = tx.send(LoadResult::Progress(80.0, "Loading map layer...".to_string()));
                load_boundaries(source, &settings.boundary_key, settings.boundary_timeout())
            }
            _ => None,
        };

        let _ = tx.send(LoadResult::Complete {
            dashboard,
            boundaries,
            rows: table.len(),
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    LoadResult::Complete {
                        dashboard,
                        boundaries,
                        rows,
                    } => {
                        let failed = dashboard.failures().len();
                        self.page_viewer.dashboard = Some(dashboard);
                        self.page_viewer.load_error = None;
                        if boundaries.is_some() {
                            self.page_viewer.boundaries = boundaries;
                        }
                        self.control_panel.boundary_status = match &self.page_viewer.boundaries {
                            Some(layer) => format!("Map layer: {} regions", layer.len()),
                            None => "No map layer".to_string(),
                        };

                        let status = if failed == 0 {
                            format!("Loaded {} rows", rows)
                        } else {
                            format!("Loaded {} rows, {} metrics unavailable", rows, failed)
                        };
                        self.control_panel.set_progress(100.0, &status);
                        self.control_panel.refresh_enabled = true;
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.page_viewer.dashboard = None;
                        self.page_viewer.load_error = Some(error.clone());
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.control_panel.refresh_enabled = true;
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Handle PNG export - ask for a path, render with plotters, then open the file
    fn handle_save_png(&mut self, chart: &BarChartData) {
        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(format!("{}.png", chart.id))
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match StaticChartRenderer::render_png(
            chart,
            &output_path,
            self.settings.export_width,
            self.settings.export_height,
        ) {
            Ok(()) => {
                info!(chart = %chart.id, path = %output_path.display(), "Chart exported");
                self.control_panel
                    .set_progress(100.0, &format!("Saved {}", output_path.display()));
                if let Err(e) = open::that(&output_path) {
                    error!(path = %output_path.display(), error = %e, "Could not open exported chart");
                }
            }
            Err(e) => {
                error!(chart = %chart.id, error = %e, "Chart export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Navigation
        SidePanel::left("control_panel")
            .min_width(240.0)
            .max_width(300.0)
            .show(ctx, |ui| match self.control_panel.show(ui) {
                ControlPanelAction::PageChanged(page) => {
                    info!(page = page.title(), "Page selected");
                }
                ControlPanelAction::Refresh => self.start_loading(),
                ControlPanelAction::None => {}
            });

        // Central panel - Page Viewer
        let page: PageId = self.control_panel.page;
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| self.page_viewer.show(ui, page))
            .inner;

        match action {
            ViewerAction::Navigate(target) => self.control_panel.page = target,
            ViewerAction::SavePng(chart) => self.handle_save_png(&chart),
            ViewerAction::None => {}
        }
    }
}
