//! GUI module - Navigation panel and page views

mod app;
mod control_panel;
mod page_viewer;

pub use app::DashboardApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use page_viewer::{PageViewer, ViewerAction};
