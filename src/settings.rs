//! Settings loaded from defaults, an optional `dashboard.toml`, and `EDU_DASHBOARD_*` env vars.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_DISTRICT: &str = "Faisalabad District";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Indicator CSV.
    pub data_path: String,
    /// Region label of the district aggregate rows.
    pub district_label: String,
    /// GeoJSON file path or http(s) URL for the map overlay.
    pub boundary_source: Option<String>,
    /// Feature property holding the region name.
    pub boundary_key: String,
    pub boundary_timeout_secs: u64,
    pub export_width: u32,
    pub export_height: u32,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from("dashboard", "EDU_DASHBOARD")
    }

    /// `file_stem` is resolved like `config::File::with_name` (any supported extension).
    pub fn load_from(file_stem: &str, env_prefix: &str) -> anyhow::Result<Self> {
        let cfg = Config::builder()
            .set_default("data_path", "data_2023.csv")?
            .set_default("district_label", DEFAULT_DISTRICT)?
            .set_default("boundary_key", "name")?
            .set_default("boundary_timeout_secs", 5)?
            .set_default("export_width", 1400)?
            .set_default("export_height", 900)?
            .add_source(File::with_name(file_stem).required(false))
            .add_source(Environment::with_prefix(env_prefix))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn boundary_timeout(&self) -> Duration {
        Duration::from_secs(self.boundary_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings =
            Settings::load_from("/nonexistent/dashboard", "EDU_DASHBOARD_TEST_DEFAULTS").unwrap();
        assert_eq!(settings.data_path, "data_2023.csv");
        assert_eq!(settings.district_label, DEFAULT_DISTRICT);
        assert_eq!(settings.boundary_source, None);
        assert_eq!(settings.boundary_key, "name");
        assert_eq!(settings.boundary_timeout(), Duration::from_secs(5));
        assert_eq!((settings.export_width, settings.export_height), (1400, 900));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "data_path = \"census/indicators.csv\"\nboundary_source = \"tehsils.geojson\"\nboundary_timeout_secs = 2"
        )
        .unwrap();
        let stem = file.path().with_extension("");

        let settings =
            Settings::load_from(&stem.to_string_lossy(), "EDU_DASHBOARD_TEST_FILE").unwrap();
        assert_eq!(settings.data_path, "census/indicators.csv");
        assert_eq!(settings.boundary_source.as_deref(), Some("tehsils.geojson"));
        assert_eq!(settings.boundary_timeout_secs, 2);
        assert_eq!(settings.district_label, DEFAULT_DISTRICT);
    }
}
