//! Dataset Loader Module
//! Reads the census indicator CSV with Polars and caches it for the process lifetime.

use crate::data::record::{AreaType, Indicator, IndicatorRecord, IndicatorTable};
use once_cell::sync::OnceCell;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Columns every indicator dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Indicator", "Region", "AreaType", "Total", "Male", "Female"];

/// Every variant means the dataset is unavailable; no partial table is produced.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data unavailable: {} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("Data unavailable: failed to read CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Data unavailable: missing required column '{0}'")]
    MissingColumn(String),
    #[error("Data unavailable: row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

/// Reads indicator CSV files into typed tables.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load and validate a CSV file using Polars.
    pub fn load_csv(path: &Path) -> Result<IndicatorTable, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::Missing(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        Self::from_dataframe(&df)
    }

    /// Convert a loaded DataFrame into fixed-schema records.
    pub fn from_dataframe(df: &DataFrame) -> Result<IndicatorTable, LoaderError> {
        for name in REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }

        let indicators = Self::string_column(df, "Indicator")?;
        let regions = Self::string_column(df, "Region")?;
        let area_types = Self::string_column(df, "AreaType")?;
        let totals = Self::numeric_column(df, "Total")?;
        let males = Self::numeric_column(df, "Male")?;
        let females = Self::numeric_column(df, "Female")?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            // Row numbers are 1-based data rows, header excluded.
            let row = i + 1;
            let missing = |column: &str| LoaderError::InvalidRow {
                row,
                reason: format!("empty or unparsable '{}'", column),
            };

            let indicator = indicators[i].as_deref().ok_or_else(|| missing("Indicator"))?;
            let region = regions[i].clone().ok_or_else(|| missing("Region"))?;
            let area_type = area_types[i]
                .as_deref()
                .ok_or_else(|| missing("AreaType"))?
                .parse::<AreaType>()
                .map_err(|e| LoaderError::InvalidRow {
                    row,
                    reason: e.to_string(),
                })?;

            records.push(IndicatorRecord {
                indicator: Indicator::from_label(indicator),
                region,
                area_type,
                total: totals[i].ok_or_else(|| missing("Total"))?,
                male: males[i].ok_or_else(|| missing("Male"))?,
                female: females[i].ok_or_else(|| missing("Female"))?,
            });
        }

        Ok(IndicatorTable::new(records))
    }

    fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let series = df
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        let values = series
            .str()?
            .into_iter()
            .map(|v| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
            .collect();
        Ok(values)
    }

    /// Numeric columns may arrive as text with thousands separators ("1,234").
    fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
        let series = df.column(name)?.as_materialized_series();

        if series.dtype() == &DataType::String {
            let values = series
                .str()?
                .into_iter()
                .map(|v| v.and_then(|s| s.trim().replace(',', "").parse::<f64>().ok()))
                .collect();
            return Ok(values);
        }

        let cast = series.cast(&DataType::Float64)?;
        let values = cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }
}

static GLOBAL_STORE: OnceCell<DataStore> = OnceCell::new();

/// Populate-once data-access service.
///
/// The first successful `table()` call reads the CSV; every later call returns
/// the same frozen `Arc`. Concurrent first calls converge on a single read.
/// A failed read leaves the store empty so the next call retries.
pub struct DataStore {
    path: PathBuf,
    table: OnceCell<Arc<IndicatorTable>>,
    loads: AtomicUsize,
}

impl DataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Install the process-wide store. Later calls keep the first path.
    pub fn install(path: impl Into<PathBuf>) -> &'static DataStore {
        GLOBAL_STORE.get_or_init(|| DataStore::new(path))
    }

    pub fn global() -> Option<&'static DataStore> {
        GLOBAL_STORE.get()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the cached table, reading it on first access.
    pub fn table(&self) -> Result<Arc<IndicatorTable>, LoaderError> {
        self.table
            .get_or_try_init(|| {
                self.loads.fetch_add(1, Ordering::SeqCst);
                info!(path = %self.path.display(), "Loading indicator dataset");

                match DatasetLoader::load_csv(&self.path) {
                    Ok(table) => {
                        info!(rows = table.len(), "Indicator dataset loaded");
                        Ok(Arc::new(table))
                    }
                    Err(e) => {
                        error!(error = %e, "Indicator dataset failed to load");
                        Err(e)
                    }
                }
            })
            .cloned()
    }

    /// Number of times the backing file has been read.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }
}
