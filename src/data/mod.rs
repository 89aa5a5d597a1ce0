//! Data module - dataset loading and the indicator record model

mod boundary;
mod loader;
mod record;

pub use boundary::{load_boundaries, BoundaryLayer};
pub use loader::DataStore;
pub use record::{AreaType, Field, Indicator, IndicatorRecord, IndicatorTable};

#[cfg(test)]
pub(crate) use loader::tests::{sample_table, write_csv, SAMPLE_CSV};
#[cfg(test)]
pub(crate) use record::tests::record;
