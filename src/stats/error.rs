use crate::data::{AreaType, Indicator};
use std::fmt;
use thiserror::Error;

/// Selection descriptor: which row a scalar metric is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricQuery {
    pub indicator: Indicator,
    pub region: String,
    pub area_type: AreaType,
}

impl MetricQuery {
    pub fn new(indicator: Indicator, region: impl Into<String>, area_type: AreaType) -> Self {
        Self {
            indicator,
            region: region.into(),
            area_type,
        }
    }
}

impl fmt::Display for MetricQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.indicator, self.region, self.area_type)
    }
}

/// Failure of a single derived metric. Local to the card or chart that needs it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("no row matches {0}")]
    NotFound(String),
    #[error("{count} rows match {query}, expected exactly one")]
    Ambiguous { query: String, count: usize },
    #[error("division by zero computing {0}")]
    DivisionUndefined(String),
}

pub type MetricResult<T> = Result<T, MetricError>;
