//! Stats module - metric extraction and aggregation over the indicator table

mod aggregate;
mod derived;
mod error;
mod extractor;

pub use aggregate::{Aggregator, PercentageRow, RegionalSpread};
pub use derived::{
    female_share, format_compact_number, format_grouped, gender_gap_in_literacy, literacy_gap,
};
pub use error::{MetricError, MetricQuery, MetricResult};
pub use extractor::MetricExtractor;
