//! Metric Extractor Module
//! Filters the indicator table down to scalar metrics and chart sub-tables.

use crate::data::{AreaType, Field, Indicator, IndicatorRecord, IndicatorTable};
use crate::stats::{MetricError, MetricQuery, MetricResult};

/// Outcome of resolving a query that should match exactly one row.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<'a> {
    One(&'a IndicatorRecord),
    None,
    Many(Vec<&'a IndicatorRecord>),
}

impl<'a> Selection<'a> {
    /// Turn the selection into the single row, or the matching error.
    pub fn exactly_one(self, query: &MetricQuery) -> MetricResult<&'a IndicatorRecord> {
        match self {
            Selection::One(record) => Ok(record),
            Selection::None => Err(MetricError::NotFound(query.to_string())),
            Selection::Many(rows) => Err(MetricError::Ambiguous {
                query: query.to_string(),
                count: rows.len(),
            }),
        }
    }
}

/// Filter/selection operations over an indicator table.
pub struct MetricExtractor;

impl MetricExtractor {
    /// Resolve a query against the table without picking silently.
    pub fn select<'a>(table: &'a IndicatorTable, query: &MetricQuery) -> Selection<'a> {
        let mut matches: Vec<&IndicatorRecord> = table
            .iter()
            .filter(|r| {
                r.indicator == query.indicator
                    && r.region == query.region
                    && r.area_type == query.area_type
            })
            .collect();

        match matches.len() {
            0 => Selection::None,
            1 => Selection::One(matches.remove(0)),
            _ => Selection::Many(matches),
        }
    }

    /// Read one field of the unique row matching (indicator, region, area type).
    pub fn select_scalar(
        table: &IndicatorTable,
        indicator: &Indicator,
        region: &str,
        area_type: AreaType,
        field: Field,
    ) -> MetricResult<f64> {
        let query = MetricQuery::new(indicator.clone(), region, area_type);
        Self::select(table, &query)
            .exactly_one(&query)
            .map(|record| record.get(field))
    }

    /// All rows of an indicator, optionally excluding one region and
    /// restricting area types. Source row order is preserved.
    pub fn select_subtable(
        table: &IndicatorTable,
        indicator: &Indicator,
        region_exclude: Option<&str>,
        area_types_in: Option<&[AreaType]>,
    ) -> IndicatorTable {
        table
            .iter()
            .filter(|r| &r.indicator == indicator)
            .filter(|r| region_exclude.map_or(true, |excluded| r.region != excluded))
            .filter(|r| area_types_in.map_or(true, |types| types.contains(&r.area_type)))
            .cloned()
            .collect()
    }

    /// Smallest value of `field` across every row of an indicator and area type.
    pub fn min_field(
        table: &IndicatorTable,
        indicator: &Indicator,
        area_type: AreaType,
        field: Field,
    ) -> MetricResult<f64> {
        table
            .iter()
            .filter(|r| &r.indicator == indicator && r.area_type == area_type)
            .map(|r| r.get(field))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.min(v))))
            .ok_or_else(|| {
                MetricError::NotFound(format!("{} / any region / {}", indicator, area_type))
            })
    }

    /// Sum of `field` across rows of an indicator and area type.
    pub fn sum_field(
        table: &IndicatorTable,
        indicator: &Indicator,
        area_type: AreaType,
        field: Field,
        region_exclude: Option<&str>,
    ) -> MetricResult<f64> {
        let values: Vec<f64> = Self::select_subtable(table, indicator, region_exclude, Some(&[area_type]))
            .iter()
            .map(|r| r.get(field))
            .collect();

        if values.is_empty() {
            return Err(MetricError::NotFound(format!(
                "{} / any region / {}",
                indicator, area_type
            )));
        }
        Ok(values.iter().sum())
    }
}
