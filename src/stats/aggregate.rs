//! Aggregation Module
//! Completes region x area-type matrices and derives within-region percentages.

use crate::data::{AreaType, IndicatorRecord, IndicatorTable};
use crate::stats::derived::round1;
use crate::stats::{MetricError, MetricResult};
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};
use std::collections::HashMap;

/// One (region, area type) cell of a completed matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedRow {
    pub region: String,
    pub area_type: AreaType,
    pub total: f64,
    pub male: f64,
    pub female: f64,
    /// True when the source had no row and this one was zero-filled.
    pub synthesized: bool,
}

impl CompletedRow {
    fn from_record(record: &IndicatorRecord) -> Self {
        Self {
            region: record.region.clone(),
            area_type: record.area_type,
            total: record.total,
            male: record.male,
            female: record.female,
            synthesized: false,
        }
    }

    fn zero(region: &str, area_type: AreaType) -> Self {
        Self {
            region: region.to_string(),
            area_type,
            total: 0.0,
            male: 0.0,
            female: 0.0,
            synthesized: true,
        }
    }
}

/// Every region of a surveyed set with exactly one row per required area type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompletedRegionTable {
    pub rows: Vec<CompletedRow>,
}

impl CompletedRegionTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of one area type, in region order.
    pub fn area(&self, area_type: AreaType) -> impl Iterator<Item = &CompletedRow> {
        self.rows.iter().filter(move |r| r.area_type == area_type)
    }
}

/// A completed row with its share of the region's total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentageRow {
    pub row: CompletedRow,
    pub percentage: f64,
}

/// Descriptive statistics of one value per region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalSpread {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub lowest_region: String,
    pub highest_region: String,
}

/// Table-to-table transforms for chart preparation.
pub struct Aggregator;

impl Aggregator {
    /// Build a `|regions| x |area_types|` matrix from an indicator sub-table,
    /// zero-filling absent combinations. Order: regions as supplied, then
    /// area types as supplied.
    pub fn complete_region_area_matrix(
        subtable: &IndicatorTable,
        regions: &[String],
        area_types: &[AreaType],
    ) -> MetricResult<CompletedRegionTable> {
        let mut rows = Vec::with_capacity(regions.len() * area_types.len());

        for region in regions {
            for &area_type in area_types {
                let matches: Vec<&IndicatorRecord> = subtable
                    .iter()
                    .filter(|r| &r.region == region && r.area_type == area_type)
                    .collect();

                match matches.as_slice() {
                    [] => rows.push(CompletedRow::zero(region, area_type)),
                    [record] => rows.push(CompletedRow::from_record(record)),
                    many => {
                        return Err(MetricError::Ambiguous {
                            query: format!("{} / {}", region, area_type),
                            count: many.len(),
                        })
                    }
                }
            }
        }

        Ok(CompletedRegionTable { rows })
    }

    /// Share of each row's Total within its region, rounded to one decimal.
    /// A region whose totals sum to zero gets 0.0 for every row.
    pub fn within_region_percentage(table: &CompletedRegionTable) -> Vec<PercentageRow> {
        let mut sums: HashMap<&str, f64> = HashMap::new();
        for row in &table.rows {
            *sums.entry(row.region.as_str()).or_insert(0.0) += row.total;
        }

        table
            .rows
            .iter()
            .map(|row| {
                let sum = sums.get(row.region.as_str()).copied().unwrap_or(0.0);
                let percentage = if sum == 0.0 {
                    0.0
                } else {
                    round1(row.total / sum * 100.0)
                };
                PercentageRow {
                    row: row.clone(),
                    percentage,
                }
            })
            .collect()
    }

    /// Min/max/mean/median of one value per region.
    pub fn regional_spread(values: &[(String, f64)]) -> MetricResult<RegionalSpread> {
        if values.is_empty() {
            return Err(MetricError::NotFound("regional values".to_string()));
        }

        let numbers: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
        let min = Statistics::min(numbers.iter());
        let max = Statistics::max(numbers.iter());
        let mean = Statistics::mean(numbers.iter());
        let median = Data::new(numbers.clone()).median();

        let region_of = |target: f64| {
            values
                .iter()
                .find(|(_, v)| *v == target)
                .map(|(r, _)| r.clone())
                .unwrap_or_default()
        };

        Ok(RegionalSpread {
            count: values.len(),
            min,
            max,
            mean,
            median,
            lowest_region: region_of(min),
            highest_region: region_of(max),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{record, Indicator};
    use proptest::prelude::*;

    fn regions(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_complete_matrix_zero_fills() {
        let subtable = IndicatorTable::new(vec![
            record(Indicator::NeverToSchoolAll, "A", AreaType::Urban, 10.0, 4.0, 6.0),
            record(Indicator::NeverToSchoolAll, "A", AreaType::Rural, 30.0, 10.0, 20.0),
            record(Indicator::NeverToSchoolAll, "B", AreaType::Urban, 5.0, 2.0, 3.0),
        ]);

        let matrix = Aggregator::complete_region_area_matrix(
            &subtable,
            &regions(&["A", "B"]),
            &[AreaType::Urban, AreaType::Rural],
        )
        .unwrap();

        assert_eq!(matrix.len(), 4);
        let b_rural = &matrix.rows[3];
        assert_eq!(b_rural.region, "B");
        assert_eq!(b_rural.area_type, AreaType::Rural);
        assert_eq!((b_rural.total, b_rural.male, b_rural.female), (0.0, 0.0, 0.0));
        assert!(b_rural.synthesized);
        assert!(!matrix.rows[0].synthesized);

        let urban: Vec<&str> = matrix.area(AreaType::Urban).map(|r| r.region.as_str()).collect();
        assert_eq!(urban, vec!["A", "B"]);
    }

    #[test]
    fn test_complete_matrix_rejects_duplicates() {
        let subtable = IndicatorTable::new(vec![
            record(Indicator::OutOfSchool, "A", AreaType::Urban, 1.0, 1.0, 0.0),
            record(Indicator::OutOfSchool, "A", AreaType::Urban, 2.0, 1.0, 1.0),
        ]);
        let err = Aggregator::complete_region_area_matrix(
            &subtable,
            &regions(&["A"]),
            &AreaType::SPLIT,
        )
        .unwrap_err();
        assert!(matches!(err, MetricError::Ambiguous { count: 2, .. }));
    }

    #[test]
    fn test_within_region_percentage() {
        let subtable = IndicatorTable::new(vec![
            record(Indicator::NeverToSchoolAll, "X", AreaType::Urban, 30.0, 10.0, 20.0),
            record(Indicator::NeverToSchoolAll, "X", AreaType::Rural, 70.0, 30.0, 40.0),
        ]);
        let matrix =
            Aggregator::complete_region_area_matrix(&subtable, &regions(&["X"]), &AreaType::SPLIT)
                .unwrap();
        let rows = Aggregator::within_region_percentage(&matrix);
        assert_eq!(rows[0].percentage, 30.0);
        assert_eq!(rows[1].percentage, 70.0);
    }

    #[test]
    fn test_zero_region_sum_yields_zero_percentages() {
        let matrix = Aggregator::complete_region_area_matrix(
            &IndicatorTable::default(),
            &regions(&["Empty"]),
            &AreaType::SPLIT,
        )
        .unwrap();
        let rows = Aggregator::within_region_percentage(&matrix);
        assert!(rows.iter().all(|r| r.percentage == 0.0 && !r.percentage.is_nan()));
    }

    #[test]
    fn test_regional_spread() {
        let values = vec![
            ("Jaranwala".to_string(), 53.8),
            ("Samundri".to_string(), 55.7),
            ("Tandlianwala".to_string(), 50.1),
            ("Chak Jhumra".to_string(), 58.0),
        ];
        let spread = Aggregator::regional_spread(&values).unwrap();
        assert_eq!(spread.count, 4);
        assert_eq!(spread.min, 50.1);
        assert_eq!(spread.max, 58.0);
        assert_eq!(spread.lowest_region, "Tandlianwala");
        assert_eq!(spread.highest_region, "Chak Jhumra");
        assert!((spread.median - 54.75).abs() < 1e-9);
        assert!((spread.mean - 54.4).abs() < 1e-9);

        assert!(Aggregator::regional_spread(&[]).is_err());
    }

    proptest! {
        #[test]
        fn prop_matrix_has_every_combination(
            present in proptest::collection::vec((0usize..5, any::<bool>(), 0u32..100_000), 0..10)
        ) {
            let names: Vec<String> = (0..5).map(|i| format!("R{i}")).collect();
            let mut seen = std::collections::HashSet::new();
            let records: Vec<_> = present
                .into_iter()
                .filter(|(i, urban, _)| seen.insert((*i, *urban)))
                .map(|(i, urban, total)| {
                    let area = if urban { AreaType::Urban } else { AreaType::Rural };
                    record(Indicator::OutOfSchool, &names[i], area, total as f64, 0.0, 0.0)
                })
                .collect();

            let matrix = Aggregator::complete_region_area_matrix(
                &IndicatorTable::new(records),
                &names,
                &AreaType::SPLIT,
            ).unwrap();

            prop_assert_eq!(matrix.len(), names.len() * 2);
            for (i, row) in matrix.rows.iter().enumerate() {
                prop_assert_eq!(&row.region, &names[i / 2]);
                prop_assert_eq!(row.area_type, AreaType::SPLIT[i % 2]);
            }
        }

        #[test]
        fn prop_region_percentages_sum_to_hundred(urban in 0u32..1_000_000, rural in 0u32..1_000_000) {
            let subtable = IndicatorTable::new(vec![
                record(Indicator::NeverToSchoolAll, "X", AreaType::Urban, urban as f64, 0.0, 0.0),
                record(Indicator::NeverToSchoolAll, "X", AreaType::Rural, rural as f64, 0.0, 0.0),
            ]);
            let matrix = Aggregator::complete_region_area_matrix(
                &subtable,
                &["X".to_string()],
                &AreaType::SPLIT,
            ).unwrap();
            let sum: f64 = Aggregator::within_region_percentage(&matrix)
                .iter()
                .map(|r| r.percentage)
                .sum();

            if urban + rural == 0 {
                prop_assert_eq!(sum, 0.0);
            } else {
                prop_assert!((sum - 100.0).abs() <= 0.1 + 1e-9);
            }
        }
    }
}
