use crate::charts::{BarChartData, SDG_DARK, SDG_RED};
use crate::data::{AreaType, Field, Indicator, IndicatorTable};
use crate::stats::{female_share, Aggregator, MetricError, MetricExtractor, MetricResult};

#[derive(Debug, Clone, PartialEq)]
pub struct OutOfSchoolPage {
    pub total: MetricResult<f64>,
    pub boys: MetricResult<f64>,
    pub girls: MetricResult<f64>,
    /// Girls as a percentage of all out-of-school children. Zero when the total is zero.
    pub girls_share: MetricResult<f64>,
    /// Boys/girls stacked per region (Total rows).
    pub distribution_chart: MetricResult<BarChartData>,
    /// Urban vs rural totals per region, zero-filled where a split is missing.
    pub urban_rural_chart: MetricResult<BarChartData>,
    /// Sub-region totals used to shade the boundary map.
    pub region_totals: Vec<(String, f64)>,
}

impl OutOfSchoolPage {
    pub fn build(table: &IndicatorTable, district: &str) -> Self {
        let indicator = Indicator::OutOfSchool;
        let scalar = |field: Field| {
            MetricExtractor::select_scalar(table, &indicator, district, AreaType::Total, field)
        };

        let total = scalar(Field::Total);
        let girls = scalar(Field::Female);
        let girls_share = match (&girls, &total) {
            (Ok(g), Ok(t)) => match female_share(*g, *t) {
                Err(MetricError::DivisionUndefined(_)) => Ok(0.0),
                other => other,
            },
            (Err(e), _) | (_, Err(e)) => Err(e.clone()),
        };

        let region_totals = MetricExtractor::select_subtable(
            table,
            &indicator,
            Some(district),
            Some(&[AreaType::Total]),
        )
        .iter()
        .map(|r| (r.region.clone(), r.total))
        .collect();

        Self {
            boys: scalar(Field::Male),
            total,
            girls,
            girls_share,
            distribution_chart: Self::distribution_chart(table),
            urban_rural_chart: Self::urban_rural_chart(table),
            region_totals,
        }
    }

    fn distribution_chart(table: &IndicatorTable) -> MetricResult<BarChartData> {
        let rows = MetricExtractor::select_subtable(
            table,
            &Indicator::OutOfSchool,
            None,
            Some(&[AreaType::Total]),
        );
        if rows.is_empty() {
            return Err(MetricError::NotFound(format!(
                "{} / any region / Total",
                Indicator::OutOfSchool
            )));
        }

        Ok(BarChartData::new(
            "out_of_school_distribution",
            "Out-of-School Children Distribution",
            "Region",
            "Number of Children",
        )
        .stacked()
        .horizontal()
        .with_categories(rows.iter().map(|r| r.region.clone()).collect())
        .with_series("Boys", rows.iter().map(|r| r.male).collect(), SDG_DARK)
        .with_series("Girls", rows.iter().map(|r| r.female).collect(), SDG_RED))
    }

    fn urban_rural_chart(table: &IndicatorTable) -> MetricResult<BarChartData> {
        let split = MetricExtractor::select_subtable(
            table,
            &Indicator::OutOfSchool,
            None,
            Some(&AreaType::SPLIT),
        );
        if split.is_empty() {
            return Err(MetricError::NotFound(format!(
                "{} / any region / Urban or Rural",
                Indicator::OutOfSchool
            )));
        }

        let regions = split.regions_in_order();
        let matrix = Aggregator::complete_region_area_matrix(&split, &regions, &AreaType::SPLIT)?;

        Ok(BarChartData::new(
            "out_of_school_urban_rural",
            "Urban vs Rural Out-of-School Children",
            "Region",
            "Number of Children",
        )
        .with_categories(regions)
        .with_series(
            "Urban",
            matrix.area(AreaType::Urban).map(|r| r.total).collect(),
            SDG_RED,
        )
        .with_series(
            "Rural",
            matrix.area(AreaType::Rural).map(|r| r.total).collect(),
            SDG_DARK,
        ))
    }

    pub fn failures(&self) -> Vec<(&'static str, String)> {
        let mut failures: Vec<(&'static str, String)> = [
            ("total", &self.total),
            ("boys", &self.boys),
            ("girls", &self.girls),
            ("girls_share", &self.girls_share),
        ]
        .into_iter()
        .filter_map(|(name, result)| result.as_ref().err().map(|e| (name, e.to_string())))
        .collect();

        for (name, chart) in [
            ("distribution_chart", &self.distribution_chart),
            ("urban_rural_chart", &self.urban_rural_chart),
        ] {
            if let Err(e) = chart {
                failures.push((name, e.to_string()));
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{record, sample_table};

    const DISTRICT: &str = "Faisalabad District";

    #[test]
    fn test_out_of_school_page() {
        let page = OutOfSchoolPage::build(&sample_table(), DISTRICT);
        assert_eq!(page.total, Ok(472_000.0));
        assert_eq!(page.boys, Ok(221_000.0));
        assert_eq!(page.girls, Ok(251_000.0));
        assert!((page.girls_share.clone().unwrap() - 53.177966).abs() < 1e-5);

        let distribution = page.distribution_chart.unwrap();
        assert_eq!(
            distribution.categories,
            vec![DISTRICT, "Jaranwala", "Samundri"]
        );
        assert_eq!(distribution.max_extent(), 472_000.0);

        // Samundri has no Urban row in the source; it is zero-filled.
        let urban_rural = page.urban_rural_chart.unwrap();
        assert_eq!(urban_rural.categories, vec![DISTRICT, "Jaranwala", "Samundri"]);
        assert_eq!(urban_rural.series[0].values, vec![180_000.0, 20_000.0, 0.0]);
        assert_eq!(urban_rural.series[1].values, vec![292_000.0, 70_000.0, 45_000.0]);

        assert_eq!(
            page.region_totals,
            vec![("Jaranwala".to_string(), 90_000.0), ("Samundri".to_string(), 45_000.0)]
        );
    }

    #[test]
    fn test_zero_total_share_resolves_to_zero() {
        let table = IndicatorTable::new(vec![record(
            Indicator::OutOfSchool,
            DISTRICT,
            AreaType::Total,
            0.0,
            0.0,
            0.0,
        )]);
        let page = OutOfSchoolPage::build(&table, DISTRICT);
        assert_eq!(page.girls_share, Ok(0.0));
        assert!(page.urban_rural_chart.is_err());
        assert!(page.distribution_chart.is_ok());
    }
}
