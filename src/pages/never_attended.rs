use crate::charts::{BarChartData, SDG_PINK, SDG_RED};
use crate::data::{AreaType, Field, Indicator, IndicatorTable};
use crate::stats::{Aggregator, MetricError, MetricExtractor, MetricResult, PercentageRow};

#[derive(Debug, Clone, PartialEq)]
pub struct NeverAttendedPage {
    pub indicator: Indicator,
    pub total: MetricResult<f64>,
    pub male: MetricResult<f64>,
    pub female: MetricResult<f64>,
    /// Sum of sub-region Rural rows; the district aggregate is not added in.
    pub rural_population: MetricResult<f64>,
    /// Urban/Rural rows per sub-region with their within-region share.
    pub rows: MetricResult<Vec<PercentageRow>>,
    pub percentage_chart: MetricResult<BarChartData>,
}

impl NeverAttendedPage {
    pub fn build(table: &IndicatorTable, district: &str, indicator: Indicator) -> Self {
        let scalar = |field: Field| {
            MetricExtractor::select_scalar(table, &indicator, district, AreaType::Total, field)
        };

        let rows = Self::percentage_rows(table, district, &indicator);
        let percentage_chart = rows
            .as_ref()
            .map_err(Clone::clone)
            .map(|rows| Self::percentage_chart(rows));

        Self {
            total: scalar(Field::Total),
            male: scalar(Field::Male),
            female: scalar(Field::Female),
            rural_population: MetricExtractor::sum_field(
                table,
                &indicator,
                AreaType::Rural,
                Field::Total,
                Some(district),
            ),
            rows,
            percentage_chart,
            indicator,
        }
    }

    fn percentage_rows(
        table: &IndicatorTable,
        district: &str,
        indicator: &Indicator,
    ) -> MetricResult<Vec<PercentageRow>> {
        let split =
            MetricExtractor::select_subtable(table, indicator, Some(district), Some(&AreaType::SPLIT));
        if split.is_empty() {
            return Err(MetricError::NotFound(format!(
                "{} / sub-regions / Urban or Rural",
                indicator
            )));
        }

        let matrix = Aggregator::complete_region_area_matrix(
            &split,
            &split.regions_in_order(),
            &AreaType::SPLIT,
        )?;
        Ok(Aggregator::within_region_percentage(&matrix))
    }

    fn percentage_chart(rows: &[PercentageRow]) -> BarChartData {
        let share = |area_type: AreaType| -> Vec<f64> {
            rows.iter()
                .filter(|r| r.row.area_type == area_type)
                .map(|r| r.percentage)
                .collect()
        };
        let regions = rows
            .iter()
            .filter(|r| r.row.area_type == AreaType::Urban)
            .map(|r| r.row.region.clone())
            .collect();

        BarChartData::new(
            "never_attended_percentage",
            "Percentage Distribution of Population Never Attended School by Region",
            "Region",
            "Percentage of Population (%)",
        )
        .percent()
        .with_categories(regions)
        .with_series("Urban", share(AreaType::Urban), SDG_RED)
        .with_series("Rural", share(AreaType::Rural), SDG_PINK)
    }

    pub fn failures(&self) -> Vec<(&'static str, String)> {
        let mut failures: Vec<(&'static str, String)> = [
            ("total", &self.total),
            ("male", &self.male),
            ("female", &self.female),
            ("rural_population", &self.rural_population),
        ]
        .into_iter()
        .filter_map(|(name, result)| result.as_ref().err().map(|e| (name, e.to_string())))
        .collect();

        if let Err(e) = &self.rows {
            failures.push(("rows", e.to_string()));
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_table;

    const DISTRICT: &str = "Faisalabad District";

    #[test]
    fn test_never_attended_all() {
        let page = NeverAttendedPage::build(&sample_table(), DISTRICT, Indicator::NeverToSchoolAll);
        assert_eq!(page.total, Ok(2_500_000.0));
        assert_eq!(page.male, Ok(1_000_000.0));
        assert_eq!(page.female, Ok(1_500_000.0));
        assert_eq!(page.rural_population, Ok(70.0));

        let rows = page.rows.unwrap();
        let summary: Vec<(&str, AreaType, f64, bool)> = rows
            .iter()
            .map(|r| (r.row.region.as_str(), r.row.area_type, r.percentage, r.row.synthesized))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Jaranwala", AreaType::Urban, 30.0, false),
                ("Jaranwala", AreaType::Rural, 70.0, false),
                ("Samundri", AreaType::Urban, 0.0, true),
                ("Samundri", AreaType::Rural, 0.0, false),
            ]
        );

        let chart = page.percentage_chart.unwrap();
        assert_eq!(chart.categories, vec!["Jaranwala", "Samundri"]);
        assert_eq!(chart.series[0].values, vec![30.0, 0.0]);
        assert_eq!(chart.series[1].values, vec![70.0, 0.0]);
    }

    #[test]
    fn test_children_indicator_without_split_rows() {
        let page =
            NeverAttendedPage::build(&sample_table(), DISTRICT, Indicator::NeverToSchoolChildren);
        assert_eq!(page.total, Ok(300_000.0));
        assert!(matches!(page.rows, Err(MetricError::NotFound(_))));
        assert!(page.percentage_chart.is_err());
        assert!(matches!(page.rural_population, Err(MetricError::NotFound(_))));
        assert_eq!(page.failures().len(), 2);
    }
}
