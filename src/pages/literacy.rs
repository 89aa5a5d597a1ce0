use crate::charts::{BarChartData, SDG_DARK, SDG_RED};
use crate::data::{AreaType, Field, Indicator, IndicatorTable};
use crate::stats::{
    gender_gap_in_literacy, Aggregator, MetricError, MetricExtractor, MetricResult, RegionalSpread,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LiteracyPage {
    pub urban_literacy: MetricResult<f64>,
    pub rural_literacy: MetricResult<f64>,
    /// District male minus female literacy rate (Total area).
    pub gender_gap: MetricResult<f64>,
    /// Male/Female literacy for every Urban and Rural row.
    pub gender_chart: MetricResult<BarChartData>,
    /// Rural female literacy across sub-regions.
    pub rural_female_spread: MetricResult<RegionalSpread>,
}

impl LiteracyPage {
    pub fn build(table: &IndicatorTable, district: &str) -> Self {
        let indicator = Indicator::LiteratePercent;
        let scalar = |area_type: AreaType, field: Field| {
            MetricExtractor::select_scalar(table, &indicator, district, area_type, field)
        };

        let male = scalar(AreaType::Total, Field::Male);
        let female = scalar(AreaType::Total, Field::Female);

        Self {
            urban_literacy: scalar(AreaType::Urban, Field::Total),
            rural_literacy: scalar(AreaType::Rural, Field::Total),
            gender_gap: male.and_then(|m| female.map(|f| gender_gap_in_literacy(m, f))),
            gender_chart: Self::gender_chart(table),
            rural_female_spread: Self::rural_female_spread(table, district),
        }
    }

    fn gender_chart(table: &IndicatorTable) -> MetricResult<BarChartData> {
        let rows = MetricExtractor::select_subtable(
            table,
            &Indicator::LiteratePercent,
            None,
            Some(&AreaType::SPLIT),
        );
        if rows.is_empty() {
            return Err(MetricError::NotFound(format!(
                "{} / any region / Urban or Rural",
                Indicator::LiteratePercent
            )));
        }

        let categories = rows
            .iter()
            .map(|r| format!("{} ({})", r.region, r.area_type))
            .collect();
        let male = rows.iter().map(|r| r.male).collect();
        let female = rows.iter().map(|r| r.female).collect();

        Ok(BarChartData::new(
            "literacy_by_gender",
            "Literacy Rates by Gender and Region",
            "Region",
            "Literacy Rate (%)",
        )
        .percent()
        .with_categories(categories)
        .with_series("Male", male, SDG_DARK)
        .with_series("Female", female, SDG_RED))
    }

    fn rural_female_spread(table: &IndicatorTable, district: &str) -> MetricResult<RegionalSpread> {
        let values: Vec<(String, f64)> = MetricExtractor::select_subtable(
            table,
            &Indicator::LiteratePercent,
            Some(district),
            Some(&[AreaType::Rural]),
        )
        .iter()
        .map(|r| (r.region.clone(), r.female))
        .collect();
        Aggregator::regional_spread(&values)
    }

    pub fn failures(&self) -> Vec<(&'static str, String)> {
        let mut failures = Vec::new();
        for (name, result) in [
            ("urban_literacy", &self.urban_literacy),
            ("rural_literacy", &self.rural_literacy),
            ("gender_gap", &self.gender_gap),
        ] {
            if let Err(e) = result {
                failures.push((name, e.to_string()));
            }
        }
        if let Err(e) = &self.gender_chart {
            failures.push(("gender_chart", e.to_string()));
        }
        if let Err(e) = &self.rural_female_spread {
            failures.push(("rural_female_spread", e.to_string()));
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_table;

    #[test]
    fn test_literacy_page() {
        let page = LiteracyPage::build(&sample_table(), "Faisalabad District");
        assert_eq!(page.urban_literacy, Ok(81.0));
        assert_eq!(page.rural_literacy, Ok(66.5));
        assert!((page.gender_gap.clone().unwrap() - 9.6).abs() < 1e-9);

        let chart = page.gender_chart.unwrap();
        assert_eq!(chart.categories.len(), 6);
        assert_eq!(chart.categories[0], "Faisalabad District (Urban)");
        assert_eq!(chart.series[0].name, "Male");
        assert_eq!(chart.series[1].values[3], 53.8);
        assert!(chart.percent);

        let spread = page.rural_female_spread.unwrap();
        assert_eq!(spread.count, 2);
        assert_eq!(spread.lowest_region, "Jaranwala");
    }
}
