use crate::data::{AreaType, Field, Indicator, IndicatorTable};
use crate::stats::{literacy_gap, MetricExtractor, MetricResult};

/// Headline numbers for the landing page.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewPage {
    /// District-wide out-of-school children (5-16).
    pub out_of_school_total: MetricResult<f64>,
    /// Lowest rural female literacy rate of any region row.
    pub lowest_female_literacy: MetricResult<f64>,
    /// District-wide population that never attended school.
    pub never_attended_total: MetricResult<f64>,
    /// District urban minus rural literacy rate.
    pub literacy_gap: MetricResult<f64>,
}

impl OverviewPage {
    pub fn build(table: &IndicatorTable, district: &str) -> Self {
        let district_scalar = |indicator: Indicator, area_type: AreaType| {
            MetricExtractor::select_scalar(table, &indicator, district, area_type, Field::Total)
        };

        let urban = district_scalar(Indicator::LiteratePercent, AreaType::Urban);
        let rural = district_scalar(Indicator::LiteratePercent, AreaType::Rural);

        Self {
            out_of_school_total: district_scalar(Indicator::OutOfSchool, AreaType::Total),
            lowest_female_literacy: MetricExtractor::min_field(
                table,
                &Indicator::LiteratePercent,
                AreaType::Rural,
                Field::Female,
            ),
            never_attended_total: district_scalar(Indicator::NeverToSchoolAll, AreaType::Total),
            literacy_gap: urban.and_then(|u| rural.map(|r| literacy_gap(u, r))),
        }
    }

    pub fn failures(&self) -> Vec<(&'static str, String)> {
        [
            ("out_of_school_total", &self.out_of_school_total),
            ("lowest_female_literacy", &self.lowest_female_literacy),
            ("never_attended_total", &self.never_attended_total),
            ("literacy_gap", &self.literacy_gap),
        ]
        .into_iter()
        .filter_map(|(name, result)| result.as_ref().err().map(|e| (name, e.to_string())))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_table;

    #[test]
    fn test_overview_metrics() {
        let page = OverviewPage::build(&sample_table(), "Faisalabad District");
        assert_eq!(page.out_of_school_total, Ok(472_000.0));
        assert_eq!(page.lowest_female_literacy, Ok(53.8));
        assert_eq!(page.never_attended_total, Ok(2_500_000.0));
        assert!((page.literacy_gap.clone().unwrap() - 14.5).abs() < 1e-9);
        assert!(page.failures().is_empty());
    }

    #[test]
    fn test_unknown_district_fails_only_district_metrics() {
        let page = OverviewPage::build(&sample_table(), "Lahore District");
        assert!(page.out_of_school_total.is_err());
        assert!(page.never_attended_total.is_err());
        assert!(page.literacy_gap.is_err());
        // Not tied to the district row.
        assert_eq!(page.lowest_female_literacy, Ok(53.8));
        assert_eq!(page.failures().len(), 3);
    }
}
