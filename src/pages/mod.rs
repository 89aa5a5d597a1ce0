//! Pages module - per-page metric models consumed by the GUI
//!
//! Each card or chart is its own `MetricResult`, so a bad indicator only blanks
//! the element that needs it.

mod literacy;
mod never_attended;
mod out_of_school;
mod overview;

pub use literacy::LiteracyPage;
pub use never_attended::NeverAttendedPage;
pub use out_of_school::OutOfSchoolPage;
pub use overview::OverviewPage;

use crate::data::{Indicator, IndicatorTable};
use tracing::{debug, warn};

/// Dashboard page identifiers, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageId {
    Overview,
    Literacy,
    OutOfSchool,
    NeverAttended,
}

impl PageId {
    pub const ALL: [PageId; 4] = [
        PageId::Overview,
        PageId::Literacy,
        PageId::OutOfSchool,
        PageId::NeverAttended,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PageId::Overview => "📚 Overview",
            PageId::Literacy => "📚 Literacy Rates",
            PageId::OutOfSchool => "🚫 Out of School",
            PageId::NeverAttended => "❌ Never Attended",
        }
    }
}

/// All page models computed from one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub district: String,
    pub overview: OverviewPage,
    pub literacy: LiteracyPage,
    pub out_of_school: OutOfSchoolPage,
    pub never_attended_all: NeverAttendedPage,
    pub never_attended_children: NeverAttendedPage,
}

impl Dashboard {
    /// Build every page. Pages only read the shared table, so they are built in parallel.
    pub fn build(table: &IndicatorTable, district: &str) -> Self {
        let ((overview, literacy), (out_of_school, (never_attended_all, never_attended_children))) =
            rayon::join(
                || {
                    rayon::join(
                        || OverviewPage::build(table, district),
                        || LiteracyPage::build(table, district),
                    )
                },
                || {
                    rayon::join(
                        || OutOfSchoolPage::build(table, district),
                        || {
                            rayon::join(
                                || {
                                    NeverAttendedPage::build(
                                        table,
                                        district,
                                        Indicator::NeverToSchoolAll,
                                    )
                                },
                                || {
                                    NeverAttendedPage::build(
                                        table,
                                        district,
                                        Indicator::NeverToSchoolChildren,
                                    )
                                },
                            )
                        },
                    )
                },
            );

        let dashboard = Self {
            district: district.to_string(),
            overview,
            literacy,
            out_of_school,
            never_attended_all,
            never_attended_children,
        };

        let failures = dashboard.failures();
        for (page, metric, error) in &failures {
            warn!(page, metric, error = %error, "Metric unavailable");
        }
        debug!(failed = failures.len(), "Dashboard pages built");

        dashboard
    }

    /// Never-attended page for the chosen indicator.
    pub fn never_attended(&self, indicator: &Indicator) -> &NeverAttendedPage {
        match indicator {
            Indicator::NeverToSchoolChildren => &self.never_attended_children,
            _ => &self.never_attended_all,
        }
    }

    /// Every failed metric as (page, metric, reason).
    pub fn failures(&self) -> Vec<(&'static str, &'static str, String)> {
        let pages = [
            ("overview", self.overview.failures()),
            ("literacy", self.literacy.failures()),
            ("out_of_school", self.out_of_school.failures()),
            ("never_attended_all", self.never_attended_all.failures()),
            ("never_attended_children", self.never_attended_children.failures()),
        ];
        pages
            .into_iter()
            .flat_map(|(page, failures)| {
                failures
                    .into_iter()
                    .map(move |(metric, error)| (page, metric, error))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample_table, write_csv, DataStore, SAMPLE_CSV};

    const DISTRICT: &str = "Faisalabad District";

    #[test]
    fn test_dashboard_is_idempotent_over_cached_store() {
        let file = write_csv(SAMPLE_CSV);
        let store = DataStore::new(file.path());

        let first = Dashboard::build(&store.table().unwrap(), DISTRICT);
        let second = Dashboard::build(&store.table().unwrap(), DISTRICT);

        assert_eq!(first, second);
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn test_failures_are_isolated_per_page() {
        let table: IndicatorTable = sample_table()
            .iter()
            .filter(|r| r.indicator != Indicator::NeverToSchoolAll)
            .cloned()
            .collect();
        let dashboard = Dashboard::build(&table, DISTRICT);

        assert!(dashboard.literacy.failures().is_empty());
        assert!(dashboard.out_of_school.failures().is_empty());
        assert!(dashboard.overview.never_attended_total.is_err());
        assert!(dashboard.overview.out_of_school_total.is_ok());
        assert!(dashboard.never_attended_all.total.is_err());

        let pages: Vec<&str> = dashboard.failures().iter().map(|(page, _, _)| *page).collect();
        assert!(pages.contains(&"overview"));
        assert!(pages.contains(&"never_attended_all"));
        assert!(!pages.contains(&"literacy"));
    }

    #[test]
    fn test_never_attended_switch() {
        let dashboard = Dashboard::build(&sample_table(), DISTRICT);
        assert_eq!(
            dashboard.never_attended(&Indicator::NeverToSchoolChildren).indicator,
            Indicator::NeverToSchoolChildren
        );
        assert_eq!(
            dashboard.never_attended(&Indicator::NeverToSchoolAll).total,
            Ok(2_500_000.0)
        );
    }
}
