//! Indicator Records
//! Fixed-schema row type for the census indicator table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of statistic a row represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    /// "Literate %": values are percentages.
    LiteratePercent,
    /// "Out of School Children (5-16)": values are counts.
    OutOfSchool,
    /// "Never to School (all)": values are counts.
    NeverToSchoolAll,
    /// "Never to School (5-16)": values are counts.
    NeverToSchoolChildren,
    /// Any label the dashboard has no page for. Kept verbatim.
    Other(String),
}

impl Indicator {
    pub fn label(&self) -> &str {
        match self {
            Indicator::LiteratePercent => "Literate %",
            Indicator::OutOfSchool => "Out of School Children (5-16)",
            Indicator::NeverToSchoolAll => "Never to School (all)",
            Indicator::NeverToSchoolChildren => "Never to School (5-16)",
            Indicator::Other(label) => label,
        }
    }

    /// Parse a CSV label. Unknown labels become `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Literate %" => Indicator::LiteratePercent,
            "Out of School Children (5-16)" => Indicator::OutOfSchool,
            "Never to School (all)" => Indicator::NeverToSchoolAll,
            "Never to School (5-16)" => Indicator::NeverToSchoolChildren,
            other => Indicator::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Urban/rural classification of a region row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaType {
    Total,
    Urban,
    Rural,
}

impl AreaType {
    pub const SPLIT: [AreaType; 2] = [AreaType::Urban, AreaType::Rural];

    pub fn as_str(&self) -> &'static str {
        match self {
            AreaType::Total => "Total",
            AreaType::Urban => "Urban",
            AreaType::Rural => "Rural",
        }
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAreaType(pub String);

impl fmt::Display for UnknownAreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown AreaType '{}'", self.0)
    }
}

impl FromStr for AreaType {
    type Err = UnknownAreaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Total" => Ok(AreaType::Total),
            "Urban" => Ok(AreaType::Urban),
            "Rural" => Ok(AreaType::Rural),
            other => Err(UnknownAreaType(other.to_string())),
        }
    }
}

/// Value column of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Total,
    Male,
    Female,
}

/// One row of the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub indicator: Indicator,
    pub region: String,
    pub area_type: AreaType,
    pub total: f64,
    pub male: f64,
    pub female: f64,
}

impl IndicatorRecord {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Total => self.total,
            Field::Male => self.male,
            Field::Female => self.female,
        }
    }
}

/// Read-only in-memory indicator table. Row order is the source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorTable {
    records: Vec<IndicatorRecord>,
}

impl IndicatorTable {
    pub fn new(records: Vec<IndicatorRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[IndicatorRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Region names in first-seen order, without duplicates.
    pub fn regions_in_order(&self) -> Vec<String> {
        let mut regions: Vec<String> = Vec::new();
        for record in &self.records {
            if !regions.iter().any(|r| r == &record.region) {
                regions.push(record.region.clone());
            }
        }
        regions
    }
}

impl FromIterator<IndicatorRecord> for IndicatorTable {
    fn from_iter<I: IntoIterator<Item = IndicatorRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(
        indicator: Indicator,
        region: &str,
        area_type: AreaType,
        total: f64,
        male: f64,
        female: f64,
    ) -> IndicatorRecord {
        IndicatorRecord {
            indicator,
            region: region.to_string(),
            area_type,
            total,
            male,
            female,
        }
    }

    #[test]
    fn test_indicator_labels_round_trip() {
        for indicator in [
            Indicator::LiteratePercent,
            Indicator::OutOfSchool,
            Indicator::NeverToSchoolAll,
            Indicator::NeverToSchoolChildren,
        ] {
            assert_eq!(Indicator::from_label(indicator.label()), indicator);
        }
        assert_eq!(
            Indicator::from_label("Enrolled %"),
            Indicator::Other("Enrolled %".to_string())
        );
    }

    #[test]
    fn test_area_type_parse() {
        assert_eq!(" Urban ".parse::<AreaType>(), Ok(AreaType::Urban));
        assert_eq!(
            "Suburban".parse::<AreaType>(),
            Err(UnknownAreaType("Suburban".to_string()))
        );
    }

    #[test]
    fn test_regions_in_first_seen_order() {
        let table = IndicatorTable::new(vec![
            record(Indicator::OutOfSchool, "Jaranwala", AreaType::Urban, 1.0, 1.0, 0.0),
            record(Indicator::OutOfSchool, "Samundri", AreaType::Urban, 1.0, 1.0, 0.0),
            record(Indicator::OutOfSchool, "Jaranwala", AreaType::Rural, 1.0, 1.0, 0.0),
        ]);
        assert_eq!(table.regions_in_order(), vec!["Jaranwala", "Samundri"]);
    }
}
