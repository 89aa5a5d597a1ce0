//! Derived scalar metrics and number formatting for cards.

use crate::stats::{MetricError, MetricResult};

/// Render a count with an `M`/`K` suffix and one decimal, or as-is below 1,000.
pub fn format_compact_number(n: f64) -> String {
    if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Render a count with thousands separators and no decimals ("2,500,000").
pub fn format_grouped(n: f64) -> String {
    let rounded = n.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Urban minus rural. Signed: a negative gap means rural is ahead.
pub fn literacy_gap(urban_total: f64, rural_total: f64) -> f64 {
    urban_total - rural_total
}

/// Male minus female.
pub fn gender_gap_in_literacy(male_total: f64, female_total: f64) -> f64 {
    male_total - female_total
}

/// Female share of a count, in percent.
pub fn female_share(female_count: f64, total_count: f64) -> MetricResult<f64> {
    if total_count == 0.0 {
        return Err(MetricError::DivisionUndefined("female share".to_string()));
    }
    Ok(female_count / total_count * 100.0)
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
