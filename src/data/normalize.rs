//! Normalization Module
//! Column-name cleanup, numeric coercion, month mapping and year binning.
//!
//! Every function here is total: bad input becomes `None`, never an error.

use chrono::{Datelike, Month, NaiveDate};
use std::fmt;

/// Default value for identity-like string fields that are missing.
pub const UNKNOWN: &str = "Unknown";

/// Calendar month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Normalize a source column name.
///
/// Trims, lowercases, turns spaces into underscores, drops parentheses and
/// turns `/` into `_`. `"Fatalities (air)"` becomes `"fatalities_air"`.
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace(['(', ')'], "")
        .replace('/', "_")
}

/// Parse a cell as a number. Unparseable or non-finite values are `None`.
pub fn coerce_numeric(raw: Option<&str>) -> Option<f64> {
    let value = raw?.trim().parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    // -0.0 and 0.0 must compare equal for duplicate detection
    Some(if value == 0.0 { 0.0 } else { value })
}

/// Map a month label to its number. Accepts the "Feburary" misspelling.
pub fn month_number(label: &str) -> Option<u32> {
    match label {
        "January" => Some(1),
        "February" | "Feburary" => Some(2),
        "March" => Some(3),
        "April" => Some(4),
        "May" => Some(5),
        "June" => Some(6),
        "July" => Some(7),
        "August" => Some(8),
        "September" => Some(9),
        "October" => Some(10),
        "November" => Some(11),
        "December" => Some(12),
        _ => None,
    }
}

/// Earliest and latest month starts representable as nanosecond timestamps
/// (1677-09-21 to 2262-04-11).
const MONTH_DATE_RANGE: ((i32, u32), (i32, u32)) = ((1677, 10), (2262, 4));

/// First day of the month for `year`/`month`, if both form a valid date
/// between 1677-10 and 2262-04.
pub fn month_date(year: Option<f64>, month: Option<u32>) -> Option<NaiveDate> {
    let year = year?;
    if year.fract() != 0.0 || year < i32::MIN as f64 || year > i32::MAX as f64 {
        return None;
    }
    let key = (year as i32, month?);
    let (first, last) = MONTH_DATE_RANGE;
    if key < first || key > last {
        return None;
    }
    NaiveDate::from_ymd_opt(key.0, key.1, 1)
}

/// Full English month name of a date.
pub fn month_name(date: Option<NaiveDate>) -> Option<String> {
    let month = Month::try_from(u8::try_from(date?.month()).ok()?).ok()?;
    Some(month.name().to_string())
}

/// Render a numeric value the way it is shown in filters and tables.
///
/// Integral values drop the fractional part: `1977.0` is `"1977"`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Edges of the year bins. Bin `i` covers `(EDGES[i], EDGES[i + 1]]`, and the
/// first bin also includes its lower edge.
pub const YEAR_BIN_EDGES: [f64; 12] = [
    1908.0, 1920.0, 1932.0, 1944.0, 1956.0, 1968.0, 1980.0, 1992.0, 2004.0, 2016.0, 2020.0,
    2024.0,
];

/// Labelled, non-uniform period buckets for the `year` field.
///
/// Variant order is the categorical order used when charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum YearBin {
    Early1910s,
    Mid1920s,
    Late1930s,
    Early1940s,
    Mid1950s,
    Late1960s,
    Early1970s,
    Late1980s,
    Early2000s,
    Mid2010s,
    Early2020s,
}

impl YearBin {
    pub const ALL: [YearBin; 11] = [
        YearBin::Early1910s,
        YearBin::Mid1920s,
        YearBin::Late1930s,
        YearBin::Early1940s,
        YearBin::Mid1950s,
        YearBin::Late1960s,
        YearBin::Early1970s,
        YearBin::Late1980s,
        YearBin::Early2000s,
        YearBin::Mid2010s,
        YearBin::Early2020s,
    ];

    pub fn label(self) -> &'static str {
        match self {
            YearBin::Early1910s => "Early 1910s",
            YearBin::Mid1920s => "Mid 1920s",
            YearBin::Late1930s => "Late 1930s",
            YearBin::Early1940s => "Early 1940s",
            YearBin::Mid1950s => "Mid 1950s",
            YearBin::Late1960s => "Late 1960s",
            YearBin::Early1970s => "Early 1970s",
            YearBin::Late1980s => "Late 1980s",
            YearBin::Early2000s => "Early 2000s",
            YearBin::Mid2010s => "Mid 2010s",
            YearBin::Early2020s => "Early 2020s",
        }
    }

    /// Bin a year. Years outside `[1908, 2024]` have no bin.
    pub fn from_year(year: f64) -> Option<YearBin> {
        if year == YEAR_BIN_EDGES[0] {
            return Some(YearBin::Early1910s);
        }
        YEAR_BIN_EDGES
            .windows(2)
            .position(|edge| edge[0] < year && year <= edge[1])
            .map(|idx| Self::ALL[idx])
    }
}

impl fmt::Display for YearBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_are_normalized() {
        assert_eq!(normalize_column_name(" Country/Region "), "country_region");
        assert_eq!(normalize_column_name("Fatalities (air)"), "fatalities_air");
        assert_eq!(
            normalize_column_name("Aircraft Manufacturer"),
            "aircraft_manufacturer"
        );
    }

    #[test]
    fn column_name_normalization_is_idempotent() {
        for name in ["Country/Region", "Fatalities (air)", "Year", " Ground "] {
            let once = normalize_column_name(name);
            assert_eq!(normalize_column_name(&once), once);
        }
    }

    #[test]
    fn numeric_coercion_nulls_bad_values() {
        assert_eq!(coerce_numeric(Some("1977")), Some(1977.0));
        assert_eq!(coerce_numeric(Some(" 12.5 ")), Some(12.5));
        assert_eq!(coerce_numeric(Some("unknown")), None);
        assert_eq!(coerce_numeric(Some("NaN")), None);
        assert_eq!(coerce_numeric(Some("inf")), None);
        assert_eq!(coerce_numeric(None), None);
    }

    #[test]
    fn month_mapping_handles_misspelling() {
        assert_eq!(month_number("Feburary"), Some(2));
        assert_eq!(month_number("February"), Some(2));
        assert_eq!(month_number("December"), Some(12));
        assert_eq!(month_number("Marchx"), None);
    }

    #[test]
    fn month_date_is_null_for_missing_parts() {
        assert_eq!(
            month_date(Some(1985.0), Some(8)),
            NaiveDate::from_ymd_opt(1985, 8, 1)
        );
        assert_eq!(month_date(None, Some(8)), None);
        assert_eq!(month_date(Some(1985.0), None), None);
        assert_eq!(month_date(Some(1985.5), Some(8)), None);
        assert_eq!(month_date(Some(1985.0), Some(13)), None);
    }

    #[test]
    fn month_date_stays_within_timestamp_range() {
        assert_eq!(month_date(Some(1677.0), Some(9)), None);
        assert_eq!(
            month_date(Some(1677.0), Some(10)),
            NaiveDate::from_ymd_opt(1677, 10, 1)
        );
        assert_eq!(
            month_date(Some(2262.0), Some(4)),
            NaiveDate::from_ymd_opt(2262, 4, 1)
        );
        assert_eq!(month_date(Some(2262.0), Some(5)), None);
        assert_eq!(month_date(Some(9999.0), Some(1)), None);
    }

    #[test]
    fn month_name_follows_date() {
        let date = month_date(Some(1977.0), month_number("Feburary"));
        assert_eq!(month_name(date).as_deref(), Some("February"));
        assert_eq!(month_name(None), None);
    }

    #[test]
    fn year_bins_use_right_closed_intervals() {
        assert_eq!(YearBin::from_year(1908.0), Some(YearBin::Early1910s));
        assert_eq!(YearBin::from_year(1920.0), Some(YearBin::Early1910s));
        assert_eq!(YearBin::from_year(1921.0), Some(YearBin::Mid1920s));
        assert_eq!(YearBin::from_year(2016.0), Some(YearBin::Early2000s));
        assert_eq!(YearBin::from_year(2017.0), Some(YearBin::Mid2010s));
        assert_eq!(YearBin::from_year(2020.0), Some(YearBin::Mid2010s));
        assert_eq!(YearBin::from_year(2021.0), Some(YearBin::Early2020s));
        assert_eq!(YearBin::from_year(2024.0), Some(YearBin::Early2020s));
        assert_eq!(YearBin::from_year(2025.0), None);
        assert_eq!(YearBin::from_year(1907.0), None);
    }

    #[test]
    fn numbers_format_without_trailing_zero() {
        assert_eq!(format_number(1977.0), "1977");
        assert_eq!(format_number(2.5), "2.5");
    }
}
