//! Aggregation Module
//! Scalar metrics and the grouped fatality totals shown on the dashboard.

use crate::data::{CrashRecord, FilteredView, YearBin, MONTH_NAMES};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::debug;

/// Default number of groups kept by the top-N queries.
pub const DEFAULT_TOP_N: usize = 5;

/// Total fatalities for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal<K> {
    pub key: K,
    pub total: f64,
}

impl<K> GroupTotal<K> {
    pub fn new(key: K, total: f64) -> Self {
        Self { key, total }
    }
}

/// Scalar metrics of a filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub record_count: usize,
    pub year_sum: i64,
    pub fatalities_sum: i64,
    /// Distinct non-null aircraft; 0 when the source has no aircraft column.
    pub unique_aircraft: usize,
}

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    pub metrics: Metrics,
    pub top_years: Vec<GroupTotal<f64>>,
    pub top_countries: Vec<GroupTotal<String>>,
    pub monthly: Vec<GroupTotal<String>>,
    pub top_manufacturers: Vec<GroupTotal<String>>,
    pub decades: Vec<GroupTotal<YearBin>>,
}

impl DashboardSummary {
    /// True when the filtered view had no rows.
    pub fn is_empty(&self) -> bool {
        self.metrics.record_count == 0
    }
}

/// Group-by/sum/sort queries over filtered views.
pub struct CrashAggregator;

impl CrashAggregator {
    /// Compute the metrics and all five result sets in one pass of calls.
    pub fn summarize(view: &FilteredView<'_>, top_n: usize) -> DashboardSummary {
        let summary = DashboardSummary {
            metrics: Self::metrics(view),
            top_years: Self::top_years(view, top_n),
            top_countries: Self::top_countries(view, top_n),
            monthly: Self::monthly_totals(view),
            top_manufacturers: Self::top_manufacturers(view, top_n),
            decades: Self::decade_totals(view),
        };
        debug!(
            rows = summary.metrics.record_count,
            fatalities = summary.metrics.fatalities_sum,
            "summarized view"
        );
        summary
    }

    pub fn metrics(view: &FilteredView<'_>) -> Metrics {
        let rows = view.rows();
        let year_sum: f64 = rows.iter().filter_map(|r| r.year).sum();
        let fatalities_sum: f64 = rows.iter().filter_map(|r| r.fatalities_air).sum();

        let unique_aircraft = if view.table().has_aircraft() {
            rows.iter()
                .filter_map(|r| r.aircraft.as_deref())
                .collect::<HashSet<_>>()
                .len()
        } else {
            0
        };

        Metrics {
            record_count: rows.len(),
            year_sum: year_sum as i64,
            fatalities_sum: fatalities_sum as i64,
            unique_aircraft,
        }
    }

    /// Years with the highest total fatalities.
    pub fn top_years(view: &FilteredView<'_>, n: usize) -> Vec<GroupTotal<f64>> {
        // Coerced years are finite and never -0.0, so bits identify values
        let groups = Self::group_sums(view, |r| r.year.map(f64::to_bits));
        Self::top_n(groups, n, |a, b| f64::from_bits(*a).total_cmp(&f64::from_bits(*b)))
            .into_iter()
            .map(|g| GroupTotal::new(f64::from_bits(g.key), g.total))
            .collect()
    }

    pub fn top_countries(view: &FilteredView<'_>, n: usize) -> Vec<GroupTotal<String>> {
        let groups = Self::group_sums(view, |r| Some(r.country_region.clone()));
        Self::top_n(groups, n, |a, b| a.cmp(b))
    }

    pub fn top_manufacturers(view: &FilteredView<'_>, n: usize) -> Vec<GroupTotal<String>> {
        let groups = Self::group_sums(view, |r| Some(r.aircraft_manufacturer.clone()));
        Self::top_n(groups, n, |a, b| a.cmp(b))
    }

    /// Fatalities per month name, in calendar order. Months without rows
    /// are absent rather than zero.
    pub fn monthly_totals(view: &FilteredView<'_>) -> Vec<GroupTotal<String>> {
        let mut groups = Self::group_sums(view, |r| r.month_name.clone());
        groups.sort_by_key(|(name, _)| {
            MONTH_NAMES
                .iter()
                .position(|m| *m == name.as_str())
                .unwrap_or(MONTH_NAMES.len())
        });
        groups
            .into_iter()
            .map(|(key, total)| GroupTotal::new(key, total))
            .collect()
    }

    /// Fatalities per year bin, in bin order. Empty bins are absent.
    pub fn decade_totals(view: &FilteredView<'_>) -> Vec<GroupTotal<YearBin>> {
        let mut groups = Self::group_sums(view, |r| r.year_bin);
        groups.sort_by_key(|(bin, _)| *bin);
        groups
            .into_iter()
            .map(|(key, total)| GroupTotal::new(key, total))
            .collect()
    }

    /// Sum `fatalities_air` per key in first-seen order. Rows without a key
    /// are skipped; null fatalities count as nothing.
    fn group_sums<K, F>(view: &FilteredView<'_>, key_of: F) -> Vec<(K, f64)>
    where
        K: Eq + Hash + Clone,
        F: Fn(&CrashRecord) -> Option<K>,
    {
        let mut index: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<(K, f64)> = Vec::new();

        for &record in view.rows() {
            let Some(key) = key_of(record) else {
                continue;
            };
            let value = record.fatalities_air.unwrap_or(0.0);
            match index.get(&key) {
                Some(&pos) => groups[pos].1 += value,
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push((key, value));
                }
            }
        }

        groups
    }

    /// Largest totals first; ties go to the smaller key.
    fn top_n<K>(
        mut groups: Vec<(K, f64)>,
        n: usize,
        key_order: impl Fn(&K, &K) -> Ordering,
    ) -> Vec<GroupTotal<K>> {
        groups.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| key_order(&a.0, &b.0)));
        groups.truncate(n);
        groups
            .into_iter()
            .map(|(key, total)| GroupTotal::new(key, total))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CrashTable, Predicates};

    fn table(rows: &[(&str, &str, &str)]) -> CrashTable {
        let columns = vec!["Year".to_string(), "Month".to_string(), "Fatalities (air)".to_string()];
        let rows = rows
            .iter()
            .map(|(year, month, fatalities)| {
                vec![
                    Some(year.to_string()),
                    Some(month.to_string()),
                    (!fatalities.is_empty()).then(|| fatalities.to_string()),
                ]
            })
            .collect();
        CrashTable::from_raw(columns, rows)
    }

    #[test]
    fn top_n_breaks_ties_by_key() {
        let table = table(&[
            ("1990", "May", "10"),
            ("1980", "May", "10"),
            ("2000", "May", "30"),
        ]);
        let view = table.filter(&Predicates::new());
        let years: Vec<f64> = CrashAggregator::top_years(&view, 5)
            .iter()
            .map(|g| g.key)
            .collect();
        assert_eq!(years, vec![2000.0, 1980.0, 1990.0]);
    }

    #[test]
    fn all_null_group_totals_zero() {
        let table = table(&[("1990", "May", ""), ("1991", "June", "4")]);
        let view = table.filter(&Predicates::new());
        let years = CrashAggregator::top_years(&view, 5);
        assert_eq!(
            years,
            vec![GroupTotal::new(1991.0, 4.0), GroupTotal::new(1990.0, 0.0)]
        );
    }

    #[test]
    fn unique_aircraft_is_zero_without_column() {
        let table = table(&[("1990", "May", "1")]);
        let view = table.filter(&Predicates::new());
        assert_eq!(CrashAggregator::metrics(&view).unique_aircraft, 0);
    }
}
