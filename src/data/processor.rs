//! Filter Module
//! Predicate sets over year/quarter/month and the filtered views they produce.

use super::normalize::{coerce_numeric, format_number, month_number};
use super::record::{CrashRecord, CrashTable, TableColumn};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Fields the dashboard can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterField {
    Year,
    Quarter,
    Month,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [FilterField::Year, FilterField::Quarter, FilterField::Month];

    pub fn name(self) -> &'static str {
        match self {
            FilterField::Year => "year",
            FilterField::Quarter => "quarter",
            FilterField::Month => "month",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Year => "Year",
            FilterField::Quarter => "Quarter",
            FilterField::Month => "Month",
        }
    }

    /// The value a record carries for this field, in filter form.
    pub fn value_of(self, record: &CrashRecord) -> Option<String> {
        match self {
            FilterField::Year => record.year.map(format_number),
            FilterField::Quarter => record.quarter.clone(),
            FilterField::Month => record.month.clone(),
        }
    }
}

/// Allowed values per filter field.
///
/// Fields combine with AND, values within a field with OR. A field with no
/// allowed values does not restrict anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicates {
    allowed: BTreeMap<FilterField, BTreeSet<String>>,
}

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Predicates::set`].
    pub fn with<I, S>(mut self, field: FilterField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(field, values);
        self
    }

    /// Replace the allowed values of a field.
    pub fn set<I, S>(&mut self, field: FilterField, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.allowed.remove(&field);
        } else {
            self.allowed.insert(field, values);
        }
    }

    pub fn allowed(&self, field: FilterField) -> Option<&BTreeSet<String>> {
        self.allowed.get(&field)
    }

    pub fn is_selected(&self, field: FilterField, value: &str) -> bool {
        self.allowed
            .get(&field)
            .is_some_and(|values| values.contains(value))
    }

    /// Add or remove a single value.
    pub fn toggle(&mut self, field: FilterField, value: &str) {
        let values = self.allowed.entry(field).or_default();
        if !values.remove(value) {
            values.insert(value.to_string());
        }
        if values.is_empty() {
            self.allowed.remove(&field);
        }
    }

    pub fn clear_field(&mut self, field: FilterField) {
        self.allowed.remove(&field);
    }

    pub fn clear(&mut self) {
        self.allowed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    fn matches(&self, record: &CrashRecord, has_quarter: bool) -> bool {
        self.allowed.iter().all(|(field, values)| {
            if *field == FilterField::Quarter && !has_quarter {
                return true;
            }
            field
                .value_of(record)
                .is_some_and(|value| values.contains(&value))
        })
    }
}

/// A read-only selection of rows from the canonical table.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a CrashTable,
    rows: Vec<&'a CrashRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn table(&self) -> &'a CrashTable {
        self.table
    }

    pub fn rows(&self) -> &[&'a CrashRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &'a [TableColumn] {
        self.table.columns()
    }

    pub fn head(&self, n: usize) -> &[&'a CrashRecord] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// First `n` rows rendered as display strings, nulls shown empty.
    pub fn preview(&self, n: usize) -> Vec<Vec<String>> {
        self.head(n)
            .iter()
            .map(|record| {
                self.columns()
                    .iter()
                    .map(|column| record.cell(column).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

impl CrashTable {
    /// Select the rows allowed by `predicates`. Never mutates the table.
    ///
    /// Quarter predicates are ignored when the table has no quarter column.
    pub fn filter(&self, predicates: &Predicates) -> FilteredView<'_> {
        let has_quarter = self.has_quarter();
        let rows: Vec<&CrashRecord> = self
            .records()
            .iter()
            .filter(|record| predicates.matches(record, has_quarter))
            .collect();

        debug!(
            selected = rows.len(),
            total = self.len(),
            "applied filters"
        );

        FilteredView { table: self, rows }
    }

    /// Distinct non-null values of a filter field, sorted for display.
    ///
    /// Years sort numerically, months in calendar order (unknown labels
    /// last), quarters lexicographically.
    pub fn filter_options(&self, field: FilterField) -> Vec<String> {
        if field == FilterField::Quarter && !self.has_quarter() {
            return Vec::new();
        }

        let mut values: Vec<String> = self
            .records()
            .iter()
            .filter_map(|record| field.value_of(record))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        match field {
            FilterField::Year => values.sort_by(|a, b| {
                let a = coerce_numeric(Some(a)).unwrap_or(f64::MAX);
                let b = coerce_numeric(Some(b)).unwrap_or(f64::MAX);
                a.total_cmp(&b)
            }),
            FilterField::Month => {
                values.sort_by_key(|label| (month_number(label).unwrap_or(u32::MAX), label.clone()))
            }
            FilterField::Quarter => {}
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CrashTable {
        let columns = ["Year", "Quarter", "Month", "Fatalities (air)"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = [
            ["1977", "Qtr 1", "March", "10"],
            ["1977", "Qtr 4", "October", "20"],
            ["1985", "Qtr 3", "August", "520"],
            ["2001", "Qtr 3", "September", "30"],
        ]
        .iter()
        .map(|row| row.iter().map(|cell| Some(cell.to_string())).collect())
        .collect();
        CrashTable::from_raw(columns, rows)
    }

    #[test]
    fn empty_predicates_keep_every_row() {
        let table = table();
        let view = table.filter(&Predicates::new());
        assert_eq!(view.len(), table.len());
    }

    #[test]
    fn fields_combine_with_and_values_with_or() {
        let table = table();
        let predicates = Predicates::new()
            .with(FilterField::Year, ["1977", "2001"])
            .with(FilterField::Quarter, ["Qtr 3", "Qtr 4"]);
        let view = table.filter(&predicates);
        let months: Vec<_> = view.rows().iter().filter_map(|r| r.month.clone()).collect();
        assert_eq!(months, vec!["October".to_string(), "September".to_string()]);
    }

    #[test]
    fn toggle_removes_empty_fields() {
        let mut predicates = Predicates::new();
        predicates.toggle(FilterField::Month, "March");
        assert!(predicates.is_selected(FilterField::Month, "March"));
        predicates.toggle(FilterField::Month, "March");
        assert!(predicates.is_empty());
    }

    #[test]
    fn options_are_sorted_for_display() {
        let table = table();
        assert_eq!(
            table.filter_options(FilterField::Month),
            vec!["March", "August", "September", "October"]
        );
        assert_eq!(
            table.filter_options(FilterField::Year),
            vec!["1977", "1985", "2001"]
        );
    }

    #[test]
    fn preview_is_limited_to_head() {
        let table = table();
        let view = table.filter(&Predicates::new());
        let preview = view.preview(2);
        assert_eq!(preview.len(), 2);
        assert_eq!(preview[0].len(), table.columns().len());
    }
}
