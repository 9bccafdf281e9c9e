//! Crash Record Module
//! Typed rows and the canonical, deduplicated crash table.

use super::normalize::{
    coerce_numeric, format_number, month_date, month_name, month_number, normalize_column_name,
    YearBin, UNKNOWN,
};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use tracing::{debug, info, warn};

/// Named fields of a crash record, by their normalized column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CountryRegion,
    Operator,
    AircraftManufacturer,
    Year,
    Day,
    Abroad,
    FatalitiesAir,
    Ground,
    Month,
    Quarter,
    Aircraft,
    MonthNum,
    MonthDate,
    MonthName,
    YearBin,
}

impl Field {
    /// Fields that always exist in the canonical table, even when the
    /// source lacks the column.
    const MATERIALIZED: [Field; 9] = [
        Field::CountryRegion,
        Field::Operator,
        Field::AircraftManufacturer,
        Field::Year,
        Field::Day,
        Field::Abroad,
        Field::FatalitiesAir,
        Field::Ground,
        Field::Month,
    ];

    const DERIVED: [Field; 4] = [
        Field::MonthNum,
        Field::MonthDate,
        Field::MonthName,
        Field::YearBin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::CountryRegion => "country_region",
            Field::Operator => "operator",
            Field::AircraftManufacturer => "aircraft_manufacturer",
            Field::Year => "year",
            Field::Day => "day",
            Field::Abroad => "abroad",
            Field::FatalitiesAir => "fatalities_air",
            Field::Ground => "ground",
            Field::Month => "month",
            Field::Quarter => "quarter",
            Field::Aircraft => "aircraft",
            Field::MonthNum => "month_num",
            Field::MonthDate => "month_date",
            Field::MonthName => "month_name",
            Field::YearBin => "year_bin",
        }
    }

    fn from_name(name: &str) -> Option<Field> {
        Self::MATERIALIZED
            .iter()
            .chain([Field::Quarter, Field::Aircraft].iter())
            .chain(Self::DERIVED.iter())
            .copied()
            .find(|field| field.name() == name)
    }

    fn is_derived(self) -> bool {
        Self::DERIVED.contains(&self)
    }
}

/// A column of the canonical table: either a typed field or a passthrough
/// source column (index into [`CrashRecord::extra`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableColumn {
    Field(Field),
    Extra { name: String, index: usize },
}

impl TableColumn {
    pub fn name(&self) -> &str {
        match self {
            TableColumn::Field(field) => field.name(),
            TableColumn::Extra { name, .. } => name,
        }
    }
}

/// One normalized air crash record.
#[derive(Debug, Clone, PartialEq)]
pub struct CrashRecord {
    pub country_region: String,
    pub operator: String,
    pub aircraft_manufacturer: String,
    pub year: Option<f64>,
    pub day: Option<f64>,
    pub abroad: Option<f64>,
    pub fatalities_air: Option<f64>,
    pub ground: Option<f64>,
    pub month: Option<String>,
    pub quarter: Option<String>,
    pub aircraft: Option<String>,
    pub month_num: Option<u32>,
    pub month_date: Option<NaiveDate>,
    pub month_name: Option<String>,
    pub year_bin: Option<YearBin>,
    /// Passthrough source columns, unmodified.
    pub extra: Vec<Option<String>>,
}

// Numeric fields never hold NaN (coercion rejects non-finite values), so
// bitwise equality is value equality.
impl Eq for CrashRecord {}

impl Hash for CrashRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.country_region.hash(state);
        self.operator.hash(state);
        self.aircraft_manufacturer.hash(state);
        for value in [
            self.year,
            self.day,
            self.abroad,
            self.fatalities_air,
            self.ground,
        ] {
            value.map(f64::to_bits).hash(state);
        }
        self.month.hash(state);
        self.quarter.hash(state);
        self.aircraft.hash(state);
        self.month_num.hash(state);
        self.month_date.hash(state);
        self.month_name.hash(state);
        self.year_bin.hash(state);
        self.extra.hash(state);
    }
}

impl CrashRecord {
    /// Display form of a column value; `None` for nulls.
    pub fn cell(&self, column: &TableColumn) -> Option<String> {
        let field = match column {
            TableColumn::Extra { index, .. } => return self.extra.get(*index).cloned().flatten(),
            TableColumn::Field(field) => *field,
        };
        match field {
            Field::CountryRegion => Some(self.country_region.clone()),
            Field::Operator => Some(self.operator.clone()),
            Field::AircraftManufacturer => Some(self.aircraft_manufacturer.clone()),
            Field::Year => self.year.map(format_number),
            Field::Day => self.day.map(format_number),
            Field::Abroad => self.abroad.map(format_number),
            Field::FatalitiesAir => self.fatalities_air.map(format_number),
            Field::Ground => self.ground.map(format_number),
            Field::Month => self.month.clone(),
            Field::Quarter => self.quarter.clone(),
            Field::Aircraft => self.aircraft.clone(),
            Field::MonthNum => self.month_num.map(|m| m.to_string()),
            Field::MonthDate => self.month_date.map(|d| d.format("%Y-%m-%d").to_string()),
            Field::MonthName => self.month_name.clone(),
            Field::YearBin => self.year_bin.map(|bin| bin.label().to_string()),
        }
    }
}

/// Where each typed field lives in a raw source row.
#[derive(Debug, Default)]
struct SourceLayout {
    positions: Vec<(Field, usize)>,
    extras: Vec<usize>,
}

impl SourceLayout {
    fn position(&self, field: Field) -> Option<usize> {
        self.positions
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, idx)| *idx)
    }
}

/// The canonical crash table: normalized, deduplicated and immutable.
#[derive(Debug, Clone, Default)]
pub struct CrashTable {
    columns: Vec<TableColumn>,
    has_quarter: bool,
    has_aircraft: bool,
    records: Vec<CrashRecord>,
}

impl CrashTable {
    /// Build the canonical table from raw source cells.
    ///
    /// `source_columns` are the header names as found in the source; they
    /// are normalized here. Short rows are padded with nulls.
    pub fn from_raw(source_columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let normalized: Vec<String> = source_columns
            .iter()
            .map(|name| normalize_column_name(name))
            .collect();

        let mut layout = SourceLayout::default();
        let mut columns = Vec::with_capacity(normalized.len() + Field::DERIVED.len());
        for (idx, name) in normalized.iter().enumerate() {
            match Field::from_name(name) {
                // Derived columns in the source are replaced by ours
                Some(field) if field.is_derived() => {
                    debug!(column = %name, "source column replaced by derived column");
                }
                Some(field) if layout.position(field).is_none() => {
                    layout.positions.push((field, idx));
                    columns.push(TableColumn::Field(field));
                }
                _ => {
                    columns.push(TableColumn::Extra {
                        name: name.clone(),
                        index: layout.extras.len(),
                    });
                    layout.extras.push(idx);
                }
            }
        }

        for field in Field::MATERIALIZED {
            if layout.position(field).is_none() {
                match field {
                    Field::CountryRegion | Field::Operator | Field::AircraftManufacturer => {
                        warn!(column = field.name(), "column missing, filling with \"Unknown\"")
                    }
                    _ => debug!(column = field.name(), "column missing, treating as null"),
                }
                columns.push(TableColumn::Field(field));
            }
        }
        columns.extend(Field::DERIVED.iter().map(|f| TableColumn::Field(*f)));

        let raw_count = rows.len();
        let mut records: Vec<CrashRecord> = rows
            .into_iter()
            .map(|row| Self::build_record(&layout, row))
            .collect();

        let mut seen: HashSet<&CrashRecord> = HashSet::with_capacity(records.len());
        let keep: Vec<bool> = records.iter().map(|record| seen.insert(record)).collect();
        drop(seen);
        let mut keep = keep.into_iter();
        records.retain(|_| keep.next().unwrap_or(false));

        info!(
            rows = raw_count,
            duplicates = raw_count - records.len(),
            kept = records.len(),
            "normalized crash records"
        );

        Self {
            columns,
            has_quarter: layout.position(Field::Quarter).is_some(),
            has_aircraft: layout.position(Field::Aircraft).is_some(),
            records,
        }
    }

    fn build_record(layout: &SourceLayout, mut row: Vec<Option<String>>) -> CrashRecord {
        let mut take = |field: Field| -> Option<String> {
            layout
                .position(field)
                .and_then(|idx| row.get_mut(idx))
                .and_then(Option::take)
        };

        let identity = |value: Option<String>| value.unwrap_or_else(|| UNKNOWN.to_string());
        let country_region = identity(take(Field::CountryRegion));
        let operator = identity(take(Field::Operator));
        let aircraft_manufacturer = identity(take(Field::AircraftManufacturer));

        let year = coerce_numeric(take(Field::Year).as_deref());
        let day = coerce_numeric(take(Field::Day).as_deref());
        let abroad = coerce_numeric(take(Field::Abroad).as_deref());
        let fatalities_air = coerce_numeric(take(Field::FatalitiesAir).as_deref());
        let ground = coerce_numeric(take(Field::Ground).as_deref());

        let month = take(Field::Month);
        let quarter = take(Field::Quarter);
        let aircraft = take(Field::Aircraft);

        let month_num = month.as_deref().and_then(month_number);
        let month_date = month_date(year, month_num);
        let month_name = month_name(month_date);
        let year_bin = year.and_then(YearBin::from_year);

        let extra = layout
            .extras
            .iter()
            .map(|&idx| row.get(idx).cloned().flatten())
            .collect();

        CrashRecord {
            country_region,
            operator,
            aircraft_manufacturer,
            year,
            day,
            abroad,
            fatalities_air,
            ground,
            month,
            quarter,
            aircraft,
            month_num,
            month_date,
            month_name,
            year_bin,
            extra,
        }
    }

    pub fn records(&self) -> &[CrashRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Columns in display order: source columns, then filled-in and derived ones.
    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    /// Whether the source had a `quarter` column.
    pub fn has_quarter(&self) -> bool {
        self.has_quarter
    }

    /// Whether the source had an `aircraft` column.
    pub fn has_aircraft(&self) -> bool {
        self.has_aircraft
    }
}
