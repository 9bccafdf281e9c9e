mod common;

use air_crash_dashboard::data::{Field, TableColumn, UNKNOWN};
use air_crash_dashboard::{CrashLoader, FilterField, LoaderError, Predicates, TableCache, YearBin};
use common::{sample_csv, write_csv};
use std::sync::Arc;

#[test]
fn identity_fields_are_never_null() {
    let file = sample_csv();
    let table = CrashLoader::load(file.path()).unwrap();

    assert!(table.records().iter().all(|r| !r.country_region.is_empty()
        && !r.operator.is_empty()
        && !r.aircraft_manufacturer.is_empty()));

    let london = table
        .records()
        .iter()
        .find(|r| r.operator == "Handley Page Transport")
        .unwrap();
    assert_eq!(london.country_region, UNKNOWN);

    let india = table.records().iter().find(|r| r.country_region == "India").unwrap();
    assert_eq!(india.operator, UNKNOWN);

    let usa = table.records().iter().find(|r| r.country_region == "USA").unwrap();
    assert_eq!(usa.aircraft_manufacturer, UNKNOWN);
}

#[test]
fn exact_duplicates_collapse_to_one() {
    let file = sample_csv();
    let table = CrashLoader::load(file.path()).unwrap();

    // 8 source rows, one exact duplicate (the two 1985 rows)
    assert_eq!(table.len(), 7);
    let japan = table
        .records()
        .iter()
        .filter(|r| r.country_region == "Japan")
        .count();
    assert_eq!(japan, 1);

    // Same flight, different operator: not a duplicate
    let tenerife = table
        .records()
        .iter()
        .filter(|r| r.country_region == "Spain")
        .count();
    assert_eq!(tenerife, 2);
}

#[test]
fn loading_is_idempotent() {
    let file = sample_csv();
    let first = CrashLoader::load(file.path()).unwrap();
    let second = CrashLoader::load(file.path()).unwrap();
    assert_eq!(first.records(), second.records());
    assert_eq!(first.column_names(), second.column_names());
}

#[test]
fn bad_values_become_null() {
    let file = sample_csv();
    let table = CrashLoader::load(file.path()).unwrap();

    let usa = table.records().iter().find(|r| r.country_region == "USA").unwrap();
    assert_eq!(usa.fatalities_air, None);
    assert_eq!(usa.ground, Some(2750.0));

    let france = table.records().iter().find(|r| r.country_region == "France").unwrap();
    assert_eq!(france.year, None);
    assert_eq!(france.month_num, None);
    assert_eq!(france.month_date, None);
    assert_eq!(france.month_name, None);
    assert_eq!(france.year_bin, None);
}

#[test]
fn derived_month_and_bin_fields() {
    let file = sample_csv();
    let table = CrashLoader::load(file.path()).unwrap();

    let london = table
        .records()
        .iter()
        .find(|r| r.operator == "Handley Page Transport")
        .unwrap();
    assert_eq!(london.month.as_deref(), Some("Feburary"));
    assert_eq!(london.month_num, Some(2));
    assert_eq!(london.month_name.as_deref(), Some("February"));
    assert_eq!(london.year_bin, Some(YearBin::Early1910s));
}

#[test]
fn column_names_are_normalized_and_extras_kept() {
    let file = sample_csv();
    let table = CrashLoader::load(file.path()).unwrap();
    let names = table.column_names();

    for expected in [
        "year",
        "quarter",
        "country_region",
        "aircraft_manufacturer",
        "fatalities_air",
        "location",
        "sum_of_ground",
        "month_num",
        "month_date",
        "month_name",
        "year_bin",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }

    let location = table
        .columns()
        .iter()
        .find(|c| c.name() == "location")
        .unwrap();
    assert!(matches!(location, TableColumn::Extra { .. }));
    let values: Vec<_> = table
        .records()
        .iter()
        .filter_map(|r| r.cell(location))
        .collect();
    assert!(values.contains(&"Charkhi Dadri".to_string()));
}

#[test]
fn absent_numeric_columns_are_all_null() {
    let file = write_csv(
        "Country/Region,Operator,Aircraft Manufacturer,Month,Year\n\
         Spain,Iberia,Boeing,May,1980\n",
    );
    let table = CrashLoader::load(file.path()).unwrap();
    let record = &table.records()[0];

    assert_eq!(record.fatalities_air, None);
    assert_eq!(record.day, None);
    assert_eq!(record.ground, None);
    assert!(table
        .columns()
        .contains(&TableColumn::Field(Field::FatalitiesAir)));
    assert!(!table.has_quarter());
    assert!(!table.has_aircraft());
}

#[test]
fn quarter_filter_is_skipped_without_quarter_column() {
    let file = write_csv(
        "Country/Region,Operator,Aircraft Manufacturer,Month,Year,Fatalities (air)\n\
         Spain,Iberia,Boeing,May,1980,10\n\
         Peru,Faucett,Boeing,June,1996,123\n",
    );
    let table = CrashLoader::load(file.path()).unwrap();
    let view = table.filter(&Predicates::new().with(FilterField::Quarter, ["Qtr 1"]));
    assert_eq!(view.len(), 2);
    assert!(table.filter_options(FilterField::Quarter).is_empty());
}

#[test]
fn missing_file_is_fatal() {
    let result = CrashLoader::load("does/not/exist.csv");
    assert!(matches!(result, Err(LoaderError::NotFound(_))));
}

#[test]
fn cache_loads_once_until_cleared() {
    let file = sample_csv();
    let mut cache = TableCache::new(file.path());
    assert!(cache.get().is_none());

    let first = cache.get_or_load().unwrap();
    let second = cache.get_or_load().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    cache.clear();
    assert!(cache.get().is_none());
    let third = cache.get_or_load().unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(first.records(), third.records());
}

#[test]
fn na_tokens_are_missing_values() {
    let file = write_csv(
        "Year,Month,Country/Region,Operator,Aircraft Manufacturer,Fatalities (air)\n\
         1980,May,N/A,NA,NULL,10\n\
         1981,June,Peru,Faucett,Boeing,nan\n",
    );
    let table = CrashLoader::load(file.path()).unwrap();

    let first = &table.records()[0];
    assert_eq!(first.country_region, UNKNOWN);
    assert_eq!(first.operator, UNKNOWN);
    assert_eq!(first.aircraft_manufacturer, UNKNOWN);
    assert_eq!(first.fatalities_air, Some(10.0));

    let second = &table.records()[1];
    assert_eq!(second.operator, "Faucett");
    assert_eq!(second.fatalities_air, None);
}
