use std::io::Write;
use tempfile::NamedTempFile;

/// Header used by the sample crash files, spelled like the real dataset.
#[allow(dead_code)]
pub const HEADER: &str =
    "Year,Quarter,Month,Day,Country/Region,Aircraft Manufacturer,Aircraft,Location,Operator,Sum of Ground,Fatalities (air),Ground";

/// Write CSV text to a temporary `.csv` file that lives as long as the handle.
pub fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    file.write_all(contents.as_bytes()).expect("write temp csv");
    file.flush().expect("flush temp csv");
    file
}

/// Sample file with a duplicate row, a misspelled month, blanks and a bad number.
#[allow(dead_code)]
pub fn sample_csv() -> NamedTempFile {
    let rows = [
        "1977,Qtr 1,March,27,Spain,Boeing,Boeing 747,Tenerife,KLM,0,248,0",
        "1977,Qtr 1,March,27,Spain,Boeing,Boeing 747,Tenerife,Pan Am,0,335,0",
        "1985,Qtr 3,August,12,Japan,Boeing,Boeing 747SR,Gunma,Japan Air Lines,0,520,0",
        "1985,Qtr 3,August,12,Japan,Boeing,Boeing 747SR,Gunma,Japan Air Lines,0,520,0",
        "1996,Qtr 4,November,12,India,Ilyushin,Il-76,Charkhi Dadri,,0,349,0",
        "2001,Qtr 3,September,11,USA,,Boeing 767,New York,American Airlines,0,abc,2750",
        "1920,Qtr 1,Feburary,3,,Handley Page,O/400,London,Handley Page Transport,0,4,0",
        "n/a,Qtr 2,Marchx,1,France,Airbus,A320,Alps,Germanwings,0,150,0",
    ];
    write_csv(&format!("{}\n{}\n", HEADER, rows.join("\n")))
}
