//! CSV Data Loader Module
//! Reads the crash CSV with Polars and hands the raw cells to the normalizer.

use super::record::CrashTable;
use polars::io::csv::read::NullValues;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Cell values read as missing, the same tokens pandas treats as NA.
pub const NULL_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn null_values() -> NullValues {
    NullValues::AllColumns(NULL_TOKENS.iter().map(|&t| PlSmallStr::from_static(t)).collect())
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV has no header row: {}", .0.display())]
    NoColumns(PathBuf),
}

/// Loads the crash CSV into a canonical [`CrashTable`].
pub struct CrashLoader;

impl CrashLoader {
    /// Load and normalize a CSV file.
    ///
    /// Every column is read as text so passthrough columns keep their exact
    /// source values; typing happens during normalization.
    pub fn load(path: impl AsRef<Path>) -> Result<CrashTable, LoaderError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        info!(path = %path.display(), "loading crash data");
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_null_values(Some(null_values()))
            .finish()?
            .collect()?;

        if df.width() == 0 {
            return Err(LoaderError::NoColumns(path.to_path_buf()));
        }

        Self::from_dataframe(&df)
    }

    /// Normalize an already-read DataFrame. Empty cells and [`NULL_TOKENS`]
    /// count as null.
    pub fn from_dataframe(df: &DataFrame) -> Result<CrashTable, LoaderError> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        debug!(columns = ?columns, rows = df.height(), "read source frame");

        let mut rows: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(columns.len()); df.height()];
        for column in df.get_columns() {
            let text = column.cast(&DataType::String)?;
            let ca = text.str()?;
            for (row, value) in rows.iter_mut().zip(ca.into_iter()) {
                row.push(
                    value
                        .filter(|v| !v.is_empty() && !NULL_TOKENS.contains(v))
                        .map(str::to_string),
                );
            }
        }

        Ok(CrashTable::from_raw(columns, rows))
    }
}

/// Process-lifetime handle to the canonical table.
///
/// The table is loaded at most once and shared read-only until
/// [`TableCache::clear`] is called or the source path changes.
#[derive(Debug)]
pub struct TableCache {
    path: PathBuf,
    table: Option<Arc<CrashTable>>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point at a different source, dropping any cached table.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.clear();
    }

    pub fn get(&self) -> Option<Arc<CrashTable>> {
        self.table.clone()
    }

    /// Install a table loaded elsewhere (e.g. on a background thread).
    pub fn store(&mut self, table: CrashTable) -> Arc<CrashTable> {
        let table = Arc::new(table);
        self.table = Some(Arc::clone(&table));
        table
    }

    /// Return the cached table, loading it on first use.
    pub fn get_or_load(&mut self) -> Result<Arc<CrashTable>, LoaderError> {
        if let Some(table) = &self.table {
            return Ok(Arc::clone(table));
        }
        let table = CrashLoader::load(&self.path)?;
        Ok(self.store(table))
    }

    pub fn clear(&mut self) {
        if self.table.take().is_some() {
            debug!(path = %self.path.display(), "cleared cached table");
        }
    }
}
