//! Data module - CSV loading, normalization and filtering

mod loader;
pub mod normalize;
mod processor;
mod record;

pub use loader::{CrashLoader, LoaderError, TableCache, NULL_TOKENS};
pub use normalize::{YearBin, MONTH_NAMES, UNKNOWN};
pub use processor::{FilterField, FilteredView, Predicates};
pub use record::{CrashRecord, CrashTable, Field, TableColumn};
