mod csv_loader;
mod provider;

pub use csv_loader::{load_series_from_csv, series_from_reader};
pub use provider::{CsvSource, SeriesSource};
