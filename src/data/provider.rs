use std::path::PathBuf;

use anyhow::Result;

use crate::data::load_series_from_csv;
use crate::domain::PriceSeries;

/// Abstract interface for obtaining the (read-only) price series at startup.
pub trait SeriesSource {
    fn load(&self) -> Result<PriceSeries>;
}

/// A local CSV export (e.g. TradingView "time,open,high,low,close").
pub struct CsvSource {
    pub path: PathBuf,
    pub symbol: String,
    pub interval: String,
    pub tail: usize,
}

impl SeriesSource for CsvSource {
    fn load(&self) -> Result<PriceSeries> {
        load_series_from_csv(&self.path, &self.symbol, &self.interval, self.tail)
    }
}
