//! Price data source defaults and marker defaults.

/// Where the price series comes from when no CLI override is given.
pub struct DataConfig {
    /// CSV with `time,open,high,low,close` columns
    pub default_csv_path: &'static str,
    /// Only the most recent N candles are kept (re-indexed from 0)
    pub tail_candles: usize,
    pub default_symbol: &'static str,
    pub default_interval: &'static str,
}

pub const DATA: DataConfig = DataConfig {
    default_csv_path: "NASDAQ_AMD, 1D_pp.csv",
    tail_candles: 300,
    default_symbol: "AMD",
    default_interval: "1D",
};

/// Initial positions for the start/end candle markers.
pub struct MarkerConfig {
    pub default_start_idx: usize,
    pub default_end_idx: usize,
}

pub const MARKERS: MarkerConfig = MarkerConfig {
    default_start_idx: 10,
    default_end_idx: 20,
};
