#![allow(clippy::collapsible_if)]
#![allow(clippy::too_many_arguments)]

// Core modules
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types outside of crate
pub use config::PERSISTENCE;
pub use data::{CsvSource, SeriesSource, load_series_from_csv};
pub use domain::{Candle, Category, Feature1, Feature2, PriceSeries, RegionColor};
pub use engine::{AnnotationError, AnnotationResult, AnnotationStore, Overlay, project, validate};
pub use models::{Region, RegionDraft, RegionId, SelectionState, Trade, TradeId, TradeSummary, ViewFilter};
pub use ui::{AnnotatorApp, UI_TEXT};

use std::path::PathBuf;

// CLI argument parsing
use clap::Parser;

use crate::config::DATA;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// OHLC CSV with time,open,high,low,close columns
    #[arg(long, default_value = DATA.default_csv_path)]
    pub csv: PathBuf,

    /// Keep only the most recent N candles
    #[arg(long, default_value_t = DATA.tail_candles)]
    pub tail: usize,

    /// Symbol label shown on the chart
    #[arg(long, default_value = DATA.default_symbol)]
    pub symbol: String,

    /// Interval label shown on the chart
    #[arg(long, default_value = DATA.default_interval)]
    pub interval: String,
}

/// Main application entry point - creates the GUI app
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> AnnotatorApp {
    AnnotatorApp::new(cc, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["trade-annotator"]);
        assert_eq!(cli.csv, PathBuf::from(DATA.default_csv_path));
        assert_eq!(cli.tail, 300);
        assert_eq!(cli.symbol, "AMD");
        assert_eq!(cli.interval, "1D");
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["trade-annotator", "--csv", "btc.csv", "--tail", "50", "--symbol", "BTC"]);
        assert_eq!(cli.csv, PathBuf::from("btc.csv"));
        assert_eq!(cli.tail, 50);
        assert_eq!(cli.symbol, "BTC");
    }
}
