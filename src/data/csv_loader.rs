use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use crate::domain::{Candle, PriceSeries};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Header names accepted for each column (compared lowercase).
const TIME_HEADERS: &[&str] = &["time", "timestamp", "date", "datetime"];
const OPEN_HEADERS: &[&str] = &["open"];
const HIGH_HEADERS: &[&str] = &["high"];
const LOW_HEADERS: &[&str] = &["low"];
const CLOSE_HEADERS: &[&str] = &["close"];

struct ColumnMap {
    time: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |names: &[&str]| -> Result<usize> {
            lower
                .iter()
                .position(|h| names.contains(&h.as_str()))
                .ok_or_else(|| anyhow!("CSV is missing a {:?} column (headers: {:?})", names[0], lower))
        };
        Ok(Self {
            time: find(TIME_HEADERS)?,
            open: find(OPEN_HEADERS)?,
            high: find(HIGH_HEADERS)?,
            low: find(LOW_HEADERS)?,
            close: find(CLOSE_HEADERS)?,
        })
    }
}

fn parse_price(record: &csv::StringRecord, col: usize, name: &str, row: usize) -> Result<f64> {
    let raw = record
        .get(col)
        .ok_or_else(|| anyhow!("Row {}: missing {} value", row, name))?;
    raw.trim()
        .parse::<f64>()
        .with_context(|| format!("Row {}: invalid {} value {:?}", row, name, raw))
}

/// Parse `time,open,high,low,close` rows (extra columns ignored), keep the last `tail`
/// rows, and index them from 0.
pub fn series_from_reader<R: Read>(
    reader: R,
    symbol: &str,
    interval: &str,
    tail: usize,
) -> Result<PriceSeries> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(csv_reader.headers()?)?;

    let mut rows = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        // +2: header line plus 1-based numbering
        let row = i + 2;
        let record = result.with_context(|| format!("Row {}: unreadable CSV record", row))?;
        let time = record
            .get(columns.time)
            .ok_or_else(|| anyhow!("Row {}: missing time value", row))?
            .to_string();
        rows.push((
            time,
            parse_price(&record, columns.open, "open", row)?,
            parse_price(&record, columns.high, "high", row)?,
            parse_price(&record, columns.low, "low", row)?,
            parse_price(&record, columns.close, "close", row)?,
        ));
    }

    if rows.is_empty() {
        bail!("CSV contains no candle rows");
    }

    #[cfg(debug_assertions)]
    let total = rows.len();
    let candles: Vec<Candle> = rows
        .into_iter()
        .enumerate()
        .map(|(index, (time, open, high, low, close))| Candle::new(index, time, open, high, low, close))
        .collect();
    let series = PriceSeries::new(symbol, interval, candles)?.tail(tail);

    #[cfg(debug_assertions)]
    if DF.log_data {
        log::info!(
            "Parsed {} candles for {} {} (skipped {} older rows)",
            series.len(),
            symbol,
            interval,
            total - series.len()
        );
    }

    Ok(series)
}

pub fn load_series_from_csv<P: AsRef<Path>>(
    path: P,
    symbol: &str,
    interval: &str,
    tail: usize,
) -> Result<PriceSeries> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open price CSV: {}", path.display()))?;
    series_from_reader(file, symbol, interval, tail)
        .with_context(|| format!("Failed to load price series from {}", path.display()))
}
