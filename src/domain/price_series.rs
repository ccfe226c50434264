use anyhow::{Result, bail};

use crate::domain::Candle;
use crate::utils::parse_timestamp;

/// Immutable, ordered candle sequence. Loaded once, then shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub interval: String,
    candles: Vec<Candle>,
}

impl PriceSeries {
    /// Build a series, checking that `index` equals position and that timestamps
    /// parse and strictly increase.
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>, candles: Vec<Candle>) -> Result<Self> {
        let mut prev = None;
        for (pos, candle) in candles.iter().enumerate() {
            if candle.index != pos {
                bail!("Candle at position {} carries index {}", pos, candle.index);
            }
            let Some(ts) = parse_timestamp(&candle.timestamp) else {
                bail!("Candle {} has unparseable timestamp {:?}", pos, candle.timestamp);
            };
            if let Some(prev_ts) = prev {
                if ts <= prev_ts {
                    bail!(
                        "Timestamps must strictly increase: candle {} ({}) is not after candle {}",
                        pos,
                        candle.timestamp,
                        pos - 1
                    );
                }
            }
            if ![candle.open, candle.high, candle.low, candle.close]
                .iter()
                .all(|p| p.is_finite())
            {
                bail!("Candle {} has a non-finite price", pos);
            }
            prev = Some(ts);
        }

        Ok(Self {
            symbol: symbol.into(),
            interval: interval.into(),
            candles,
        })
    }

    /// Keep only the last `count` candles, re-indexed from 0.
    pub fn tail(self, count: usize) -> Self {
        let skip = self.candles.len().saturating_sub(count);
        let candles = self
            .candles
            .into_iter()
            .skip(skip)
            .enumerate()
            .map(|(index, c)| Candle { index, ..c })
            .collect();
        Self {
            symbol: self.symbol,
            interval: self.interval,
            candles,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Highest valid candle index, `None` for an empty series.
    #[inline]
    pub fn max_idx(&self) -> Option<usize> {
        self.candles.len().checked_sub(1)
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn get(&self, idx: usize) -> Option<&Candle> {
        self.candles.get(idx)
    }

    pub fn timestamp_at(&self, idx: usize) -> Option<&str> {
        self.candles.get(idx).map(|c| c.timestamp.as_str())
    }

    pub fn close_at(&self, idx: usize) -> Option<f64> {
        self.candles.get(idx).map(|c| c.close)
    }

    /// (lowest low, highest high) across the whole series.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        if self.candles.is_empty() {
            return None;
        }
        let (lo, hi) = self
            .candles
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c.low), hi.max(c.high))
            });
        Some((lo, hi))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::{Duration, NaiveDate};

    /// Daily candles starting 2024-01-01, rising by 1.0 per candle from 100.0.
    pub(crate) fn daily_series(count: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        let candles = (0..count)
            .map(|i| {
                let date = start + Duration::days(i as i64);
                let base = 100.0 + i as f64;
                Candle::new(i, date.format("%Y-%m-%d").to_string(), base, base + 2.0, base - 1.0, base + 1.0)
            })
            .collect();
        PriceSeries::new("AMD", "1D", candles).expect("fixture series is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::fixtures::daily_series;

    #[test]
    fn test_lookups() {
        let series = daily_series(300);
        assert_eq!(series.len(), 300);
        assert_eq!(series.max_idx(), Some(299));
        assert_eq!(series.timestamp_at(0), Some("2024-01-01"));
        assert_eq!(series.timestamp_at(10), Some("2024-01-11"));
        assert_eq!(series.close_at(20), Some(121.0));
        assert!(series.get(300).is_none());
    }

    #[test]
    fn test_empty_series_has_no_max_idx() {
        let series = PriceSeries::new("AMD", "1D", vec![]).expect("empty is valid");
        assert!(series.is_empty());
        assert_eq!(series.max_idx(), None);
        assert_eq!(series.price_bounds(), None);
    }

    #[test]
    fn test_rejects_non_contiguous_index() {
        let candles = vec![
            Candle::new(0, "2024-01-01", 1.0, 1.0, 1.0, 1.0),
            Candle::new(2, "2024-01-02", 1.0, 1.0, 1.0, 1.0),
        ];
        assert!(PriceSeries::new("X", "1D", candles).is_err());
    }

    #[test]
    fn test_rejects_non_increasing_timestamps() {
        let candles = vec![
            Candle::new(0, "2024-01-02", 1.0, 1.0, 1.0, 1.0),
            Candle::new(1, "2024-01-02", 1.0, 1.0, 1.0, 1.0),
        ];
        let err = PriceSeries::new("X", "1D", candles).unwrap_err();
        assert!(err.to_string().contains("strictly increase"), "got: {}", err);
    }

    #[test]
    fn test_rejects_nan_price() {
        let candles = vec![Candle::new(0, "2024-01-02", 1.0, f64::NAN, 1.0, 1.0)];
        assert!(PriceSeries::new("X", "1D", candles).is_err());
    }

    #[test]
    fn test_tail_reindexes() {
        let series = daily_series(10).tail(3);
        assert_eq!(series.len(), 3);
        let indices: Vec<usize> = series.candles().iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(series.timestamp_at(0), Some("2024-01-08"));

        let untouched = daily_series(2).tail(300);
        assert_eq!(untouched.len(), 2);
    }

    #[test]
    fn test_price_bounds() {
        let series = daily_series(5);
        assert_eq!(series.price_bounds(), Some((99.0, 106.0)));
    }
}
