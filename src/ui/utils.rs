use std::fmt::Display;

use crate::domain::PriceSeries;
use crate::models::MarkerCursor;
use crate::utils::{format_duration, span_ms};

/// Two decimals for normal equities, more for sub-dollar prices.
pub fn format_price(price: f64) -> String {
    if price.abs() >= 1.0 || price == 0.0 {
        format!("{:.2}", price)
    } else {
        format!("{:.5}", price)
    }
}

pub fn format_candle_count(count: usize) -> String {
    if count == 1 {
        "1 candle".to_string()
    } else {
        format!("{} candles", count)
    }
}

/// Table cell text for an optional feature tag.
pub fn format_feature<T: Display>(feature: Option<T>) -> String {
    feature.map(|f| f.to_string()).unwrap_or_else(|| "-".to_string())
}

/// "start → end" using series timestamps, falling back to raw indices.
pub fn format_span(series: &PriceSeries, start_idx: usize, end_idx: usize) -> String {
    match (series.timestamp_at(start_idx), series.timestamp_at(end_idx)) {
        (Some(start), Some(end)) => format!("{} → {}", start, end),
        _ => format!("#{} → #{}", start_idx, end_idx),
    }
}

/// Size and boundary closes shown under the marker controls.
pub struct RegionInfo {
    pub size: usize,
    pub start_time: String,
    pub end_time: String,
    pub start_close: Option<f64>,
    pub end_close: Option<f64>,
    /// Wall-clock span between the marker candles, e.g. "10d"
    pub duration: Option<String>,
}

impl RegionInfo {
    pub fn from_markers(series: &PriceSeries, markers: &MarkerCursor) -> Self {
        let (start, end) = (markers.start_idx(), markers.end_idx());
        let start_time = series.timestamp_at(start).unwrap_or_default().to_string();
        let end_time = series.timestamp_at(end).unwrap_or_default().to_string();
        let duration = span_ms(&start_time, &end_time).map(format_duration);
        Self {
            size: markers.region_size(),
            start_time,
            end_time,
            start_close: series.close_at(start),
            end_close: series.close_at(end),
            duration,
        }
    }

    /// Close-to-close move across the markers, in percent.
    pub fn change_pct(&self) -> Option<f64> {
        match (self.start_close, self.end_close) {
            (Some(start), Some(end)) if start != 0.0 => Some((end - start) / start * 100.0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::daily_series;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(150.25), "150.25");
        assert_eq!(format_price(0.0), "0.00");
        assert_eq!(format_price(0.123456), "0.12346");
    }

    #[test]
    fn test_candle_count_plural() {
        assert_eq!(format_candle_count(1), "1 candle");
        assert_eq!(format_candle_count(11), "11 candles");
    }

    #[test]
    fn test_feature_cells() {
        use crate::domain::{Feature1, Feature2};
        assert_eq!(format_feature(Some(Feature1::OrderBlock)), "Order Block");
        assert_eq!(format_feature(None::<Feature2>), "-");
    }

    #[test]
    fn test_region_info_from_default_markers() {
        let series = daily_series(300);
        let markers = MarkerCursor::for_series(&series);
        let info = RegionInfo::from_markers(&series, &markers);
        assert_eq!(info.size, 11);
        assert_eq!(info.start_time, "2024-01-11");
        assert_eq!(info.end_time, "2024-01-21");
        assert_eq!(info.start_close, Some(111.0));
        assert_eq!(info.end_close, Some(121.0));
        assert_eq!(info.duration.as_deref(), Some("10d"));
        let pct = info.change_pct().unwrap();
        assert!((pct - 10.0 / 111.0 * 100.0).abs() < 1e-9, "got {}", pct);
    }

    #[test]
    fn test_span_falls_back_to_indices() {
        let series = daily_series(5);
        assert_eq!(format_span(&series, 0, 1), "2024-01-01 → 2024-01-02");
        assert_eq!(format_span(&series, 3, 9), "#3 → #9");
    }
}
