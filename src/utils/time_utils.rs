use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";

    /// Accepted layouts for candle timestamps, tried in order after RFC 3339.
    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
}

/// Parse a candle timestamp. Accepts RFC 3339, ISO date, ISO datetime (space or `T`),
/// and plain unix seconds.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in TimeUtils::DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, TimeUtils::STANDARD_TIME_FORMAT) {
        return date.and_hms_opt(0, 0, 0);
    }

    // Unix seconds (e.g. TradingView exports "1704153600")
    if let Ok(secs) = s.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc());
    }

    None
}

/// Milliseconds between two parseable timestamps, `None` if either fails to parse.
pub fn span_ms(start: &str, end: &str) -> Option<i64> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    Some((end - start).num_milliseconds())
}

pub fn format_duration(ms: i64) -> String {
    let secs = ms / TimeUtils::MS_IN_S;
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m", mins);
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }
    let months = days / 30;
    if months < 12 {
        return format!("{}M", months);
    }
    let years = months / 12;
    let rem_months = months % 12;
    format!("{}Y {}M", years, rem_months)
}
