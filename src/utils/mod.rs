mod time_utils;

pub use time_utils::{TimeUtils, format_duration, parse_timestamp, span_ms};
