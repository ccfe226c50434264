use serde::{Deserialize, Serialize};

// Define the CandleType enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

/// One OHLC bar. `index` is both its position in the series and its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub index: usize,
    pub timestamp: String,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    // A constructor for convenience
    pub fn new(index: usize, timestamp: impl Into<String>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Candle {
            index,
            timestamp: timestamp.into(),
            open,
            high,
            low,
            close,
        }
    }

    // A method to determine the type of candle
    pub fn get_type(&self) -> CandleType {
        if self.close >= self.open {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            CandleType::Bullish => (self.open, self.close),
            CandleType::Bearish => (self.close, self.open),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candle_type_and_body() {
        let up = Candle::new(0, "2024-01-02", 10.0, 12.0, 9.0, 11.5);
        assert_eq!(up.get_type(), CandleType::Bullish);
        assert_eq!(up.body_range(), (10.0, 11.5));

        let down = Candle::new(1, "2024-01-03", 11.5, 11.8, 10.1, 10.4);
        assert_eq!(down.get_type(), CandleType::Bearish);
        assert_eq!(down.body_range(), (10.4, 11.5));
    }

    #[test]
    fn test_doji_counts_as_bullish() {
        let doji = Candle::new(0, "2024-01-02", 10.0, 10.5, 9.5, 10.0);
        assert_eq!(doji.get_type(), CandleType::Bullish);
    }
}
