// Domain types and value objects
mod candle;
mod category;
mod price_series;

#[cfg(test)]
pub(crate) use price_series::fixtures;

// Re-export commonly used types to the world
pub use candle::{Candle, CandleType};
pub use category::{Category, Feature1, Feature2, RegionColor};
pub use price_series::PriceSeries;
