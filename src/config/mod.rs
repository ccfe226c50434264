//! Configuration module for the annotator.

mod data;
mod debug;
mod persistence;

// Can't be private because we don't re-export it
pub mod plot;

// Re-export commonly used items
pub use data::{DATA, DataConfig, MARKERS, MarkerConfig};
pub use debug::DF;
pub use persistence::PERSISTENCE;
