mod marker;
mod region;
mod selection;
mod trade;

pub use marker::MarkerCursor;
pub use region::{Region, RegionDraft, RegionId};
pub use selection::{SelectionState, ViewFilter};
pub use trade::{Trade, TradeId, TradeSummary};
