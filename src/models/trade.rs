use serde::{Deserialize, Serialize};

use crate::models::{Region, RegionId};

pub type TradeId = u32;

/// A named group of regions. `regions` is kept in insertion order, which is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub name: String,
    pub regions: Vec<Region>,
    pub visible: bool,
    next_region_id: RegionId,
}

impl Trade {
    pub(crate) fn new(trade_id: TradeId, name: String) -> Self {
        Self {
            trade_id,
            name,
            regions: Vec::new(),
            visible: true,
            next_region_id: 1,
        }
    }

    /// The id the next added region will receive.
    pub fn next_region_id(&self) -> RegionId {
        self.next_region_id
    }

    /// Hands out the next region id. Ids are never handed out twice, even after removals.
    pub(crate) fn allocate_region_id(&mut self) -> RegionId {
        let id = self.next_region_id;
        self.next_region_id += 1;
        id
    }

    pub fn summary(&self) -> TradeSummary {
        TradeSummary {
            trade_id: self.trade_id,
            name: self.name.clone(),
            region_count: self.regions.len(),
            visible: self.visible,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub trade_id: TradeId,
    pub name: String,
    pub region_count: usize,
    pub visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trade_defaults() {
        let trade = Trade::new(7, "Swing1".to_string());
        assert!(trade.visible);
        assert!(trade.regions.is_empty());
        assert_eq!(trade.next_region_id(), 1);
        assert_eq!(
            trade.summary(),
            TradeSummary {
                trade_id: 7,
                name: "Swing1".to_string(),
                region_count: 0,
                visible: true,
            }
        );
    }

    #[test]
    fn test_region_ids_are_never_reissued() {
        let mut trade = Trade::new(1, "T".to_string());
        assert_eq!(trade.allocate_region_id(), 1);
        assert_eq!(trade.allocate_region_id(), 2);
        assert_eq!(trade.allocate_region_id(), 3);
        assert_eq!(trade.next_region_id(), 4);
    }
}
