//! Pure derivation of chart overlays from the annotation state.

use serde::Serialize;

use crate::domain::{PriceSeries, RegionColor};
use crate::models::{RegionId, SelectionState, Trade, TradeId};

/// One drawable region band: a filled rectangle between two vertical boundary lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub trade_id: TradeId,
    pub region_id: RegionId,
    pub start_idx: usize,
    pub end_idx: usize,
    pub start_time: String,
    pub end_time: String,
    pub key_price: f64,
    pub color: RegionColor,
    pub label: String,
    /// The region currently open for editing
    pub highlighted: bool,
}

/// Overlays for every visible region of every visible trade, in ascending trade id then
/// region insertion order. Later entries draw on top.
///
/// A hidden trade suppresses all of its regions whatever their own flags say. The view
/// filter in `selection` further restricts which trades take part.
pub fn project<'a>(
    series: &PriceSeries,
    trades: impl IntoIterator<Item = &'a Trade>,
    selection: &SelectionState,
) -> Vec<Overlay> {
    let mut trades: Vec<&Trade> = trades
        .into_iter()
        .filter(|t| t.visible && selection.view().includes(t.trade_id))
        .collect();
    trades.sort_by_key(|t| t.trade_id);

    trades
        .into_iter()
        .flat_map(|trade| {
            trade
                .regions
                .iter()
                .enumerate()
                .filter(|(_, r)| r.visible)
                .map(move |(pos, region)| Overlay {
                    trade_id: trade.trade_id,
                    region_id: region.region_id,
                    start_idx: region.start_idx,
                    end_idx: region.end_idx,
                    start_time: series
                        .timestamp_at(region.start_idx)
                        .unwrap_or(&region.start_time)
                        .to_string(),
                    end_time: series
                        .timestamp_at(region.end_idx)
                        .unwrap_or(&region.end_time)
                        .to_string(),
                    key_price: region.key_price,
                    color: region.color,
                    label: region.category.to_string(),
                    highlighted: selection.is_editing(trade.trade_id, pos),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::Category;
    use crate::domain::fixtures::daily_series;
    use crate::engine::AnnotationStore;
    use crate::models::{RegionDraft, ViewFilter};

    fn store() -> AnnotationStore {
        AnnotationStore::new(Arc::new(daily_series(300)))
    }

    #[test]
    fn test_swing_scenario() {
        let mut store = store();
        let t = store.create_trade("Swing1").unwrap();
        assert_eq!(t, 1);

        let r1 = store
            .add_region(t, RegionDraft::new(10, 20, Category::BullishRunUp).with_key_price(150.25))
            .unwrap();
        let r2 = store
            .add_region(t, RegionDraft::new(25, 30, Category::EntryRegion))
            .unwrap();
        assert_eq!((r1, r2), (1, 2));

        {
            let first = store.region(t, 0).unwrap();
            assert_eq!(first.color, RegionColor::Green);
            assert_eq!(first.start_time, store.series().timestamp_at(10).unwrap());
            assert_eq!(first.end_time, store.series().timestamp_at(20).unwrap());
            assert_eq!(store.region(t, 1).unwrap().color, RegionColor::Blue);
        }

        let overlays = store.project();
        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays[0].region_id, 1);
        assert_eq!(overlays[0].label, "Bullish Run-Up");
        assert_eq!((overlays[0].start_idx, overlays[0].end_idx), (10, 20));
        assert_eq!(overlays[0].start_time, "2024-01-11");
        assert_eq!(overlays[1].region_id, 2);
        assert_eq!(overlays[1].color, RegionColor::Blue);
    }

    #[test]
    fn test_hidden_trade_dominates_region_flags() {
        let mut store = store();
        let t1 = store.create_trade("T1").unwrap();
        store.add_region(t1, RegionDraft::new(1, 5, Category::BullishRunUp)).unwrap();
        store.set_trade_visible(t1, false).unwrap();
        assert!(store.region(t1, 0).unwrap().visible);

        let t2 = store.create_trade("T2").unwrap();
        store.add_region(t2, RegionDraft::new(6, 9, Category::EntryRegion)).unwrap();

        let overlays = store.project();
        assert_eq!(overlays.len(), 1);
        assert!(overlays.iter().all(|o| o.trade_id != t1));
    }

    #[test]
    fn test_hidden_region_is_skipped() {
        let mut store = store();
        let t = store.create_trade("T").unwrap();
        store.add_region(t, RegionDraft::new(1, 5, Category::BullishRunUp)).unwrap();
        store.add_region(t, RegionDraft::new(6, 9, Category::BearishRunDown)).unwrap();
        store.set_region_visible(t, 0, false).unwrap();

        let overlays = store.project();
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].region_id, 2);
    }

    #[test]
    fn test_order_is_trade_then_insertion() {
        let mut store = store();
        let a = store.create_trade("A").unwrap();
        let b = store.create_trade("B").unwrap();
        store.add_region(b, RegionDraft::new(1, 2, Category::EntryRegion)).unwrap();
        store.add_region(a, RegionDraft::new(50, 60, Category::EntryRegion)).unwrap();
        store.add_region(a, RegionDraft::new(10, 20, Category::EntryRegion)).unwrap();

        let order: Vec<(TradeId, RegionId)> =
            store.project().iter().map(|o| (o.trade_id, o.region_id)).collect();
        assert_eq!(order, vec![(a, 1), (a, 2), (b, 1)]);

        // Input order does not matter to the pure function
        let reversed: Vec<&Trade> = store.trades().collect::<Vec<_>>().into_iter().rev().collect();
        let again = project(store.series(), reversed, store.selection());
        assert_eq!(again, store.project());
    }

    #[test]
    fn test_view_filter_and_highlight() {
        let mut store = store();
        let a = store.create_trade("A").unwrap();
        let b = store.create_trade("B").unwrap();
        store.add_region(a, RegionDraft::new(1, 2, Category::EntryRegion)).unwrap();
        store.add_region(b, RegionDraft::new(3, 4, Category::EntryRegion)).unwrap();
        store.add_region(b, RegionDraft::new(5, 6, Category::EntryRegion)).unwrap();

        store.select_region_for_edit(b, 1).unwrap();
        store.set_view_filter(ViewFilter::Trade(b)).unwrap();

        let overlays = store.project();
        assert_eq!(overlays.len(), 2);
        assert!(overlays.iter().all(|o| o.trade_id == b));
        assert!(!overlays[0].highlighted);
        assert!(overlays[1].highlighted);
    }

    #[test]
    fn test_empty_store_projects_nothing() {
        assert!(store().project().is_empty());
    }
}
