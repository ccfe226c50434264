use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::PriceSeries;
use crate::engine::projection::{Overlay, project};
use crate::engine::{AnnotationError, AnnotationResult};
use crate::models::{SelectionState, Trade, TradeId, ViewFilter};

#[cfg(debug_assertions)]
use crate::config::DF;

/// The session's annotation database: every trade, its regions, and the selection.
///
/// Trade and region operations live in `trade_store.rs` and `region_store.rs`. All of
/// them take `&mut self`, so two mutations can never interleave.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    pub(super) series: Arc<PriceSeries>,
    pub(super) trades: BTreeMap<TradeId, Trade>,
    pub(super) next_trade_id: TradeId,
    pub(super) selection: SelectionState,
}

impl AnnotationStore {
    pub fn new(series: Arc<PriceSeries>) -> Self {
        Self {
            series,
            trades: BTreeMap::new(),
            next_trade_id: 1,
            selection: SelectionState::default(),
        }
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Trades in ascending id order.
    pub fn trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.values()
    }

    /// The currently selected trade, if any.
    pub fn selected_trade(&self) -> Option<&Trade> {
        self.selection
            .selected_trade_id()
            .and_then(|id| self.trades.get(&id))
    }

    /// Overlays for the chart, recomputed from the current state.
    pub fn project(&self) -> Vec<Overlay> {
        let overlays = project(&self.series, self.trades(), &self.selection);
        #[cfg(debug_assertions)]
        if DF.log_projection {
            log::info!("Projection: {} overlays", overlays.len());
        }
        overlays
    }

    pub(super) fn trade_ref(&self, trade_id: TradeId) -> AnnotationResult<&Trade> {
        self.trades
            .get(&trade_id)
            .ok_or(AnnotationError::trade_not_found(trade_id))
    }

    pub(super) fn trade_mut(&mut self, trade_id: TradeId) -> AnnotationResult<&mut Trade> {
        self.trades
            .get_mut(&trade_id)
            .ok_or(AnnotationError::trade_not_found(trade_id))
    }

    // --- SELECTION ---

    pub fn select_trade(&mut self, trade_id: TradeId) -> AnnotationResult<&SelectionState> {
        self.trade_ref(trade_id)?;
        self.selection.select_trade(trade_id);
        self.log_selection("select_trade");
        Ok(&self.selection)
    }

    pub fn clear_selection(&mut self) -> &SelectionState {
        self.selection.clear();
        self.log_selection("clear_selection");
        &self.selection
    }

    /// Selects `trade_id` and opens the region at list `position` for editing.
    pub fn select_region_for_edit(
        &mut self,
        trade_id: TradeId,
        position: usize,
    ) -> AnnotationResult<&SelectionState> {
        let len = self.trade_ref(trade_id)?.regions.len();
        if position >= len {
            return Err(AnnotationError::PositionOutOfRange {
                trade_id,
                position,
                len,
            });
        }
        self.selection.select_trade(trade_id);
        self.selection.edit_region(position);
        self.log_selection("select_region_for_edit");
        Ok(&self.selection)
    }

    pub fn clear_region_edit(&mut self) -> &SelectionState {
        self.selection.clear_region_edit();
        &self.selection
    }

    pub fn set_view_filter(&mut self, view: ViewFilter) -> AnnotationResult<&SelectionState> {
        if let ViewFilter::Trade(id) = view {
            self.trade_ref(id)?;
        }
        self.selection.set_view(view);
        self.log_selection("set_view_filter");
        Ok(&self.selection)
    }

    #[inline]
    fn log_selection(&self, _op: &str) {
        #[cfg(debug_assertions)]
        if DF.log_selection {
            log::info!("SELECTION [{}]: {}", _op, self.selection);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::domain::fixtures::daily_series;
    use crate::engine::EntityKind;
    use crate::models::RegionDraft;

    fn store() -> AnnotationStore {
        AnnotationStore::new(Arc::new(daily_series(300)))
    }

    #[test]
    fn test_select_unknown_trade_fails() {
        let mut store = store();
        let err = store.select_trade(9).unwrap_err();
        assert!(matches!(
            err,
            AnnotationError::NotFound {
                kind: EntityKind::Trade,
                id: 9
            }
        ));
        assert_eq!(store.selection().selected_trade_id(), None);
    }

    #[test]
    fn test_region_edit_requires_trade_and_valid_position() {
        let mut store = store();
        assert!(store.select_region_for_edit(1, 0).is_err());

        let t = store.create_trade("Swing1").unwrap();
        store
            .add_region(t, RegionDraft::new(1, 4, Category::EntryRegion).with_key_price(1.0))
            .unwrap();

        let err = store.select_region_for_edit(t, 1).unwrap_err();
        assert!(matches!(err, AnnotationError::PositionOutOfRange { position: 1, len: 1, .. }));

        store.clear_selection();
        store.select_region_for_edit(t, 0).unwrap();
        assert!(store.selection().is_editing(t, 0));

        store.clear_region_edit();
        assert_eq!(store.selection().editing_region_index(), None);
        assert_eq!(store.selection().selected_trade_id(), Some(t));
    }

    #[test]
    fn test_view_filter_requires_existing_trade() {
        let mut store = store();
        assert!(store.set_view_filter(ViewFilter::Trade(1)).is_err());
        let t = store.create_trade("A").unwrap();
        store.set_view_filter(ViewFilter::Trade(t)).unwrap();
        assert_eq!(store.selection().view(), ViewFilter::Trade(t));
    }

    #[test]
    fn test_selected_trade_lookup() {
        let mut store = store();
        assert!(store.selected_trade().is_none());
        let t = store.create_trade("A").unwrap();
        assert_eq!(store.selected_trade().map(|tr| tr.trade_id), Some(t));
        store.clear_selection();
        assert!(store.selected_trade().is_none());
    }
}
