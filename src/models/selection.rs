use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::TradeId;

/// Which trades the chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewFilter {
    #[default]
    All,
    Trade(TradeId),
}

impl ViewFilter {
    #[inline]
    pub fn includes(&self, trade_id: TradeId) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Trade(id) => *id == trade_id,
        }
    }
}

impl fmt::Display for ViewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewFilter::All => write!(f, "All"),
            ViewFilter::Trade(id) => write!(f, "Trade {}", id),
        }
    }
}

/// The trade being worked on and the region (by list position) open for editing.
///
/// Mutated only by `AnnotationStore`, which keeps it pointing at live entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    selected_trade_id: Option<TradeId>,
    editing_region_index: Option<usize>,
    view: ViewFilter,
}

impl SelectionState {
    #[inline]
    pub fn selected_trade_id(&self) -> Option<TradeId> {
        self.selected_trade_id
    }

    /// Only meaningful while `selected_trade_id` is set.
    #[inline]
    pub fn editing_region_index(&self) -> Option<usize> {
        self.selected_trade_id.and(self.editing_region_index)
    }

    #[inline]
    pub fn view(&self) -> ViewFilter {
        self.view
    }

    pub fn is_editing(&self, trade_id: TradeId, position: usize) -> bool {
        self.selected_trade_id == Some(trade_id) && self.editing_region_index() == Some(position)
    }

    /// Switching to a different trade drops the region edit.
    pub(crate) fn select_trade(&mut self, trade_id: TradeId) {
        if self.selected_trade_id != Some(trade_id) {
            self.editing_region_index = None;
        }
        self.selected_trade_id = Some(trade_id);
    }

    pub(crate) fn clear(&mut self) {
        self.selected_trade_id = None;
        self.editing_region_index = None;
    }

    pub(crate) fn edit_region(&mut self, position: usize) {
        self.editing_region_index = Some(position);
    }

    pub(crate) fn clear_region_edit(&mut self) {
        self.editing_region_index = None;
    }

    pub(crate) fn set_view(&mut self, view: ViewFilter) {
        self.view = view;
    }

    pub(crate) fn on_trade_deleted(&mut self, trade_id: TradeId) {
        if self.selected_trade_id == Some(trade_id) {
            self.clear();
        }
        if self.view == ViewFilter::Trade(trade_id) {
            self.view = ViewFilter::All;
        }
    }

    /// Keeps the edit index pointing at the same region after a removal from the list.
    pub(crate) fn on_region_removed(&mut self, trade_id: TradeId, position: usize) {
        if self.selected_trade_id != Some(trade_id) {
            return;
        }
        self.editing_region_index = match self.editing_region_index {
            Some(idx) if idx == position => None,
            Some(idx) if idx > position => Some(idx - 1),
            other => other,
        };
    }
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.selected_trade_id, self.editing_region_index) {
            (None, _) => write!(f, "Selection::None (view {})", self.view),
            (Some(t), None) => write!(f, "Selection::Trade({}) (view {})", t, self.view),
            (Some(t), Some(r)) => {
                write!(f, "Selection::Region(trade={}, pos={}) (view {})", t, r, self.view)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switching_trade_drops_edit() {
        let mut sel = SelectionState::default();
        sel.select_trade(1);
        sel.edit_region(2);
        assert!(sel.is_editing(1, 2));

        sel.select_trade(1);
        assert_eq!(sel.editing_region_index(), Some(2), "reselecting same trade keeps edit");

        sel.select_trade(2);
        assert_eq!(sel.selected_trade_id(), Some(2));
        assert_eq!(sel.editing_region_index(), None);
    }

    #[test]
    fn test_trade_deletion_clears_selection_and_view() {
        let mut sel = SelectionState::default();
        sel.select_trade(4);
        sel.edit_region(0);
        sel.set_view(ViewFilter::Trade(4));

        sel.on_trade_deleted(3);
        assert_eq!(sel.selected_trade_id(), Some(4));

        sel.on_trade_deleted(4);
        assert_eq!(sel.selected_trade_id(), None);
        assert_eq!(sel.editing_region_index(), None);
        assert_eq!(sel.view(), ViewFilter::All);
    }

    #[test]
    fn test_region_removal_shifts_edit_index() {
        let mut sel = SelectionState::default();
        sel.select_trade(1);
        sel.edit_region(3);

        sel.on_region_removed(2, 0);
        assert_eq!(sel.editing_region_index(), Some(3), "other trade untouched");

        sel.on_region_removed(1, 5);
        assert_eq!(sel.editing_region_index(), Some(3));

        sel.on_region_removed(1, 1);
        assert_eq!(sel.editing_region_index(), Some(2));

        sel.on_region_removed(1, 2);
        assert_eq!(sel.editing_region_index(), None);
    }

    #[test]
    fn test_view_filter() {
        assert!(ViewFilter::All.includes(9));
        assert!(ViewFilter::Trade(2).includes(2));
        assert!(!ViewFilter::Trade(2).includes(3));
        assert_eq!(ViewFilter::Trade(2).to_string(), "Trade 2");
    }
}
