use crate::engine::{AnnotationError, AnnotationResult, AnnotationStore, DraftField};
use crate::models::{Trade, TradeId, TradeSummary};

#[cfg(debug_assertions)]
use crate::config::DF;

fn clean_name(name: &str) -> AnnotationResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AnnotationError::invalid(DraftField::Name, "trade name must not be empty"));
    }
    Ok(trimmed.to_string())
}

impl AnnotationStore {
    /// Creates an empty, visible trade and selects it. Ids are never reused.
    pub fn create_trade(&mut self, name: &str) -> AnnotationResult<TradeId> {
        let name = clean_name(name)?;
        let trade_id = self.next_trade_id;
        self.next_trade_id += 1;

        self.trades.insert(trade_id, Trade::new(trade_id, name));
        self.selection.select_trade(trade_id);

        #[cfg(debug_assertions)]
        if DF.log_store {
            log::info!("Created trade {} ({:?})", trade_id, self.trades[&trade_id].name);
        }
        Ok(trade_id)
    }

    /// Removes the trade with all of its regions. Unknown ids are a silent no-op.
    pub fn delete_trade(&mut self, trade_id: TradeId) -> Option<Trade> {
        let removed = self.trades.remove(&trade_id)?;
        self.selection.on_trade_deleted(trade_id);

        #[cfg(debug_assertions)]
        if DF.log_store {
            log::info!(
                "Deleted trade {} with {} regions",
                trade_id,
                removed.regions.len()
            );
        }
        Some(removed)
    }

    /// Region-level flags are left alone; a hidden trade hides all of them at projection.
    pub fn set_trade_visible(&mut self, trade_id: TradeId, visible: bool) -> AnnotationResult<&Trade> {
        let trade = self.trade_mut(trade_id)?;
        trade.visible = visible;
        Ok(trade)
    }

    pub fn rename_trade(&mut self, trade_id: TradeId, name: &str) -> AnnotationResult<&Trade> {
        self.trade_ref(trade_id)?;
        let name = clean_name(name)?;
        let trade = self.trade_mut(trade_id)?;
        trade.name = name;
        Ok(trade)
    }

    /// Summaries in ascending trade id order.
    pub fn list_trades(&self) -> Vec<TradeSummary> {
        self.trades.values().map(Trade::summary).collect()
    }

    pub fn get_trade(&self, trade_id: TradeId) -> AnnotationResult<&Trade> {
        self.trade_ref(trade_id)
    }
}
