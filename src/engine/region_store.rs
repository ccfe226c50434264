use crate::domain::PriceSeries;
use crate::engine::validator::{ValidatedRegion, validate};
use crate::engine::{AnnotationError, AnnotationResult, AnnotationStore, EntityKind};
use crate::models::{Region, RegionDraft, RegionId, Trade, TradeId};

#[cfg(debug_assertions)]
use crate::config::DF;

/// A missing key price defaults to the close of the end candle.
fn with_default_key_price(draft: &RegionDraft, series: &PriceSeries) -> RegionDraft {
    let mut draft = draft.clone();
    if draft.key_price.is_none() {
        draft.key_price = draft
            .end_idx
            .and_then(|idx| usize::try_from(idx).ok())
            .and_then(|idx| series.close_at(idx));
    }
    draft
}

/// Turns validated values into a stored region. Indices were bounds-checked against this
/// same series, so the timestamp lookups cannot miss.
fn build_region(region_id: RegionId, visible: bool, v: ValidatedRegion, series: &PriceSeries) -> Region {
    Region {
        region_id,
        category: v.category,
        feature1: v.feature1,
        feature2: v.feature2,
        start_idx: v.start_idx,
        end_idx: v.end_idx,
        start_time: series.timestamp_at(v.start_idx).unwrap_or_default().to_string(),
        end_time: series.timestamp_at(v.end_idx).unwrap_or_default().to_string(),
        key_price: v.key_price,
        tags: v.tags,
        notes: v.notes,
        color: v.category.color(),
        visible,
    }
}

fn check_position(trade: &Trade, position: usize) -> AnnotationResult<()> {
    if position >= trade.regions.len() {
        return Err(AnnotationError::PositionOutOfRange {
            trade_id: trade.trade_id,
            position,
            len: trade.regions.len(),
        });
    }
    Ok(())
}

impl AnnotationStore {
    /// Validates `draft` exactly as `add_region` would, without touching any trade.
    pub fn check_draft(&self, draft: &RegionDraft) -> AnnotationResult<ValidatedRegion> {
        let draft = with_default_key_price(draft, &self.series);
        validate(&draft, self.series.max_idx())
    }

    /// Validates `draft` and appends it to the trade. Returns the new region's id.
    pub fn add_region(&mut self, trade_id: TradeId, draft: RegionDraft) -> AnnotationResult<RegionId> {
        self.trade_ref(trade_id)?;

        let validated = self.check_draft(&draft).inspect_err(|_e| {
            #[cfg(debug_assertions)]
            if DF.log_store {
                log::warn!("Rejected region for trade {}: {}", trade_id, _e);
            }
        })?;

        let series = self.series.clone();
        let trade = self.trade_mut(trade_id)?;
        let region_id = trade.allocate_region_id();
        trade
            .regions
            .push(build_region(region_id, true, validated, &series));

        #[cfg(debug_assertions)]
        if DF.log_store {
            log::info!(
                "Added region {} to trade {} ({} regions)",
                region_id,
                trade_id,
                trade.regions.len()
            );
        }
        Ok(region_id)
    }

    /// Replaces the region at list `position`, merging `draft` over the stored values.
    /// The region keeps its id and visibility; times and color are re-derived.
    pub fn update_region(
        &mut self,
        trade_id: TradeId,
        position: usize,
        draft: RegionDraft,
    ) -> AnnotationResult<&Region> {
        let trade = self.trade_ref(trade_id)?;
        check_position(trade, position)?;
        let existing = &trade.regions[position];

        let merged = draft.merged_over(&existing.to_draft());
        let validated = validate(&merged, self.series.max_idx())?;
        let updated = build_region(existing.region_id, existing.visible, validated, &self.series);

        let trade = self.trade_mut(trade_id)?;
        trade.regions[position] = updated;

        #[cfg(debug_assertions)]
        if DF.log_store {
            log::info!("Updated region at position {} of trade {}", position, trade_id);
        }
        Ok(&trade.regions[position])
    }

    /// Removes the region at list `position`. Surviving regions keep their ids.
    pub fn remove_region(&mut self, trade_id: TradeId, position: usize) -> AnnotationResult<Region> {
        let trade = self.trade_mut(trade_id)?;
        check_position(trade, position)?;
        let removed = trade.regions.remove(position);
        self.selection.on_region_removed(trade_id, position);

        #[cfg(debug_assertions)]
        if DF.log_store {
            log::info!("Removed region {} from trade {}", removed.region_id, trade_id);
        }
        Ok(removed)
    }

    pub fn set_region_visible(
        &mut self,
        trade_id: TradeId,
        position: usize,
        visible: bool,
    ) -> AnnotationResult<&Region> {
        let trade = self.trade_mut(trade_id)?;
        check_position(trade, position)?;
        let region = &mut trade.regions[position];
        region.visible = visible;
        Ok(region)
    }

    /// The region at list `position`.
    pub fn region(&self, trade_id: TradeId, position: usize) -> AnnotationResult<&Region> {
        let trade = self.trade_ref(trade_id)?;
        check_position(trade, position)?;
        Ok(&trade.regions[position])
    }

    /// Lookup by the stable region id rather than list position.
    pub fn region_by_id(&self, trade_id: TradeId, region_id: RegionId) -> AnnotationResult<&Region> {
        self.trade_ref(trade_id)?
            .regions
            .iter()
            .find(|r| r.region_id == region_id)
            .ok_or(AnnotationError::NotFound {
                kind: EntityKind::Region,
                id: region_id,
            })
    }
}
