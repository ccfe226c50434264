use serde::{Deserialize, Serialize};

use crate::config::MARKERS;
use crate::domain::{Category, PriceSeries};
use crate::models::RegionDraft;

/// The start/end candle markers the user positions before saving a region.
///
/// Always keeps `start_idx < end_idx <= max_idx`, so a draft built from it passes the
/// span rules. A series with fewer than two candles cannot hold a span; the cursor then
/// sits at (0, 0) and `is_usable` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerCursor {
    start_idx: usize,
    end_idx: usize,
    max_idx: usize,
}

impl MarkerCursor {
    pub fn new(max_idx: usize) -> Self {
        let mut cursor = Self {
            start_idx: 0,
            end_idx: 0,
            max_idx,
        };
        cursor.reset();
        cursor
    }

    pub fn for_series(series: &PriceSeries) -> Self {
        Self::new(series.max_idx().unwrap_or(0))
    }

    /// Back to the configured defaults, or the widest valid span if they do not fit.
    pub fn reset(&mut self) {
        if self.max_idx == 0 {
            self.start_idx = 0;
            self.end_idx = 0;
            return;
        }
        if MARKERS.default_end_idx <= self.max_idx {
            self.start_idx = MARKERS.default_start_idx;
            self.end_idx = MARKERS.default_end_idx;
        } else {
            self.start_idx = 0;
            self.end_idx = self.max_idx;
        }
    }

    #[inline]
    pub fn start_idx(&self) -> usize {
        self.start_idx
    }

    #[inline]
    pub fn end_idx(&self) -> usize {
        self.end_idx
    }

    #[inline]
    pub fn max_idx(&self) -> usize {
        self.max_idx
    }

    #[inline]
    pub fn is_usable(&self) -> bool {
        self.start_idx < self.end_idx
    }

    /// Candles covered by the markers, both ends inclusive.
    pub fn region_size(&self) -> usize {
        self.end_idx - self.start_idx + 1
    }

    /// Clamped to `[0, end_idx - 1]`.
    pub fn set_start(&mut self, idx: usize) {
        if !self.is_usable() {
            return;
        }
        self.start_idx = idx.min(self.end_idx - 1);
    }

    /// Clamped to `[start_idx + 1, max_idx]`.
    pub fn set_end(&mut self, idx: usize) {
        if !self.is_usable() {
            return;
        }
        self.end_idx = idx.clamp(self.start_idx + 1, self.max_idx);
    }

    /// Moves both markers at once, e.g. onto a region opened for editing.
    pub fn set_span(&mut self, start_idx: usize, end_idx: usize) {
        if !self.is_usable() {
            return;
        }
        self.end_idx = end_idx.clamp(1, self.max_idx);
        self.start_idx = start_idx.min(self.end_idx - 1);
    }

    pub fn nudge_start(&mut self, delta: i64) {
        let target = (self.start_idx as i64 + delta).max(0) as usize;
        self.set_start(target);
    }

    pub fn nudge_end(&mut self, delta: i64) {
        let target = (self.end_idx as i64 + delta).max(0) as usize;
        self.set_end(target);
    }

    /// Seed a draft from the markers. The key price defaults to the end candle's close.
    pub fn to_draft(&self, series: &PriceSeries, category: Category) -> RegionDraft {
        let draft = RegionDraft::new(self.start_idx, self.end_idx, category);
        match series.close_at(self.end_idx) {
            Some(close) => draft.with_key_price(close),
            None => draft,
        }
    }
}
