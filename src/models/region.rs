use serde::{Deserialize, Serialize};

use crate::domain::{Category, Feature1, Feature2, RegionColor};

pub type RegionId = u32;

/// An annotated candle range inside one trade. Only ever built from a validated draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub region_id: RegionId,
    pub category: Category,
    pub feature1: Option<Feature1>,
    pub feature2: Option<Feature2>,
    pub start_idx: usize,
    pub end_idx: usize,
    // Derived from the series at write time
    pub start_time: String,
    pub end_time: String,
    pub key_price: f64,
    pub tags: String,
    pub notes: String,
    pub color: RegionColor,
    pub visible: bool,
}

impl Region {
    /// Number of candles covered, both ends inclusive.
    pub fn region_size(&self) -> usize {
        self.end_idx - self.start_idx + 1
    }

    /// Trimmed, non-empty entries of the comma-separated tag string.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// A draft carrying every field of this region, e.g. to seed an edit form.
    pub fn to_draft(&self) -> RegionDraft {
        RegionDraft {
            start_idx: Some(self.start_idx as i64),
            end_idx: Some(self.end_idx as i64),
            category: Some(self.category.to_string()),
            feature1: Some(self.feature1.map(|f| f.to_string()).unwrap_or_default()),
            feature2: Some(self.feature2.map(|f| f.to_string()).unwrap_or_default()),
            key_price: Some(self.key_price),
            tags: Some(self.tags.clone()),
            notes: Some(self.notes.clone()),
        }
    }
}

/// Untrusted region input as it comes from the UI.
///
/// Every field is optional: `add_region` requires the span and category, `update_region`
/// keeps the stored value for any `None` field. Labels stay as strings here so that an
/// unrecognized pick is reported by the validator instead of being silently dropped.
/// An empty feature label clears that feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionDraft {
    pub start_idx: Option<i64>,
    pub end_idx: Option<i64>,
    pub category: Option<String>,
    pub feature1: Option<String>,
    pub feature2: Option<String>,
    pub key_price: Option<f64>,
    pub tags: Option<String>,
    pub notes: Option<String>,
}

impl RegionDraft {
    pub fn new(start_idx: usize, end_idx: usize, category: Category) -> Self {
        Self {
            start_idx: Some(start_idx as i64),
            end_idx: Some(end_idx as i64),
            category: Some(category.to_string()),
            ..Default::default()
        }
    }

    pub fn with_span(mut self, start_idx: i64, end_idx: i64) -> Self {
        self.start_idx = Some(start_idx);
        self.end_idx = Some(end_idx);
        self
    }

    pub fn with_category_label(mut self, label: impl Into<String>) -> Self {
        self.category = Some(label.into());
        self
    }

    pub fn with_feature1(mut self, feature: Feature1) -> Self {
        self.feature1 = Some(feature.to_string());
        self
    }

    pub fn with_feature2(mut self, feature: Feature2) -> Self {
        self.feature2 = Some(feature.to_string());
        self
    }

    pub fn with_key_price(mut self, key_price: f64) -> Self {
        self.key_price = Some(key_price);
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Fill every `None` field from `base`. Fields set on `self` win.
    pub fn merged_over(&self, base: &RegionDraft) -> RegionDraft {
        RegionDraft {
            start_idx: self.start_idx.or(base.start_idx),
            end_idx: self.end_idx.or(base.end_idx),
            category: self.category.clone().or_else(|| base.category.clone()),
            feature1: self.feature1.clone().or_else(|| base.feature1.clone()),
            feature2: self.feature2.clone().or_else(|| base.feature2.clone()),
            key_price: self.key_price.or(base.key_price),
            tags: self.tags.clone().or_else(|| base.tags.clone()),
            notes: self.notes.clone().or_else(|| base.notes.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_region() -> Region {
        Region {
            region_id: 3,
            category: Category::BearishRunDown,
            feature1: Some(Feature1::GapDown),
            feature2: None,
            start_idx: 40,
            end_idx: 52,
            start_time: "2024-02-10".to_string(),
            end_time: "2024-02-22".to_string(),
            key_price: 131.5,
            tags: " breakdown, ,earnings ,".to_string(),
            notes: "faded the gap".to_string(),
            color: RegionColor::Red,
            visible: true,
        }
    }

    #[test]
    fn test_region_size_is_inclusive() {
        assert_eq!(sample_region().region_size(), 13);
    }

    #[test]
    fn test_tag_list_skips_blanks() {
        assert_eq!(sample_region().tag_list(), vec!["breakdown", "earnings"]);
    }

    #[test]
    fn test_to_draft_carries_every_field() {
        let draft = sample_region().to_draft();
        assert_eq!(draft.start_idx, Some(40));
        assert_eq!(draft.end_idx, Some(52));
        assert_eq!(draft.category.as_deref(), Some("Bearish Run-Down"));
        assert_eq!(draft.feature1.as_deref(), Some("Gap Down"));
        // Absent feature becomes an explicit "clear"
        assert_eq!(draft.feature2.as_deref(), Some(""));
        assert_eq!(draft.key_price, Some(131.5));
    }

    #[test]
    fn test_merge_prefers_set_fields() {
        let base = sample_region().to_draft();
        let patch = RegionDraft {
            end_idx: Some(60),
            notes: Some("extended".to_string()),
            ..Default::default()
        };
        let merged = patch.merged_over(&base);
        assert_eq!(merged.start_idx, Some(40));
        assert_eq!(merged.end_idx, Some(60));
        assert_eq!(merged.notes.as_deref(), Some("extended"));
        assert_eq!(merged.tags, base.tags);
        assert_eq!(merged.category, base.category);
    }
}
