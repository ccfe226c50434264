//! Region draft validation.
//!
//! Rules run in a fixed order and the first failure wins:
//! 1. `start_idx` then `end_idx` present and within `[0, max_idx]`
//! 2. `start_idx < end_idx` (a single-candle span is rejected)
//! 3. `category` present and recognized
//! 4. `key_price` present and finite
//! 5. `feature1` / `feature2`, when given, recognized

use std::str::FromStr;

use crate::domain::{Category, Feature1, Feature2};
use crate::engine::{AnnotationError, AnnotationResult, DraftField};
use crate::models::RegionDraft;

/// A draft that passed every rule, with labels parsed into their enums.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRegion {
    pub start_idx: usize,
    pub end_idx: usize,
    pub category: Category,
    pub feature1: Option<Feature1>,
    pub feature2: Option<Feature2>,
    pub key_price: f64,
    pub tags: String,
    pub notes: String,
}

/// `max_idx` is `None` for an empty series, in which case no index is valid.
pub fn validate(draft: &RegionDraft, max_idx: Option<usize>) -> AnnotationResult<ValidatedRegion> {
    let start_idx = check_index(draft.start_idx, max_idx, DraftField::StartIdx)?;
    let end_idx = check_index(draft.end_idx, max_idx, DraftField::EndIdx)?;

    if start_idx >= end_idx {
        return Err(AnnotationError::invalid(
            DraftField::EndIdx,
            format!(
                "end_idx ({}) must be greater than start_idx ({}); a region spans at least 2 candles",
                end_idx, start_idx
            ),
        ));
    }

    let category = match draft.category.as_deref().map(str::trim) {
        None | Some("") => {
            return Err(AnnotationError::invalid(DraftField::Category, "is required"));
        }
        Some(label) => Category::from_str(label).map_err(|_| {
            AnnotationError::invalid(DraftField::Category, format!("unrecognized category {:?}", label))
        })?,
    };

    let key_price = match draft.key_price {
        None => return Err(AnnotationError::invalid(DraftField::KeyPrice, "is required")),
        Some(p) if !p.is_finite() => {
            return Err(AnnotationError::invalid(
                DraftField::KeyPrice,
                format!("must be a finite number, got {}", p),
            ));
        }
        Some(p) => p,
    };

    let feature1 = parse_optional_label::<Feature1>(draft.feature1.as_deref(), DraftField::Feature1)?;
    // "None" is a picker entry, not a stored feature
    let feature2 = parse_optional_label::<Feature2>(draft.feature2.as_deref(), DraftField::Feature2)?
        .filter(|f| *f != Feature2::Plain);

    Ok(ValidatedRegion {
        start_idx,
        end_idx,
        category,
        feature1,
        feature2,
        key_price,
        tags: draft.tags.clone().unwrap_or_default(),
        notes: draft.notes.clone().unwrap_or_default(),
    })
}

fn check_index(raw: Option<i64>, max_idx: Option<usize>, field: DraftField) -> AnnotationResult<usize> {
    let Some(idx) = raw else {
        return Err(AnnotationError::invalid(field, "is required"));
    };
    let Some(max_idx) = max_idx else {
        return Err(AnnotationError::invalid(
            field,
            "price series is empty; no candle index is valid",
        ));
    };
    if idx < 0 || idx as u64 > max_idx as u64 {
        return Err(AnnotationError::invalid(
            field,
            format!("{} is outside 0..={}", idx, max_idx),
        ));
    }
    Ok(idx as usize)
}

/// Empty or missing labels mean "no feature".
fn parse_optional_label<T: FromStr>(raw: Option<&str>, field: DraftField) -> AnnotationResult<Option<T>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => T::from_str(label)
            .map(Some)
            .map_err(|_| AnnotationError::invalid(field, format!("unrecognized label {:?}", label))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: Option<usize> = Some(299);

    fn bull(start: usize, end: usize) -> RegionDraft {
        RegionDraft::new(start, end, Category::BullishRunUp).with_key_price(150.25)
    }

    fn field_of(result: AnnotationResult<ValidatedRegion>) -> DraftField {
        result.unwrap_err().field().expect("validation error")
    }

    #[test]
    fn test_valid_draft_parses_labels() {
        let draft = bull(10, 20)
            .with_feature1(Feature1::OrderBlock)
            .with_feature2(Feature2::InsideBar)
            .with_tags("  swing, earnings ")
            .with_notes("clean break");
        let v = validate(&draft, MAX).expect("valid");
        assert_eq!((v.start_idx, v.end_idx), (10, 20));
        assert_eq!(v.category, Category::BullishRunUp);
        assert_eq!(v.feature1, Some(Feature1::OrderBlock));
        assert_eq!(v.feature2, Some(Feature2::InsideBar));
        assert_eq!(v.key_price, 150.25);
        assert_eq!(v.tags, "  swing, earnings ", "tags are stored as typed");
        assert_eq!(v.notes, "clean break");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(validate(&bull(0, 299), MAX).is_ok());
        assert_eq!(field_of(validate(&bull(0, 300), MAX)), DraftField::EndIdx);
    }

    #[test]
    fn test_end_past_series_references_end_idx() {
        let err = validate(&bull(295, 310), MAX).unwrap_err();
        assert_eq!(err.field(), Some(DraftField::EndIdx));
        assert!(err.to_string().contains("310"), "got: {}", err);
    }

    #[test]
    fn test_negative_start_is_rejected() {
        let draft = bull(0, 5).with_span(-1, 5);
        assert_eq!(field_of(validate(&draft, MAX)), DraftField::StartIdx);
    }

    #[test]
    fn test_start_checked_before_end() {
        let draft = bull(0, 0).with_span(400, 500);
        assert_eq!(field_of(validate(&draft, MAX)), DraftField::StartIdx);
    }

    #[test]
    fn test_span_must_be_strictly_increasing() {
        for (start, end) in [(20, 20), (21, 20), (299, 0)] {
            let result = validate(&bull(start, end), MAX);
            assert_eq!(field_of(result), DraftField::EndIdx, "span ({}, {})", start, end);
        }
        assert!(validate(&bull(20, 21), MAX).is_ok());
    }

    #[test]
    fn test_ordering_beats_category() {
        let draft = bull(20, 20).with_category_label("Nonsense");
        assert_eq!(field_of(validate(&draft, MAX)), DraftField::EndIdx);
    }

    #[test]
    fn test_unrecognized_category_is_not_defaulted() {
        let draft = bull(1, 5).with_category_label("Sideways");
        let err = validate(&draft, MAX).unwrap_err();
        assert_eq!(err.field(), Some(DraftField::Category));
        assert!(err.to_string().contains("Sideways"));

        let missing = RegionDraft {
            category: None,
            ..bull(1, 5)
        };
        assert_eq!(field_of(validate(&missing, MAX)), DraftField::Category);
    }

    #[test]
    fn test_key_price_must_be_finite() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let draft = bull(1, 5).with_key_price(bad);
            assert_eq!(field_of(validate(&draft, MAX)), DraftField::KeyPrice);
        }
        let missing = RegionDraft {
            key_price: None,
            ..bull(1, 5)
        };
        assert_eq!(field_of(validate(&missing, MAX)), DraftField::KeyPrice);
    }

    #[test]
    fn test_category_beats_key_price() {
        let draft = bull(1, 5).with_category_label("???").with_key_price(f64::NAN);
        assert_eq!(field_of(validate(&draft, MAX)), DraftField::Category);
    }

    #[test]
    fn test_features() {
        let cleared = RegionDraft {
            feature1: Some(String::new()),
            feature2: Some("  ".to_string()),
            ..bull(1, 5)
        };
        let v = validate(&cleared, MAX).expect("blank features are allowed");
        assert_eq!(v.feature1, None);
        assert_eq!(v.feature2, None);

        let bad = RegionDraft {
            feature2: Some("Double Top".to_string()),
            ..bull(1, 5)
        };
        assert_eq!(field_of(validate(&bad, MAX)), DraftField::Feature2);
    }

    #[test]
    fn test_plain_feature2_is_stored_as_absent() {
        let draft = bull(1, 5).with_feature2(Feature2::Plain);
        assert_eq!(validate(&draft, MAX).unwrap().feature2, None);
    }

    #[test]
    fn test_empty_series_rejects_everything() {
        assert_eq!(field_of(validate(&bull(0, 1), None)), DraftField::StartIdx);
    }
}
