use strum_macros::Display;
use thiserror::Error;

use crate::models::TradeId;

/// Draft field a validation failure refers to, so the UI can flag it inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DraftField {
    StartIdx,
    EndIdx,
    Category,
    Feature1,
    Feature2,
    KeyPrice,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntityKind {
    Trade,
    Region,
}

/// Errors returned by store mutators and queries. None of them leave a partial write behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotationError {
    #[error("invalid {field}: {reason}")]
    Validation { field: DraftField, reason: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: u32 },

    #[error("region position {position} out of range for trade {trade_id} ({len} regions)")]
    PositionOutOfRange {
        trade_id: TradeId,
        position: usize,
        len: usize,
    },
}

impl AnnotationError {
    pub(crate) fn invalid(field: DraftField, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn trade_not_found(id: TradeId) -> Self {
        Self::NotFound {
            kind: EntityKind::Trade,
            id,
        }
    }

    /// The offending field, for validation failures.
    pub fn field(&self) -> Option<DraftField> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}

pub type AnnotationResult<T> = Result<T, AnnotationError>;
