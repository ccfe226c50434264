mod error;
mod projection;
mod region_store;
mod store;
mod trade_store;
mod validator;

pub use error::{AnnotationError, AnnotationResult, DraftField, EntityKind};
pub use projection::{Overlay, project};
pub use store::AnnotationStore;
pub use validator::{ValidatedRegion, validate};
