//! Error taxonomy shared by every edit entry point.

use loam_grid::{GridRect, LayoutError};
use thiserror::Error;

pub type EditResult<T> = Result<T, EditError>;

/// Failures surfaced across the crate boundary. Edits never panic; every
/// rejected input or unavailable resource maps onto one of these.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("{kind} `{name}` not found")]
    NotFound { kind: &'static str, name: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("rect {rect:?} lies outside the terrain extent {extent:?}")]
    OutOfBounds { rect: GridRect, extent: GridRect },

    #[error("terrain storage unavailable: {0}")]
    StorageUnavailable(&'static str),

    #[error("{stage} completed partially: {detail}")]
    PartialFailure { stage: &'static str, detail: String },
}

impl EditError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

impl From<LayoutError> for EditError {
    fn from(err: LayoutError) -> Self {
        Self::InvalidParameter(err.to_string())
    }
}
