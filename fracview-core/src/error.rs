use thiserror::Error;

/// Errors originating from view construction and the raster cache slot.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid scene: {reason}")]
    InvalidScene { reason: String },

    #[error("view {view} already holds a retained raster")]
    DuplicateResult { view: u64 },
}
