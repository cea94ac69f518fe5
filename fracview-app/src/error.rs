use thiserror::Error;

use fracview_core::CoreError;
use fracview_render::RenderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid command `{line}`: {reason}")]
    Command { line: String, reason: String },

    #[error("nothing to save: the current view has no raster yet")]
    NothingToSave,
}

pub type Result<T> = std::result::Result<T, AppError>;
