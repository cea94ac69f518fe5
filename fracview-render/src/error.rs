use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to spawn render worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("raster is {raster_width}×{raster_height} but the view is {view_width}×{view_height}")]
    SizeMismatch {
        raster_width: u32,
        raster_height: u32,
        view_width: u32,
        view_height: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Encoding(#[from] png::EncodingError),
}
