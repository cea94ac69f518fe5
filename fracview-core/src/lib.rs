pub mod cache;
pub mod complex;
pub mod error;
pub mod escape;
pub mod raster;
pub mod rect;
pub mod view;

// Re-export primary types for convenience.
pub use cache::RasterCache;
pub use complex::Complex;
pub use error::CoreError;
pub use escape::{escape_color, escape_time};
pub use raster::Raster;
pub use rect::{PixelRect, WorldRect};
pub use view::View;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
