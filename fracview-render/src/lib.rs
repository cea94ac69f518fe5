pub mod error;
pub mod export;
pub mod renderer;
pub mod worker;

pub use error::RenderError;
pub use export::export_png;
pub use renderer::render_columns;
pub use worker::{RenderWorker, WorkerEvent};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
