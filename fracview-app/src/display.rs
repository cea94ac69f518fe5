//! Output port of the navigation controller.
//!
//! Whatever paints the fractal (a window, a terminal, a test recorder) sees the
//! controller only through [`Display`].

use std::sync::Arc;

use tracing::{debug, info};

use fracview_core::{PixelRect, Raster, View};

/// The edit that caused a render to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderAction {
    Startup,
    ZoomIn,
    ZoomOut,
    Reset,
    Cancel,
    Resize,
}

impl RenderAction {
    /// Status line shown next to the progress bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Startup => "Rendering",
            Self::ZoomIn => "Zooming in",
            Self::ZoomOut => "Zooming out",
            Self::Reset => "Resetting",
            Self::Cancel => "Canceling",
            Self::Resize => "Resizing",
        }
    }
}

pub trait Display {
    fn render_started(&mut self, action: RenderAction);

    fn render_progress(&mut self, ratio: f32);

    /// `raster` belongs to `view`; `visible` is the part of it that covers the
    /// view's look rectangle.
    fn display_ready(&mut self, view: &Arc<View>, raster: Arc<Raster>, visible: PixelRect);

    fn cancel_available(&mut self, available: bool);
}

// ---------------------------------------------------------------------------
// Log-backed display for the headless shell
// ---------------------------------------------------------------------------

/// Reports display events through `tracing` and remembers the last image so
/// the shell can export it.
#[derive(Default)]
pub struct LogDisplay {
    shown: Option<(Arc<View>, Arc<Raster>)>,
    progress_step: u32,
}

impl LogDisplay {
    /// The view and raster most recently handed to `display_ready`.
    pub fn shown(&self) -> Option<(&Arc<View>, &Arc<Raster>)> {
        self.shown.as_ref().map(|(v, r)| (v, r))
    }
}

impl Display for LogDisplay {
    fn render_started(&mut self, action: RenderAction) {
        self.progress_step = 0;
        info!("{}...", action.label());
    }

    fn render_progress(&mut self, ratio: f32) {
        // One line per tenth keeps the log readable on wide views.
        let step = (ratio * 10.0) as u32;
        if step > self.progress_step {
            self.progress_step = step;
            info!(percent = step * 10, "Render progress");
        }
    }

    fn display_ready(&mut self, view: &Arc<View>, raster: Arc<Raster>, visible: PixelRect) {
        let look = view.look();
        info!(
            view = view.id(),
            x = visible.x,
            y = visible.y,
            width = visible.width,
            height = visible.height,
            "Showing [{}, {}] x [{}, {}]",
            look.left,
            look.right,
            look.bottom,
            look.top
        );
        self.shown = Some((Arc::clone(view), raster));
    }

    fn cancel_available(&mut self, available: bool) {
        debug!(available, "Cancel availability");
    }
}

// ---------------------------------------------------------------------------
// Recording display for tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[derive(Debug, Clone)]
pub enum DisplayEvent {
    Started(RenderAction),
    Progress(f32),
    /// Only the raster's size is kept, so recording never pins a raster
    /// the cache is meant to evict.
    Ready {
        view: Arc<View>,
        size: (u32, u32),
        visible: PixelRect,
    },
    CancelAvailable(bool),
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub events: Vec<DisplayEvent>,
}

#[cfg(test)]
impl RecordingDisplay {
    /// `true` if the most recent event showed `view`.
    pub fn last_shown_is(&self, view: &Arc<View>) -> bool {
        matches!(self.events.last(), Some(DisplayEvent::Ready { view: v, .. }) if Arc::ptr_eq(v, view))
    }

    pub fn started_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DisplayEvent::Started(_)))
            .count()
    }
}

#[cfg(test)]
impl Display for RecordingDisplay {
    fn render_started(&mut self, action: RenderAction) {
        self.events.push(DisplayEvent::Started(action));
    }

    fn render_progress(&mut self, ratio: f32) {
        self.events.push(DisplayEvent::Progress(ratio));
    }

    fn display_ready(&mut self, view: &Arc<View>, raster: Arc<Raster>, visible: PixelRect) {
        self.events.push(DisplayEvent::Ready {
            view: Arc::clone(view),
            size: (raster.width, raster.height),
            visible,
        });
    }

    fn cancel_available(&mut self, available: bool) {
        self.events.push(DisplayEvent::CancelAvailable(available));
    }
}
