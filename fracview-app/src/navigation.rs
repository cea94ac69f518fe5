//! View stack with one level of undo, driving a single render worker.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use fracview_core::{PixelRect, RasterCache, View, WorldRect};
use fracview_render::{RenderWorker, WorkerEvent};

use crate::display::{Display, RenderAction};

/// Owns the navigation history and decides when the worker has to run.
///
/// All methods run on the control thread. The worker reports back through a
/// channel that is drained by [`poll_events`](Self::poll_events) or
/// [`wait_event`](Self::wait_event); nothing here ever blocks on a render.
pub struct NavigationController<D: Display> {
    /// Bottom is the home view, last is what the user sees.
    stack: Vec<Arc<View>>,
    /// The view popped by the last zoom-out, kept so cancel can restore it.
    discarded: Option<Arc<View>>,
    cancelable: bool,
    size: (i32, i32),
    last_action: RenderAction,
    cache: RasterCache,
    worker: RenderWorker,
    events: Receiver<WorkerEvent>,
    display: D,
}

impl<D: Display> NavigationController<D> {
    /// Build the home view for a `width` × `height` screen and start rendering it.
    pub fn new(
        width: i32,
        height: i32,
        limit: i32,
        home: WorldRect,
        cache_capacity_bytes: usize,
        display: D,
    ) -> crate::Result<Self> {
        let bottom = Arc::new(View::new(width.max(1), height.max(1), limit, home)?);
        let (tx, rx) = mpsc::channel();
        let worker = RenderWorker::spawn(tx)?;
        info!(
            view = bottom.id(),
            width,
            height,
            limit,
            "Navigation controller ready"
        );

        let mut nav = Self {
            stack: vec![bottom],
            discarded: None,
            cancelable: false,
            size: (width, height),
            last_action: RenderAction::Startup,
            cache: RasterCache::new(cache_capacity_bytes),
            worker,
            events: rx,
            display,
        };
        nav.render_check();
        Ok(nav)
    }

    // -- accessors ----------------------------------------------------------

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn top(&self) -> &Arc<View> {
        // The stack is created non-empty and never popped below one entry.
        &self.stack[self.stack.len() - 1]
    }

    pub fn discarded(&self) -> Option<&Arc<View>> {
        self.discarded.as_ref()
    }

    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    /// `true` while the worker is computing the top view.
    pub fn is_rendering(&self) -> bool {
        let top = self.top();
        !top.has_raster()
            && self
                .worker
                .current_task()
                .is_some_and(|task| Arc::ptr_eq(&task, top))
    }

    pub fn size(&self) -> (i32, i32) {
        self.size
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn cache(&self) -> &RasterCache {
        &self.cache
    }

    // -- navigation ---------------------------------------------------------

    /// Push the view for `selection` (screen pixels on the current top).
    ///
    /// The selection is clipped to the screen; an empty one is ignored.
    pub fn zoom_in(&mut self, selection: PixelRect) -> crate::Result<()> {
        let previous = Arc::clone(self.top());
        let selection = selection.clamp_to(previous.h_res(), previous.v_res());
        if selection.is_empty() {
            debug!(?selection, "Ignoring empty selection");
            return Ok(());
        }

        let child = Arc::new(previous.zoomed(selection)?);
        info!(
            from = previous.id(),
            to = child.id(),
            depth = self.stack.len() + 1,
            "Zoom in"
        );
        self.stack.push(child);
        self.discarded = None;
        self.cancelable = true;
        self.last_action = RenderAction::ZoomIn;
        self.render_check();
        previous.mark_evictable(&self.cache);
        Ok(())
    }

    /// Pop the top view, remembering it for [`cancel`](Self::cancel).
    pub fn zoom_out(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(popped) = self.stack.pop() else {
            return;
        };
        info!(
            from = popped.id(),
            to = self.top().id(),
            depth = self.stack.len(),
            "Zoom out"
        );
        self.discarded = Some(Arc::clone(&popped));
        self.cancelable = true;
        self.top().mark_retained(&self.cache);
        self.last_action = RenderAction::ZoomOut;
        self.render_check();
        popped.mark_evictable(&self.cache);
    }

    /// Drop everything above the home view.
    pub fn reset(&mut self) {
        info!(depth = self.stack.len(), "Reset");
        self.stack.truncate(1);
        self.discarded = None;
        self.cancelable = false;
        self.top().mark_retained(&self.cache);
        // Only the home view is reachable now, and it is retained.
        self.cache.reclaim();
        self.last_action = RenderAction::Reset;
        self.render_check();
    }

    /// Undo the last zoom while its render is still running.
    pub fn cancel(&mut self) {
        if !self.cancelable {
            return;
        }
        match self.discarded.take() {
            Some(view) => {
                info!(view = view.id(), "Cancel zoom out");
                view.mark_retained(&self.cache);
                self.stack.push(view);
            }
            None => {
                if self.stack.len() > 1 {
                    if let Some(dropped) = self.stack.pop() {
                        info!(view = dropped.id(), "Cancel zoom in");
                    }
                }
                self.top().mark_retained(&self.cache);
            }
        }
        self.worker.abort();
        self.cancelable = false;
        self.last_action = RenderAction::Cancel;
        self.render_check();
    }

    /// Rebuild every view for a new screen size. Old rasters are dropped.
    pub fn resize(&mut self, width: i32, height: i32) -> crate::Result<()> {
        if (width, height) == self.size {
            return Ok(());
        }
        let (h_res, v_res) = (width.max(1), height.max(1));
        let stack = self
            .stack
            .iter()
            .map(|view| view.resized(h_res, v_res).map(Arc::new))
            .collect::<fracview_core::Result<Vec<_>>>()?;
        let discarded = self
            .discarded
            .as_ref()
            .map(|view| view.resized(h_res, v_res).map(Arc::new))
            .transpose()?;

        self.stack = stack;
        self.discarded = discarded;
        self.size = (width, height);
        // Every cached raster belongs to a view that was just replaced.
        self.cache.reclaim();
        info!(width, height, depth = self.stack.len(), "Resize");
        self.last_action = RenderAction::Resize;
        self.render_check();
        Ok(())
    }

    /// Show the top view if it has a raster, otherwise make sure it is being rendered.
    fn render_check(&mut self) {
        let top = Arc::clone(self.top());
        match top.raster() {
            None => {
                let task = self.worker.current_task();
                if task.as_ref().is_some_and(|task| Arc::ptr_eq(task, &top)) {
                    return;
                }
                if self.size.0 <= 0 || self.size.1 <= 0 {
                    if task.is_some() {
                        // Nothing can be shown, and the old task is off the stack.
                        self.worker.abort();
                    }
                    return;
                }
                debug!(view = top.id(), action = ?self.last_action, "Starting render");
                self.display.render_started(self.last_action);
                self.display.cancel_available(self.cancelable);
                self.worker.assign(top);
            }
            Some(raster) => {
                self.cancelable = false;
                if self.worker.current_task().is_some() {
                    // Only the top is ever assigned, and the top is done.
                    self.worker.abort();
                }
                self.display.cancel_available(false);
                let visible = top.visible_rect();
                self.display.display_ready(&top, raster, visible);
            }
        }
    }

    // -- worker notifications -----------------------------------------------

    fn handle_event(&mut self, event: WorkerEvent) {
        if !Arc::ptr_eq(event.view(), self.top()) {
            debug!(view = event.view().id(), "Ignoring notification for stale view");
            return;
        }
        match event {
            WorkerEvent::Progress { ratio, .. } => self.display.render_progress(ratio),
            WorkerEvent::Complete { view } => {
                debug!(view = view.id(), "Render finished");
                self.render_check();
            }
        }
    }

    /// Handle every notification already queued. Returns how many there were.
    pub fn poll_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Block for at most `timeout` waiting for one notification.
    ///
    /// Returns `false` on timeout.
    pub fn wait_event(&mut self, timeout: Duration) -> bool {
        match self.events.recv_timeout(timeout) {
            Ok(event) => {
                self.handle_event(event);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("Render worker channel closed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::display::{DisplayEvent, RecordingDisplay};

    const TIMEOUT: Duration = Duration::from_secs(60);

    fn controller(side: i32, limit: i32, cache_bytes: usize) -> NavigationController<RecordingDisplay> {
        NavigationController::new(
            side,
            side,
            limit,
            WorldRect::default(),
            cache_bytes,
            RecordingDisplay::default(),
        )
        .unwrap()
    }

    /// A home view inside the period-3 bulb: every pixel runs to the full
    /// limit and no interior shortcut applies, so it takes a long time.
    fn slow_controller() -> NavigationController<RecordingDisplay> {
        NavigationController::new(
            64,
            64,
            200_000,
            WorldRect::new(0.76, 0.73, -0.135, -0.11),
            RasterCache::DEFAULT_CAPACITY_BYTES,
            RecordingDisplay::default(),
        )
        .unwrap()
    }

    /// Pump notifications until the top view has been shown.
    fn settle(nav: &mut NavigationController<RecordingDisplay>) {
        let deadline = Instant::now() + TIMEOUT;
        loop {
            nav.poll_events();
            if nav.display().last_shown_is(nav.top()) {
                return;
            }
            assert!(Instant::now() < deadline, "top view was never displayed");
            nav.wait_event(Duration::from_millis(50));
        }
    }

    /// Make the worker go quiet, then drain what it sent.
    fn drain(nav: &mut NavigationController<RecordingDisplay>) {
        assert!(nav.worker.wait_idle(TIMEOUT));
        nav.poll_events();
    }

    #[test]
    fn startup_renders_home_view() {
        let mut nav = controller(48, 200, RasterCache::DEFAULT_CAPACITY_BYTES);
        assert_eq!(nav.depth(), 1);
        assert!(matches!(
            nav.display().events.first(),
            Some(DisplayEvent::Started(RenderAction::Startup))
        ));

        settle(&mut nav);
        assert!(nav.top().has_raster());
        assert!(!nav.is_rendering());
        assert!(!nav.is_cancelable());
        assert!(matches!(
            nav.display().events.last(),
            Some(DisplayEvent::Ready { size: (48, 48), .. })
        ));
    }

    #[test]
    fn zoom_in_scenario() {
        let mut nav = controller(300, 5000, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let a = Arc::clone(nav.top());

        nav.zoom_in(PixelRect::new(100, 100, 50, 50)).unwrap();
        assert_eq!(nav.depth(), 2);
        assert!(nav.is_cancelable());
        assert!(matches!(
            nav.display().events.last(),
            Some(DisplayEvent::CancelAvailable(true))
        ));
        assert!(a.is_evictable());
        assert!(nav.discarded().is_none());

        let b = Arc::clone(nav.top());
        let look = b.look();
        let third = 4.0 / 3.0;
        assert!((look.top - (2.0 - third)).abs() < 1e-12);
        assert!((look.bottom - (2.0 - 150.0 * 4.0 / 300.0)).abs() < 1e-12);
        assert!((look.left - (-2.0 + third)).abs() < 1e-12);
        assert!((look.right - (-2.0 + 150.0 * 4.0 / 300.0)).abs() < 1e-12);
        assert_eq!(b.limit(), 5000);

        settle(&mut nav);
        match nav.display().events.last() {
            Some(DisplayEvent::Ready {
                view,
                size,
                visible,
            }) => {
                assert!(Arc::ptr_eq(view, &b));
                assert_eq!(*size, (300, 300));
                assert_eq!(*visible, PixelRect::new(0, 0, 300, 300));
            }
            other => panic!("expected B to be displayed, got {other:?}"),
        }
        assert!(!nav.is_cancelable());
    }

    #[test]
    fn empty_selection_is_ignored() {
        let mut nav = controller(32, 100, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        nav.zoom_in(PixelRect::new(10, 10, 0, 5)).unwrap();
        nav.zoom_in(PixelRect::new(40, 40, 10, 10)).unwrap();
        assert_eq!(nav.depth(), 1);
        assert!(!nav.is_cancelable());
    }

    #[test]
    fn selection_is_clamped_to_screen() {
        let mut nav = controller(40, 100, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        nav.zoom_in(PixelRect::new(20, -10, 100, 30)).unwrap();
        let look = nav.top().look();
        // (20, 0, 20, 20) on a 4x4 world square.
        assert!((look.left - 0.0).abs() < 1e-12);
        assert!((look.right - 2.0).abs() < 1e-12);
        assert!((look.top - 2.0).abs() < 1e-12);
        assert!((look.bottom - 0.0).abs() < 1e-12);
    }

    #[test]
    fn zoom_in_then_cancel_restores_previous_top() {
        let mut nav = controller(64, 500, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let a = Arc::clone(nav.top());
        let started = nav.display().started_count();

        nav.zoom_in(PixelRect::new(8, 8, 16, 16)).unwrap();
        let b = Arc::clone(nav.top());
        nav.cancel();

        assert_eq!(nav.depth(), 1);
        assert!(Arc::ptr_eq(nav.top(), &a));
        assert!(a.has_raster());
        assert!(!a.is_evictable());
        assert!(!nav.is_cancelable());
        assert!(nav.display().last_shown_is(&a));
        assert_eq!(
            nav.display().started_count(),
            started + 1,
            "only the zoom itself started a render"
        );

        drain(&mut nav);
        assert!(nav.display().last_shown_is(&a), "stale notifications for B are ignored");
        assert!(!nav
            .display()
            .events
            .iter()
            .any(|e| matches!(e, DisplayEvent::Ready { view, .. } if Arc::ptr_eq(view, &b))));
    }

    #[test]
    fn zoom_out_then_cancel_restores_popped_view() {
        let mut nav = controller(40, 300, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let a = Arc::clone(nav.top());
        nav.zoom_in(PixelRect::new(10, 10, 20, 20)).unwrap();
        settle(&mut nav);
        let b = Arc::clone(nav.top());

        // Memory pressure takes A's raster, so zooming out has to render.
        nav.cache().reclaim();
        assert!(!a.has_raster());

        nav.zoom_out();
        assert!(Arc::ptr_eq(nav.top(), &a));
        assert!(Arc::ptr_eq(nav.discarded().unwrap(), &b));
        assert!(nav.is_cancelable());
        assert!(b.is_evictable());

        nav.cancel();
        assert_eq!(nav.depth(), 2);
        assert!(Arc::ptr_eq(nav.top(), &b));
        assert!(nav.discarded().is_none());
        assert!(b.has_raster());
        assert!(!b.is_evictable());
        assert!(nav.display().last_shown_is(&b));
        assert!(nav.worker.current_task().is_none());
    }

    #[test]
    fn zoom_out_to_cached_view_is_immediate() {
        let mut nav = controller(40, 300, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let a = Arc::clone(nav.top());
        nav.zoom_in(PixelRect::new(0, 0, 20, 20)).unwrap();
        settle(&mut nav);
        let started = nav.display().started_count();

        nav.zoom_out();
        assert!(nav.display().last_shown_is(&a));
        assert!(!nav.is_cancelable(), "nothing left to cancel");
        assert_eq!(nav.display().started_count(), started);
        assert!(!a.is_evictable());

        nav.cancel();
        assert_eq!(nav.depth(), 1, "cancel is a no-op once displayed");
    }

    #[test]
    fn zoom_out_at_home_is_noop() {
        let mut nav = controller(24, 100, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let events = nav.display().events.len();
        nav.zoom_out();
        assert_eq!(nav.depth(), 1);
        assert!(nav.discarded().is_none());
        assert_eq!(nav.display().events.len(), events);
    }

    #[test]
    fn evicted_view_is_rendered_again_on_cancel() {
        // A zero-capacity cache evicts everything it is offered.
        let mut nav = controller(32, 200, 0);
        settle(&mut nav);
        let a = Arc::clone(nav.top());

        nav.zoom_in(PixelRect::new(4, 4, 8, 8)).unwrap();
        assert!(!a.has_raster());

        nav.cancel();
        assert!(Arc::ptr_eq(nav.top(), &a));
        assert!(matches!(
            nav.display().events.iter().rev().find(|e| matches!(e, DisplayEvent::Started(_))),
            Some(DisplayEvent::Started(RenderAction::Cancel))
        ));
        settle(&mut nav);
        assert!(a.has_raster());
    }

    #[test]
    fn reset_returns_home() {
        let mut nav = controller(40, 200, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let a = Arc::clone(nav.top());
        nav.zoom_in(PixelRect::new(0, 0, 20, 20)).unwrap();
        settle(&mut nav);
        nav.zoom_in(PixelRect::new(0, 0, 20, 20)).unwrap();
        settle(&mut nav);
        nav.zoom_out();
        assert!(nav.discarded().is_some());

        nav.reset();
        assert_eq!(nav.depth(), 1);
        assert!(Arc::ptr_eq(nav.top(), &a));
        assert!(nav.discarded().is_none());
        assert!(!nav.is_cancelable());
        assert!(!a.is_evictable());
        assert!(nav.display().last_shown_is(&a));
    }

    #[test]
    fn reset_while_rendering_abandons_the_zoom() {
        let mut nav = controller(48, 20_000, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let a = Arc::clone(nav.top());
        nav.zoom_in(PixelRect::new(10, 10, 20, 20)).unwrap();
        let b = Arc::clone(nav.top());

        nav.reset();
        assert!(Arc::ptr_eq(nav.top(), &a));
        assert!(nav.worker.current_task().is_none());
        drain(&mut nav);
        assert!(nav.display().last_shown_is(&a));
        assert!(!nav
            .display()
            .events
            .iter()
            .any(|e| matches!(e, DisplayEvent::Ready { view, .. } if Arc::ptr_eq(view, &b))));
    }

    #[test]
    fn resize_rebuilds_every_view() {
        let mut nav = controller(40, 200, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        nav.zoom_in(PixelRect::new(0, 0, 20, 20)).unwrap();
        settle(&mut nav);
        nav.zoom_in(PixelRect::new(0, 0, 20, 20)).unwrap();
        settle(&mut nav);
        nav.zoom_out();
        let old_stack = nav.stack.clone();
        let old_discarded = Arc::clone(nav.discarded().unwrap());

        nav.resize(64, 48).unwrap();
        assert_eq!(nav.size(), (64, 48));
        assert_eq!(nav.depth(), 2);
        for (old, new) in old_stack.iter().zip(&nav.stack) {
            assert!(!Arc::ptr_eq(old, new));
            assert_eq!(old.look(), new.look());
            assert_eq!((new.h_res(), new.v_res()), (64, 48));
        }
        assert!(!nav.stack[0].has_raster());
        let discarded = nav.discarded().unwrap();
        assert!(!Arc::ptr_eq(discarded, &old_discarded));
        assert!(!discarded.has_raster());
        assert_eq!((discarded.h_res(), discarded.v_res()), (64, 48));

        assert!(matches!(
            nav.display().events.iter().rev().find(|e| matches!(e, DisplayEvent::Started(_))),
            Some(DisplayEvent::Started(RenderAction::Resize))
        ));
        assert!(nav.top().has_raster() || nav.is_rendering());

        settle(&mut nav);
        assert!(matches!(
            nav.display().events.last(),
            Some(DisplayEvent::Ready { size: (64, 48), .. })
        ));
    }

    #[test]
    fn resize_to_same_size_is_noop() {
        let mut nav = controller(32, 100, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let top = Arc::clone(nav.top());
        let events = nav.display().events.len();
        nav.resize(32, 32).unwrap();
        assert!(Arc::ptr_eq(nav.top(), &top));
        assert_eq!(nav.display().events.len(), events);
    }

    #[test]
    fn zero_size_defers_rendering() {
        let mut nav = controller(32, 100, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let started = nav.display().started_count();

        nav.resize(0, 20).unwrap();
        assert_eq!((nav.top().h_res(), nav.top().v_res()), (1, 20));
        assert_eq!(nav.display().started_count(), started);
        assert!(!nav.is_rendering());

        nav.resize(16, 20).unwrap();
        assert_eq!(nav.display().started_count(), started + 1);
        settle(&mut nav);
    }

    #[test]
    fn progress_is_forwarded_for_top_only() {
        let mut nav = controller(40, 200, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let progress: Vec<f32> = nav
            .display()
            .events
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::Progress(r) => Some(*r),
                _ => None,
            })
            .collect();
        assert_eq!(progress.len(), 40);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn cancel_without_pending_zoom_is_noop() {
        let mut nav = controller(24, 100, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let events = nav.display().events.len();
        nav.cancel();
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.display().events.len(), events);
    }

    #[test]
    fn zoom_in_after_zoom_out_forgets_the_undo() {
        let mut nav = controller(40, 200, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let a = Arc::clone(nav.top());
        nav.zoom_in(PixelRect::new(0, 0, 20, 20)).unwrap();
        settle(&mut nav);
        nav.zoom_out();
        assert!(nav.discarded().is_some());

        nav.zoom_in(PixelRect::new(20, 20, 20, 20)).unwrap();
        assert!(nav.discarded().is_none());
        assert_eq!(nav.depth(), 2);

        // Cancel undoes the new zoom, not the earlier zoom-out.
        nav.cancel();
        assert_eq!(nav.depth(), 1);
        assert!(Arc::ptr_eq(nav.top(), &a));
        assert!(a.has_raster());
        assert!(nav.display().last_shown_is(&a));
    }

    #[test]
    fn shrinking_to_zero_abandons_the_running_render() {
        let mut nav = slow_controller();
        let old_top = Arc::clone(nav.top());
        assert!(nav.is_rendering());

        nav.resize(0, 48).unwrap();
        assert!(!Arc::ptr_eq(nav.top(), &old_top));
        assert!(nav.worker.current_task().is_none());
        assert!(!nav.is_rendering());
        drain(&mut nav);
        assert!(!old_top.has_raster());
    }

    #[test]
    fn resize_releases_cached_rasters() {
        let mut nav = controller(40, 200, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        nav.zoom_in(PixelRect::new(0, 0, 20, 20)).unwrap();
        settle(&mut nav);
        assert_eq!(nav.cache().len(), 1);

        nav.resize(48, 40).unwrap();
        assert!(nav.cache().is_empty());
        assert_eq!(nav.cache().bytes(), 0);
    }

    #[test]
    fn reset_releases_cached_rasters() {
        let mut nav = controller(40, 200, RasterCache::DEFAULT_CAPACITY_BYTES);
        settle(&mut nav);
        let a = Arc::clone(nav.top());
        nav.zoom_in(PixelRect::new(0, 0, 20, 20)).unwrap();
        settle(&mut nav);
        nav.zoom_in(PixelRect::new(0, 0, 20, 20)).unwrap();
        settle(&mut nav);
        assert_eq!(nav.cache().len(), 2);

        nav.reset();
        assert!(nav.cache().is_empty());
        assert!(a.has_raster(), "the home view is retained, not cached");
        assert!(nav.display().last_shown_is(&a));
    }
}
