use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use fracview_core::View;

use crate::error::RenderError;
use crate::renderer::render_columns;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Notification sent from the worker thread to its single consumer.
///
/// For one view, progress ratios never decrease and end in exactly one
/// `Complete`, unless the view is abandoned, in which case the stream simply
/// stops.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    Progress { view: Arc<View>, ratio: f32 },
    Complete { view: Arc<View> },
}

impl WorkerEvent {
    pub fn view(&self) -> &Arc<View> {
        match self {
            Self::Progress { view, .. } | Self::Complete { view } => view,
        }
    }
}

#[derive(Default)]
struct Slot {
    task: Option<Arc<View>>,
    /// Bumped by every `assign` and `abort`. Re-assigning the same view is
    /// still a new assignment.
    generation: u64,
    busy: bool,
    shutdown: bool,
}

#[derive(Default)]
struct Shared {
    slot: Mutex<Slot>,
    wake: Condvar,
    idle: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn assign(&self, view: Arc<View>) -> u64 {
        let mut slot = self.lock();
        slot.task = Some(view);
        slot.generation += 1;
        slot.generation
    }

    fn abort(&self) -> Option<Arc<View>> {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.task.take()
    }

    /// `true` while the assignment made at `generation` is still live.
    fn is_current(&self, generation: u64) -> bool {
        let slot = self.lock();
        !slot.shutdown && slot.task.is_some() && slot.generation == generation
    }

    /// End the run started at `generation`. A newer assignment is left alone.
    fn finish(&self, generation: u64) {
        {
            let mut slot = self.lock();
            if slot.generation == generation {
                slot.task = None;
            }
            slot.busy = false;
        }
        self.idle.notify_all();
    }
}

// ---------------------------------------------------------------------------
// RenderWorker
// ---------------------------------------------------------------------------

/// A single background thread rendering at most one view at a time.
///
/// The controller replaces the current assignment at will; the worker notices
/// at the next column checkpoint and drops what it was doing without
/// publishing anything for the abandoned view.
pub struct RenderWorker {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl RenderWorker {
    /// Spawn the worker thread. Notifications go to `events`; the thread
    /// exits once the receiving side is dropped or on [`shutdown`](Self::shutdown).
    pub fn spawn(events: mpsc::Sender<WorkerEvent>) -> crate::Result<Self> {
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);

        let handle = thread::Builder::new()
            .name("render-worker".into())
            .spawn(move || worker_loop(&worker_shared, &events))
            .map_err(RenderError::Spawn)?;

        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    /// Replace the current assignment with `view` and wake the worker.
    pub fn assign(&self, view: Arc<View>) {
        let id = view.id();
        let generation = self.shared.assign(view);
        debug!(view = id, generation, "Assigning render task");
        self.shared.wake.notify_all();
    }

    /// Clear the current assignment. An in-flight render stops publishing at
    /// its next checkpoint.
    pub fn abort(&self) {
        if let Some(view) = self.shared.abort() {
            debug!(view = view.id(), "Aborting render task");
        }
        self.shared.idle.notify_all();
    }

    /// Point-in-time read of the current assignment.
    pub fn current_task(&self) -> Option<Arc<View>> {
        self.shared.lock().task.clone()
    }

    /// `true` while the thread is inside a render, abandoned or not.
    pub fn is_busy(&self) -> bool {
        self.shared.lock().busy
    }

    /// Block until nothing is assigned and nothing is being computed.
    ///
    /// Returns `false` if `timeout` elapsed first.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let slot = self.shared.lock();
        let (_slot, result) = self
            .shared
            .idle
            .wait_timeout_while(slot, timeout, |s| s.busy || s.task.is_some())
            .unwrap_or_else(PoisonError::into_inner);
        !result.timed_out()
    }

    /// Stop the thread after its current checkpoint and join it.
    pub fn shutdown(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.wake.notify_all();

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Render worker panicked");
            }
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ---------------------------------------------------------------------------
// Worker thread
// ---------------------------------------------------------------------------

fn worker_loop(shared: &Shared, events: &mpsc::Sender<WorkerEvent>) {
    debug!("Render worker started");
    while let Some((task, generation)) = wait_for_task(shared) {
        let connected = run_task(shared, &task, generation, events);
        shared.finish(generation);

        if !connected {
            break;
        }
    }
    debug!("Render worker exiting");
}

fn wait_for_task(shared: &Shared) -> Option<(Arc<View>, u64)> {
    let mut slot = shared.lock();
    loop {
        if slot.shutdown {
            return None;
        }
        if let Some(task) = slot.task.clone() {
            slot.busy = true;
            return Some((task, slot.generation));
        }
        slot = shared
            .wake
            .wait(slot)
            .unwrap_or_else(PoisonError::into_inner);
    }
}

/// Render `task` and publish its result. Returns `false` once the event
/// receiver is gone.
fn run_task(
    shared: &Shared,
    task: &Arc<View>,
    generation: u64,
    events: &mpsc::Sender<WorkerEvent>,
) -> bool {
    let mut connected = true;
    let raster = render_columns(task, |done, total| {
        if !shared.is_current(generation) {
            return false;
        }
        let ratio = done as f32 / total as f32;
        if events
            .send(WorkerEvent::Progress {
                view: Arc::clone(task),
                ratio,
            })
            .is_err()
        {
            connected = false;
            return false;
        }
        true
    });

    let Some(raster) = raster else {
        return connected;
    };

    if let Err(e) = task.set_raster(raster) {
        warn!(view = task.id(), "Discarding render result: {e}");
        return true;
    }

    events
        .send(WorkerEvent::Complete {
            view: Arc::clone(task),
        })
        .is_ok()
}
