use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::cache::RasterCache;
use crate::complex::Complex;
use crate::error::CoreError;
use crate::raster::Raster;
use crate::rect::{PixelRect, WorldRect};

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Cache slot for a view's computed raster.
enum RasterSlot {
    Absent,
    Retained(Arc<Raster>),
    /// The strong reference lives in a [`RasterCache`] and may vanish at any time.
    Evictable(Weak<Raster>),
}

/// One rendering request plus its (possibly evicted) computed raster.
///
/// The request half is immutable: the rectangle the user asked to see
/// (`look`), the rectangle actually rendered (`see`, the look rectangle
/// widened on one axis to match the screen aspect), the screen resolution
/// and the iteration limit. Views are shared as `Arc<View>` and compared by
/// identity, so a resized screen always produces brand-new views.
pub struct View {
    id: u64,
    see: WorldRect,
    look: WorldRect,
    h_res: u32,
    v_res: u32,
    limit: u32,
    slot: Mutex<RasterSlot>,
}

/// Expand `look` symmetrically along its narrower axis so that
/// `width / height == aspect`. Screen pixels are assumed square.
fn aspect_corrected(look: WorldRect, aspect: f64) -> WorldRect {
    let wdx = look.width();
    let wdy = look.height();
    if wdx / wdy < aspect {
        let d = (wdy * aspect - wdx) / 2.0;
        WorldRect::new(look.top, look.bottom, look.left - d, look.right + d)
    } else {
        let d = (wdx / aspect - wdy) / 2.0;
        WorldRect::new(look.top + d, look.bottom - d, look.left, look.right)
    }
}

impl View {
    /// Validate a rendering request and compute its aspect-corrected rectangle.
    ///
    /// Fails with [`CoreError::InvalidScene`] for a non-positive resolution or
    /// iteration limit, and for a look rectangle with no finite positive area.
    pub fn new(h_res: i32, v_res: i32, limit: i32, look: WorldRect) -> crate::Result<Self> {
        if h_res <= 0 || v_res <= 0 {
            return Err(CoreError::InvalidScene {
                reason: format!("resolution must be positive, got {h_res}×{v_res}"),
            });
        }
        if limit <= 0 {
            return Err(CoreError::InvalidScene {
                reason: format!("iteration limit must be positive, got {limit}"),
            });
        }
        if !look.is_proper() {
            return Err(CoreError::InvalidScene {
                reason: format!("look rectangle must be finite with positive extent, got {look:?}"),
            });
        }

        let see = aspect_corrected(look, f64::from(h_res) / f64::from(v_res));
        Ok(Self {
            id: NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed),
            see,
            look,
            h_res: h_res as u32,
            v_res: v_res as u32,
            limit: limit as u32,
            slot: Mutex::new(RasterSlot::Absent),
        })
    }

    /// Process-unique id, for log correlation only.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The rectangle actually rendered.
    pub fn see(&self) -> WorldRect {
        self.see
    }

    /// The rectangle that was asked for.
    pub fn look(&self) -> WorldRect {
        self.look
    }

    pub fn h_res(&self) -> u32 {
        self.h_res
    }

    pub fn v_res(&self) -> u32 {
        self.v_res
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// World point at the centre of screen pixel `(sx, sy)`.
    #[inline]
    pub fn pixel_to_complex(&self, sx: u32, sy: u32) -> Complex {
        let s = &self.see;
        Complex::new(
            s.left + s.width() * f64::from(2 * sx + 1) / (2.0 * f64::from(self.h_res)),
            s.top - s.height() * f64::from(2 * sy + 1) / (2.0 * f64::from(self.v_res)),
        )
    }

    /// The child view for a screen selection on this view.
    ///
    /// Each axis is interpolated linearly across the rendered rectangle;
    /// resolution and iteration limit are inherited. The selection must
    /// already be clipped to the screen and non-empty.
    pub fn zoomed(&self, selection: PixelRect) -> crate::Result<Self> {
        let (st, sl) = (self.see.top, self.see.left);
        let (wdx, wdy) = (self.see.width(), self.see.height());
        let (sdx, sdy) = (f64::from(self.h_res), f64::from(self.v_res));
        let x = f64::from(selection.x);
        let y = f64::from(selection.y);
        let w = f64::from(selection.width);
        let h = f64::from(selection.height);
        let look = WorldRect::new(
            st - y * wdy / sdy,
            st - (y + h) * wdy / sdy,
            sl + x * wdx / sdx,
            sl + (x + w) * wdx / sdx,
        );
        Self::new(self.h_res as i32, self.v_res as i32, self.limit as i32, look)
    }

    /// Same look rectangle and limit at a new resolution, with no raster.
    pub fn resized(&self, h_res: i32, v_res: i32) -> crate::Result<Self> {
        Self::new(h_res, v_res, self.limit as i32, self.look)
    }

    /// The part of this view's raster that shows the look rectangle.
    pub fn visible_rect(&self) -> PixelRect {
        let (iw, ih) = (f64::from(self.h_res), f64::from(self.v_res));
        let (s, l) = (&self.see, &self.look);
        PixelRect::new(
            ((l.left - s.left) * iw / s.width()).round() as i32,
            ((s.top - l.top) * ih / s.height()).round() as i32,
            (l.width() * iw / s.width()).round() as i32,
            (l.height() * ih / s.height()).round() as i32,
        )
    }

    fn lock(&self) -> MutexGuard<'_, RasterSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store the computed raster as retained.
    ///
    /// Fails with [`CoreError::DuplicateResult`] if a retained raster is
    /// already present; only one render may ever publish into a view.
    pub fn set_raster(&self, raster: Raster) -> crate::Result<()> {
        let mut slot = self.lock();
        if matches!(*slot, RasterSlot::Retained(_)) {
            return Err(CoreError::DuplicateResult { view: self.id });
        }
        *slot = RasterSlot::Retained(Arc::new(raster));
        Ok(())
    }

    /// The current raster; an evicted one reads as `None`.
    pub fn raster(&self) -> Option<Arc<Raster>> {
        let mut slot = self.lock();
        match &*slot {
            RasterSlot::Absent => None,
            RasterSlot::Retained(raster) => Some(Arc::clone(raster)),
            RasterSlot::Evictable(weak) => {
                let raster = weak.upgrade();
                if raster.is_none() {
                    *slot = RasterSlot::Absent;
                }
                raster
            }
        }
    }

    pub fn has_raster(&self) -> bool {
        self.raster().is_some()
    }

    /// `true` while the raster is held only through `cache`.
    pub fn is_evictable(&self) -> bool {
        matches!(*self.lock(), RasterSlot::Evictable(_))
    }

    /// Let `cache` decide when the raster may be dropped.
    pub fn mark_evictable(&self, cache: &RasterCache) {
        let mut slot = self.lock();
        let weak = match &*slot {
            RasterSlot::Retained(raster) => {
                cache.admit(Arc::clone(raster));
                Arc::downgrade(raster)
            }
            _ => return,
        };
        *slot = RasterSlot::Evictable(weak);
    }

    /// Pin the raster again if it is still alive. An evicted raster stays absent.
    pub fn mark_retained(&self, cache: &RasterCache) {
        let mut slot = self.lock();
        let upgraded = match &*slot {
            RasterSlot::Evictable(weak) => weak.upgrade(),
            _ => return,
        };
        *slot = match upgraded {
            Some(raster) => {
                cache.release(&raster);
                RasterSlot::Retained(raster)
            }
            None => RasterSlot::Absent,
        };
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("id", &self.id)
            .field("look", &self.look)
            .field("see", &self.see)
            .field("h_res", &self.h_res)
            .field("v_res", &self.v_res)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}
