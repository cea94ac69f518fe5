use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use fracview_core::{escape_color, escape_time, Raster, View};

/// Color of screen pixel `(sx, sy)` in `view`.
#[inline]
fn pixel_color(view: &View, sx: u32, sy: u32) -> u32 {
    let n = escape_time(view.pixel_to_complex(sx, sy), view.limit());
    escape_color(n, view.limit())
}

/// Render a view one pixel column at a time, left to right.
///
/// The rows of each column are computed in parallel via Rayon. After every
/// column, `checkpoint(columns_done, total_columns)` is consulted; returning
/// `false` abandons the render and yields `None`. The view's own raster slot
/// is never touched, so publishing the result is up to the caller.
pub fn render_columns<F>(view: &View, mut checkpoint: F) -> Option<Raster>
where
    F: FnMut(u32, u32) -> bool,
{
    let start = Instant::now();
    let (width, height) = (view.h_res(), view.v_res());
    debug!(
        view = view.id(),
        width,
        height,
        limit = view.limit(),
        "Starting column render"
    );

    let mut raster = Raster::new(width, height);
    let mut column = Vec::with_capacity(height as usize);
    for sx in 0..width {
        (0..height)
            .into_par_iter()
            .map(|sy| pixel_color(view, sx, sy))
            .collect_into_vec(&mut column);
        raster.set_column(sx, &column);

        if !checkpoint(sx + 1, width) {
            debug!(view = view.id(), columns_done = sx + 1, "Column render abandoned");
            return None;
        }
    }

    info!(
        view = view.id(),
        elapsed_ms = start.elapsed().as_millis(),
        "Render complete"
    );
    Some(raster)
}
