//! The escape-time engine: iteration counting and the linear palette.

use crate::complex::Complex;

/// Orbits with `|z|² ≥ 4` (that is, `|z| ≥ 2`) are guaranteed to diverge.
pub const BAILOUT_NORM_SQ: f64 = 4.0;

/// Largest packed `0xRRGGBB` value; the palette ramps from black up to it.
pub const WHITE: u32 = 0xFF_FFFF;

/// Returns `true` if `c` lies inside the main cardioid.
#[inline]
fn in_cardioid(c: Complex) -> bool {
    let im2 = c.im * c.im;
    let q = (c.re - 0.25) * (c.re - 0.25) + im2;
    q * (q + (c.re - 0.25)) <= 0.25 * im2
}

/// Returns `true` if `c` lies inside the period-2 bulb.
#[inline]
fn in_period2_bulb(c: Complex) -> bool {
    (c.re + 1.0) * (c.re + 1.0) + c.im * c.im <= 0.0625
}

/// Count iterations of `z ← z² + c` until the orbit escapes or `limit` is hit.
///
/// The orbit starts at `z₁ = c`, which counts as the first iteration, so a
/// point outside the bailout circle reports `1` and a point that never
/// escapes reports `limit`. Points inside the main cardioid or the period-2
/// bulb never escape and are answered without iterating.
pub fn escape_time(c: Complex, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    if in_cardioid(c) || in_period2_bulb(c) {
        return limit;
    }

    let mut z = c;
    let mut n = 1;
    while n < limit && z.norm_sq() < BAILOUT_NORM_SQ {
        z = z.square() + c;
        n += 1;
    }
    n
}

/// Map an iteration count to a packed `0xRRGGBB` color.
///
/// Non-escaping points (and the degenerate `n == 0`) are background black;
/// everything else sits on a linear ramp from black towards white.
#[inline]
pub fn escape_color(n: u32, limit: u32) -> u32 {
    if n == 0 || n >= limit {
        return 0;
    }
    (f64::from(WHITE) / f64::from(limit) * f64::from(n)).round() as u32
}
