//! Demonstration integrand.
//!
//! `4 * 1[x^2 + y^2 < 1]` over the unit square integrates to pi. An optional
//! per-call delay imitates an expensive integrand, the regime where
//! concurrent evaluation pays off: total time is roughly
//! `points * delay / workers`.

use std::convert::Infallible;
use std::thread;
use std::time::Duration;

/// Four times the indicator of the unit disc.
#[inline]
pub fn circle4_indicator(x: f64, y: f64) -> f64 {
    if x * x + y * y < 1.0 {
        4.0
    } else {
        0.0
    }
}

/// The quarter-circle integrand, sleeping for `delay` before each call.
pub fn quarter_circle(delay: Duration) -> impl Fn(f64, f64) -> Result<f64, Infallible> + Sync {
    move |x, y| {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        Ok(circle4_indicator(x, y))
    }
}
