//! Two-stage explicit (midpoint) integration of `dy/dx = f(x, y)`.
//!
//! # Limitations
//!
//! There is no adaptive step-size control. The span is split into equal
//! substeps no longer than the caller's step hint and each substep is taken
//! once, so accuracy is bounded by the hint and is never refined
//! automatically. Stiff or rapidly varying rates need a smaller hint.
//!
//! The work is not capped either. The substep count is `|span| / step_hint`,
//! so a huge finite span or a tiny hint costs proportionally many rate
//! evaluations. Callers that accept untrusted spans should bound them first,
//! or inspect [`substeps`] before integrating.

use crate::support::float::Real;

/// The right-hand side `f(x, y)` of a scalar ODE.
///
/// Implementations must be pure. Closures `Fn(T, T) -> T` implement this
/// trait.
pub trait RateFn<T> {
    /// Returns `dy/dx` at `(x, y)`.
    fn rate(&self, x: T, y: T) -> T;
}

impl<T, F: Fn(T, T) -> T> RateFn<T> for F {
    fn rate(&self, x: T, y: T) -> T {
        self(x, y)
    }
}

/// Number of equal substeps [`rk2`] uses to cover `span` with `step_hint`.
///
/// Returns `1` when `|span|` does not exceed `step_hint`, and `None` when the
/// count is not representable (a non-finite span or a zero hint). The count
/// grows without limit with `|span| / step_hint`.
pub fn substeps<T: Real>(span: T, step_hint: T) -> Option<usize> {
    let span = span.abs();
    if span > step_hint {
        (span / step_hint).ceil().to_usize()
    } else {
        Some(1)
    }
}

/// Integrates `dy/dx = rate(x, y)` from `(x0, y0)` to `x1`.
///
/// When `|x1 - x0|` exceeds `step_hint` the span is divided into
/// `ceil(|x1 - x0| / step_hint)` equal substeps carrying the sign of
/// `x1 - x0`; otherwise a single step is taken. Each substep of size `δ` is
///
/// ```text
/// k1 = δ·f(x, y)
/// y  = y + δ·f(x + δ/2, y + k1/2)
/// x  = x + δ
/// ```
///
/// Returns `NaN` if the substep count cannot be formed.
///
/// ```
/// use atmos_thermo::support::solve::rk2;
///
/// // dy/dx = 2x is integrated exactly by the midpoint rule.
/// let y = rk2(&|x: f64, _y: f64| 2.0 * x, 0.0, 3.0, 0.0, 0.5);
/// assert!((y - 9.0).abs() < 1e-12);
/// ```
pub fn rk2<T, F>(rate: &F, x0: T, x1: T, y0: T, step_hint: T) -> T
where
    T: Real,
    F: RateFn<T> + ?Sized,
{
    let mut delta = x1 - x0;
    let Some(steps) = substeps(delta, step_hint) else {
        return T::nan();
    };
    if steps > 1 {
        let Some(n) = T::from(steps) else {
            return T::nan();
        };
        delta = delta / n;
    }

    let half = T::lit(0.5);
    let mut x = x0;
    let mut y = y0;
    for _ in 0..steps {
        let k1 = delta * rate.rate(x, y);
        y = y + delta * rate.rate(x + half * delta, y + half * k1);
        x = x + delta;
    }
    y
}
