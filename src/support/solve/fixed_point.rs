//! Fixed-point iteration with Aitken delta-squared acceleration.

use crate::support::float::Real;

/// A map `x -> f(x)` whose fixed point is sought.
///
/// Implementations must be pure: the same estimate always maps to the same
/// next estimate. Closures `Fn(T) -> T` implement this trait.
pub trait UpdateFn<T> {
    /// Maps the current estimate to the next one.
    fn update(&self, estimate: T) -> T;
}

impl<T, F: Fn(T) -> T> UpdateFn<T> for F {
    fn update(&self, estimate: T) -> T {
        self(estimate)
    }
}

/// Termination status of a fixed-point solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The convergence test passed.
    Converged,
    /// The iteration budget ran out first.
    MaxIters,
}

/// Outcome of [`fixed_point_solve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPointSolution<T> {
    /// Converged estimate, or the last estimate if the budget ran out.
    pub value: T,
    /// Number of accelerated iterations performed.
    pub iters: usize,
    /// Why the solve stopped.
    pub status: Status,
}

impl<T: Real> FixedPointSolution<T> {
    /// Returns the converged value, or `NaN` if the solve did not converge.
    pub fn value_or_nan(&self) -> T {
        match self.status {
            Status::Converged => self.value,
            Status::MaxIters => T::nan(),
        }
    }
}

/// Solves `x = f(x)` starting from `x0`, reporting how the solve ended.
///
/// Each iteration evaluates the map twice, `p1 = f(p0)` and `p2 = f(p1)`,
/// then replaces `p2` with the Steffensen estimate `p0 - (p1 - p0)² / Δ`
/// whenever the second difference `Δ = p2 - 2·p1 + p0` is non-zero. The
/// solve has converged when the relative change `|(p2 - p0) / p0|` is below
/// `eps`, or the absolute value `|p2|` when `p0` is zero.
///
/// A `NaN` estimate never satisfies the convergence test, so it runs the
/// budget out and ends with [`Status::MaxIters`].
pub fn fixed_point_solve<T, F>(update: &F, x0: T, eps: T, max_iters: usize) -> FixedPointSolution<T>
where
    T: Real,
    F: UpdateFn<T> + ?Sized,
{
    let two = T::lit(2.0);
    let mut p0 = x0;

    for iter in 1..=max_iters {
        let p1 = update.update(p0);
        let mut p2 = update.update(p1);

        let delta = p2 - two * p1 + p0;
        if delta != T::zero() {
            let step = p1 - p0;
            p2 = p0 - step * step / delta;
        }

        let err = if p0 == T::zero() {
            p2.abs()
        } else {
            ((p2 - p0) / p0).abs()
        };

        if err < eps {
            return FixedPointSolution {
                value: p2,
                iters: iter,
                status: Status::Converged,
            };
        }

        p0 = p2;
    }

    FixedPointSolution {
        value: p0,
        iters: max_iters,
        status: Status::MaxIters,
    }
}

/// Solves `x = f(x)` starting from `x0`, returning `NaN` on non-convergence.
///
/// See [`fixed_point_solve`] for the algorithm.
///
/// ```
/// use atmos_thermo::support::solve::fixed_point;
///
/// let root = fixed_point(&|x: f64| x.cos(), 1.0, 1e-12, 50);
/// assert!((root - 0.739_085_133_215_160_6).abs() < 1e-9);
///
/// let diverges = fixed_point(&|x: f64| x + 1.0, 0.0, 1e-6, 50);
/// assert!(diverges.is_nan());
/// ```
#[inline]
pub fn fixed_point<T, F>(update: &F, x0: T, eps: T, max_iters: usize) -> T
where
    T: Real,
    F: UpdateFn<T> + ?Sized,
{
    fixed_point_solve(update, x0, eps, max_iters).value_or_nan()
}
