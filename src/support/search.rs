//! Search, interpolation and integration over monotonic profiles.
//!
//! A profile is an ordered sequence of samples along one physical axis, such
//! as pressure levels in a sounding. Callers declare its [`Direction`]; the
//! search functions never infer it and never validate it. Use [`monotonic`]
//! first when the input is untrusted.

use crate::support::float::Real;

/// Ordering of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Non-decreasing: `x[i] <= x[i + 1]`.
    Increasing,
    /// Non-increasing: `x[i] >= x[i + 1]`.
    Decreasing,
}

/// Returns `true` if no adjacent pair in `profile` violates `direction`.
///
/// Equal neighbours are allowed in either direction. Comparisons involving
/// `NaN` are never violations, so `NaN` gaps pass.
pub fn monotonic<T: Real>(profile: &[T], direction: Direction) -> bool {
    profile.windows(2).all(|pair| match direction {
        Direction::Increasing => !(pair[1] < pair[0]),
        Direction::Decreasing => !(pair[1] > pair[0]),
    })
}

/// Returns the first index whose element does not satisfy `precedes(element, value)`.
///
/// `xs` must be partitioned by the predicate: every element for which it
/// holds comes before every element for which it does not. The result lies
/// in `0..=xs.len()`, where `xs.len()` means every element precedes `value`.
pub fn lower_bound<T, F>(xs: &[T], value: T, precedes: F) -> usize
where
    T: Copy,
    F: Fn(T, T) -> bool,
{
    xs.partition_point(|&x| precedes(x, value))
}

/// Binary search for the insertion point of `value` in a sorted profile.
///
/// For an ascending profile (`inverted == false`) this is the first index
/// with `xs[i] >= value`. For a descending profile (`inverted == true`) it is
/// the first index with `xs[i] <= value`. Returns `xs.len()` when no such
/// index exists.
///
/// ```
/// use atmos_thermo::support::search::search_sorted;
///
/// let xs = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(search_sorted(&xs, 0.5, false), 0);
/// assert_eq!(search_sorted(&xs, 2.5, false), 2);
/// assert_eq!(search_sorted(&xs, 5.0, false), 4);
/// ```
pub fn search_sorted<T: Real>(xs: &[T], value: T, inverted: bool) -> usize {
    if inverted {
        lower_bound(xs, value, |x, v| x > v)
    } else {
        lower_bound(xs, value, |x, v| x < v)
    }
}

/// Linear interpolation of `y` at `x` between `(x0, y0)` and `(x1, y1)`.
#[inline]
pub fn linear_interpolate<T: Real>(x: T, x0: T, x1: T, y0: T, y1: T) -> T {
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

/// Position of `x` within `[x0, x1]` as a fraction.
#[inline]
pub fn norm<T: Real>(x: T, x0: T, x1: T) -> T {
    (x - x0) / (x1 - x0)
}

/// Heaviside step: `0` below zero, `h0` at zero, `1` above, `NaN` for `NaN`.
#[inline]
pub fn heaviside<T: Real>(x: T, h0: T) -> T {
    if x.is_nan() {
        T::nan()
    } else if x == T::zero() {
        h0
    } else if x < T::zero() {
        T::zero()
    } else {
        T::one()
    }
}

/// Interpolates `fp` at `x` along a decreasing profile `xp`, such as pressure
/// levels from the surface upward.
///
/// Values at or beyond the first knot return `fp[0]` and values beyond the
/// last knot return the last sample; nothing is extrapolated. An empty
/// profile or a `NaN` query yields `NaN`.
///
/// `xp` and `fp` must have the same length.
///
/// ```
/// use atmos_thermo::support::search::interpolate_z;
///
/// let pressure = [100_000.0, 90_000.0, 80_000.0];
/// let temperature = [300.0, 292.0, 284.0];
///
/// assert_eq!(interpolate_z(85_000.0, &pressure, &temperature), 288.0);
/// assert_eq!(interpolate_z(101_000.0, &pressure, &temperature), 300.0);
/// assert_eq!(interpolate_z(70_000.0, &pressure, &temperature), 284.0);
/// ```
pub fn interpolate_z<T: Real>(x: T, xp: &[T], fp: &[T]) -> T {
    debug_assert_eq!(xp.len(), fp.len(), "profile and samples differ in length");

    let n = xp.len().min(fp.len());
    if n == 0 || x.is_nan() {
        return T::nan();
    }

    let i = lower_bound(&xp[..n], x, |knot, v| knot >= v);
    if i == 0 {
        return fp[0];
    }
    if i == n {
        return fp[n - 1];
    }

    linear_interpolate(x, xp[i - 1], xp[i], fp[i - 1], fp[i])
}

/// Trapezoidal integral over `(x, y)` samples taken in order.
///
/// Samples with a `NaN` coordinate or value are dropped and their neighbours
/// are joined directly. Fewer than two usable samples integrate to zero. The
/// sign follows the order of `x`: a decreasing `x` gives the negated area.
///
/// ```
/// use atmos_thermo::support::search::trapezoid;
///
/// let samples = [(0.0, 0.0), (1.0, f64::NAN), (2.0, 2.0)];
/// assert_eq!(trapezoid(samples), 2.0);
/// ```
pub fn trapezoid<T, I>(samples: I) -> T
where
    T: Real,
    I: IntoIterator<Item = (T, T)>,
{
    let half = T::lit(0.5);
    let mut total = T::zero();
    let mut prev: Option<(T, T)> = None;

    for (x, y) in samples {
        if x.is_nan() || y.is_nan() {
            continue;
        }
        if let Some((x0, y0)) = prev {
            total = total + (x - x0) * (y0 + y) * half;
        }
        prev = Some((x, y));
    }
    total
}
