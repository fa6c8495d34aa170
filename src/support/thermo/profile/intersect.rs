use crate::support::{float::Real, search::Direction};

/// Which crossing to report when a column has several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pick {
    /// The crossing nearest the first level, usually the surface.
    #[default]
    Bottom,
    /// The crossing nearest the last level.
    Top,
}

/// Points `(x, y)` where curve `a` crosses curve `b` between adjacent levels.
///
/// Both curves are sampled at `x`. Within each interval they are treated as
/// straight lines, in `ln x` when `log_x` is set. `Some(Increasing)` keeps
/// crossings where `a - b` rises along the levels, `Some(Decreasing)` those
/// where it falls, and `None` keeps both. Intervals with a `NaN` endpoint
/// are skipped. A crossing exactly at a level is reported once.
///
/// ```
/// use atmos_thermo::support::{search::Direction, thermo::profile::intersections};
///
/// let x = [0.0, 1.0, 2.0];
/// let a = [0.0, 2.0, 4.0];
/// let b = [1.0, 1.0, 1.0];
///
/// assert_eq!(intersections(&x, &a, &b, Some(Direction::Increasing), false), [(0.5, 1.0)]);
/// assert!(intersections(&x, &a, &b, Some(Direction::Decreasing), false).is_empty());
/// ```
pub fn intersections<T: Real>(
    x: &[T],
    a: &[T],
    b: &[T],
    direction: Option<Direction>,
    log_x: bool,
) -> Vec<(T, T)> {
    let n = x.len().min(a.len()).min(b.len());
    let coord = |v: T| if log_x { v.ln() } else { v };

    let mut found = Vec::new();
    let mut last: Option<T> = None;
    for i in 1..n {
        let (x0, x1) = (coord(x[i - 1]), coord(x[i]));
        let (d0, d1) = (a[i - 1] - b[i - 1], a[i] - b[i]);
        if x0.is_nan() || x1.is_nan() || d0.is_nan() || d1.is_nan() {
            continue;
        }

        let (s0, s1) = (sign(d0), sign(d1));
        let crossed = match direction {
            Some(Direction::Increasing) => s1 > s0,
            Some(Direction::Decreasing) => s1 < s0,
            None => s1 != s0,
        };
        if !crossed {
            continue;
        }

        let frac = d0 / (d0 - d1);
        let xi = x0 + frac * (x1 - x0);
        if last == Some(xi) {
            continue;
        }
        last = Some(xi);

        let yi = a[i - 1] + frac * (a[i] - a[i - 1]);
        found.push((if log_x { xi.exp() } else { xi }, yi));
    }
    found
}

/// The crossing selected by `which`, or `(NaN, NaN)` if there is none.
pub fn pick<T: Real>(points: &[(T, T)], which: Pick) -> (T, T) {
    let point = match which {
        Pick::Bottom => points.first(),
        Pick::Top => points.last(),
    };
    point.copied().unwrap_or((T::nan(), T::nan()))
}

fn sign<T: Real>(value: T) -> i8 {
    if value > T::zero() {
        1
    } else if value < T::zero() {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn crossings_in_log_pressure() {
        let pressure = [100_000.0, 80_000.0, 60_000.0, 40_000.0];
        let parcel = [300.0, 290.0, 282.0, 262.0];
        let environment = [301.0, 289.0, 280.0, 265.0];

        let rising =
            intersections(&pressure, &parcel, &environment, Some(Direction::Increasing), true);
        assert_eq!(rising.len(), 1);
        let (p, t) = rising[0];
        assert!(p < 100_000.0 && p > 80_000.0);

        // The crossing lies halfway in ln p, where both lines meet.
        let mid = (100_000.0_f64.ln() + 80_000.0_f64.ln()) / 2.0;
        assert_relative_eq!(p, mid.exp(), max_relative = 1e-12);
        assert_relative_eq!(t, 295.0, max_relative = 1e-12);

        let falling =
            intersections(&pressure, &parcel, &environment, Some(Direction::Decreasing), true);
        assert_eq!(falling.len(), 1);
        assert!(falling[0].0 < 60_000.0 && falling[0].0 > 40_000.0);

        let both = intersections(&pressure, &parcel, &environment, None, true);
        assert_eq!(both, [rising[0], falling[0]]);
    }

    #[test]
    fn touching_at_a_level_counts_once() {
        let x = [0.0, 1.0, 2.0];
        let a = [-1.0, 0.0, 1.0];
        let b = [0.0; 3];

        assert_eq!(intersections(&x, &a, &b, Some(Direction::Increasing), false), [(1.0, 0.0)]);
    }

    #[test]
    fn nan_intervals_are_skipped() {
        let x = [0.0, f64::NAN, 2.0, 3.0];
        let a = [-1.0, 1.0, -1.0, 1.0];
        let b = [0.0; 4];

        assert_eq!(intersections(&x, &a, &b, None, false), [(2.5, 0.0)]);
    }

    #[test]
    fn picking() {
        let points = [(90_000.0, 290.0), (50_000.0, 250.0)];
        assert_eq!(pick(&points, Pick::Bottom), points[0]);
        assert_eq!(pick(&points, Pick::Top), points[1]);

        let (p, t) = pick::<f64>(&[], Pick::default());
        assert!(p.is_nan() && t.is_nan());
    }
}
