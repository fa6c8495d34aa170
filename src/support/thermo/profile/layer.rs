use crate::support::{
    float::Real,
    search::trapezoid,
    thermo::{
        SolverConfig, equivalent_potential_temperature, lcl_pressure, saturation_mixing_ratio,
    },
};

/// Default depth (Pa) searched for the most unstable parcel.
pub const MOST_UNSTABLE_DEPTH: f64 = 30_000.0;

/// Default depth (Pa) of the mixed layer.
pub const MIXED_LAYER_DEPTH: f64 = 10_000.0;

/// Mixing ratio (kg/kg) of the parcel lifted from the first level.
///
/// Below the parcel's LCL (pressure greater than the LCL pressure) this is
/// the saturation mixing ratio at the level's dewpoint; at and above the LCL
/// it is the saturation mixing ratio at the level's temperature. If the LCL
/// cannot be found every level uses its temperature.
pub fn parcel_mixing_ratio<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    config: &SolverConfig,
) -> Vec<T> {
    let mut out = vec![T::nan(); pressure.len()];
    parcel_mixing_ratio_into(pressure, temperature, dewpoint, config, &mut out);
    out
}

/// Writes the parcel mixing ratio into `out`. See [`parcel_mixing_ratio`].
pub fn parcel_mixing_ratio_into<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    config: &SolverConfig,
    out: &mut [T],
) {
    debug_assert_eq!(pressure.len(), out.len(), "output must match the levels");

    let (Some(&p0), Some(&t0), Some(&td0)) =
        (pressure.first(), temperature.first(), dewpoint.first())
    else {
        return;
    };
    let p_lcl = lcl_pressure(p0, t0, td0, T::lit(config.eps), config.max_iters);

    let levels = pressure.iter().zip(temperature).zip(dewpoint);
    for (((&p, &t), &td), slot) in levels.zip(out.iter_mut()) {
        *slot = if p > p_lcl {
            saturation_mixing_ratio(p, td)
        } else {
            saturation_mixing_ratio(p, t)
        };
    }
}

/// Index of the level with the highest θe within `depth` (Pa) of `bottom`.
///
/// The layer spans `bottom - depth ..= bottom`, with `bottom` defaulting to
/// the first level. Levels whose θe is `NaN` are ignored. Returns `0` when
/// no level qualifies.
///
/// ```
/// use atmos_thermo::support::thermo::profile::{MOST_UNSTABLE_DEPTH, most_unstable_parcel_index};
///
/// let pressure = [100_000.0, 92_500.0, 85_000.0, 50_000.0];
/// let temperature = [300.0, 301.0, 296.0, 280.0];
/// let dewpoint = [285.0, 297.0, 285.0, 279.0];
///
/// let idx =
///     most_unstable_parcel_index(&pressure, &temperature, &dewpoint, MOST_UNSTABLE_DEPTH, None);
/// assert_eq!(idx, 1);
/// ```
pub fn most_unstable_parcel_index<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    depth: f64,
    bottom: Option<T>,
) -> usize {
    let Some(&first) = pressure.first() else {
        return 0;
    };
    let bottom = bottom.unwrap_or(first);
    let top = bottom - T::lit(depth);

    let mut best = (0, T::neg_infinity());
    let levels = pressure.iter().zip(temperature).zip(dewpoint).enumerate();
    for (i, ((&p, &t), &td)) in levels {
        if !within(p, bottom, top) {
            continue;
        }
        let theta_e = equivalent_potential_temperature(p, t, td);
        if theta_e > best.1 {
            best = (i, theta_e);
        }
    }
    best.0
}

/// The most unstable parcel as `(p, T, Td, index)`.
///
/// See [`most_unstable_parcel_index`]. An empty column yields `NaN` values at
/// index `0`.
pub fn most_unstable_parcel<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    depth: f64,
    bottom: Option<T>,
) -> (T, T, T, usize) {
    let idx = most_unstable_parcel_index(pressure, temperature, dewpoint, depth, bottom);
    let at = |values: &[T]| values.get(idx).copied().unwrap_or_else(T::nan);
    (at(pressure), at(temperature), at(dewpoint), idx)
}

/// Pressure-weighted mean `(T, Td)` of the layer `depth` (Pa) deep above `bottom`.
///
/// The layer spans `bottom - depth ..= bottom`, with `bottom` defaulting to
/// the first level. Each mean is the trapezoidal integral over the levels in
/// the layer divided by the pressure they span. A layer holding fewer than
/// two distinct levels yields `NaN`.
pub fn mixed_layer<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    depth: f64,
    bottom: Option<T>,
) -> (T, T) {
    let nan = (T::nan(), T::nan());
    let Some(&first) = pressure.first() else {
        return nan;
    };
    let bottom = bottom.unwrap_or(first);
    let top = bottom - T::lit(depth);

    let layer = || {
        pressure
            .iter()
            .zip(temperature)
            .zip(dewpoint)
            .filter(move |((p, _), _)| within(**p, bottom, top))
            .map(|((&p, &t), &td)| (p, t, td))
    };

    let (highest, lowest) = layer().fold((T::neg_infinity(), T::infinity()), |(hi, lo), level| {
        (hi.max(level.0), lo.min(level.0))
    });
    let span = highest - lowest;
    if span.is_nan() || span <= T::zero() {
        return nan;
    }

    let t = trapezoid(layer().map(|(p, t, _)| (p, t))) / -span;
    let td = trapezoid(layer().map(|(p, _, td)| (p, td))) / -span;
    (t, td)
}

/// Whether `p` lies in the closed layer from `bottom` up to `top`.
pub(super) fn within<T: Real>(p: T, bottom: T, top: T) -> bool {
    p <= bottom && p >= top
}
