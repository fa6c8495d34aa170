use crate::support::{
    float::Real,
    search::linear_interpolate,
    thermo::{SolverConfig, lcl},
};

use super::parcel_profile_into;

/// A sounding with its LCL inserted, and the parcel lifted through it.
///
/// Every column holds one more level than the sounding it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileWithLcl<T> {
    /// Pressure levels (Pa) including the LCL.
    pub pressure: Vec<T>,
    /// Environmental temperature (K).
    pub temperature: Vec<T>,
    /// Environmental dewpoint (K).
    pub dewpoint: Vec<T>,
    /// Parcel temperature (K).
    pub parcel: Vec<T>,
}

/// Caller buffers for [`parcel_profile_with_lcl_into`], each one level longer
/// than the sounding.
#[derive(Debug)]
pub struct ProfileWithLclMut<'a, T> {
    /// Pressure levels (Pa) including the LCL.
    pub pressure: &'a mut [T],
    /// Environmental temperature (K).
    pub temperature: &'a mut [T],
    /// Environmental dewpoint (K).
    pub dewpoint: &'a mut [T],
    /// Parcel temperature (K).
    pub parcel: &'a mut [T],
}

impl<T: Real> ProfileWithLcl<T> {
    fn nan(len: usize) -> Self {
        Self {
            pressure: vec![T::nan(); len],
            temperature: vec![T::nan(); len],
            dewpoint: vec![T::nan(); len],
            parcel: vec![T::nan(); len],
        }
    }

    /// Borrows every column mutably.
    pub fn columns_mut(&mut self) -> ProfileWithLclMut<'_, T> {
        ProfileWithLclMut {
            pressure: &mut self.pressure,
            temperature: &mut self.temperature,
            dewpoint: &mut self.dewpoint,
            parcel: &mut self.parcel,
        }
    }
}

/// Lifts the parcel at the first level through a sounding with its LCL added.
///
/// The LCL pressure is inserted after the levels at or below it. The
/// environment at the LCL is interpolated linearly in `ln p` between the
/// neighbouring levels, and is `NaN` when the LCL lies above the last level.
/// The parcel column is [`parcel_profile`](super::parcel_profile) over the
/// augmented levels, with the exact LCL temperature at the inserted level.
///
/// An empty sounding gives empty columns. If the LCL cannot be found every
/// column is `NaN`.
///
/// ```
/// use atmos_thermo::support::thermo::{SolverConfig, profile::parcel_profile_with_lcl};
///
/// let pressure = [100_000.0, 90_000.0, 80_000.0];
/// let temperature = [303.15, 295.0, 287.0];
/// let dewpoint = [293.15, 289.0, 282.0];
///
/// let profile =
///     parcel_profile_with_lcl(&pressure, &temperature, &dewpoint, &SolverConfig::default());
/// assert_eq!(profile.pressure.len(), 4);
/// assert!(profile.pressure[2] > 80_000.0 && profile.pressure[2] < 90_000.0);
/// ```
pub fn parcel_profile_with_lcl<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    config: &SolverConfig,
) -> ProfileWithLcl<T> {
    let len = if pressure.is_empty() { 0 } else { pressure.len() + 1 };
    let mut out = ProfileWithLcl::nan(len);
    parcel_profile_with_lcl_into(pressure, temperature, dewpoint, config, out.columns_mut());
    out
}

/// Writes the sounding with its LCL into `out`. See [`parcel_profile_with_lcl`].
pub fn parcel_profile_with_lcl_into<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    config: &SolverConfig,
    out: ProfileWithLclMut<'_, T>,
) {
    let ProfileWithLclMut {
        pressure: p_out,
        temperature: t_out,
        dewpoint: td_out,
        parcel,
    } = out;
    debug_assert_eq!(p_out.len(), pressure.len() + 1, "output must hold the LCL");
    debug_assert_eq!(temperature.len(), pressure.len(), "sounding columns differ");
    debug_assert_eq!(dewpoint.len(), pressure.len(), "sounding columns differ");

    let (Some(&p0), Some(&t0), Some(&td0)) =
        (pressure.first(), temperature.first(), dewpoint.first())
    else {
        return;
    };

    let (p_lcl, t_lcl) = lcl(p0, t0, td0, T::lit(config.eps), config.max_iters);
    if p_lcl.is_nan() {
        for column in [p_out, t_out, td_out, parcel] {
            column.fill(T::nan());
        }
        return;
    }

    let at = 1 + pressure[1..].partition_point(|&p| p >= p_lcl);
    let env = |values: &[T]| match pressure.get(at) {
        Some(&p_above) => linear_interpolate(
            p_lcl.ln(),
            pressure[at - 1].ln(),
            p_above.ln(),
            values[at - 1],
            values[at],
        ),
        None => T::nan(),
    };

    insert(pressure, at, p_lcl, p_out);
    insert(temperature, at, env(temperature), t_out);
    insert(dewpoint, at, env(dewpoint), td_out);

    parcel_profile_into(p_out, t0, td0, config, parcel);
    parcel[at] = t_lcl;
}

/// Copies `values` into `out` with `value` inserted at index `at`.
fn insert<T: Copy>(values: &[T], at: usize, value: T, out: &mut [T]) {
    out[..at].copy_from_slice(&values[..at]);
    out[at] = value;
    out[at + 1..].copy_from_slice(&values[at..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::thermo::{dry_lapse, parcel_profile};

    const PRESSURE: [f64; 4] = [100_000.0, 90_000.0, 80_000.0, 70_000.0];
    const TEMPERATURE: [f64; 4] = [303.15, 295.0, 287.0, 280.0];
    const DEWPOINT: [f64; 4] = [293.15, 289.0, 282.0, 270.0];

    #[test]
    fn lcl_is_inserted_in_order() {
        let config = SolverConfig::default();
        let profile = parcel_profile_with_lcl(&PRESSURE, &TEMPERATURE, &DEWPOINT, &config);
        let (p_lcl, t_lcl) = lcl(100_000.0, 303.15, 293.15, config.eps, config.max_iters);

        assert_eq!(profile.pressure, [100_000.0, 90_000.0, p_lcl, 80_000.0, 70_000.0]);
        assert_eq!(profile.temperature[..2], TEMPERATURE[..2]);
        assert_eq!(profile.temperature[3..], TEMPERATURE[2..]);
        assert_eq!(profile.dewpoint[3..], DEWPOINT[2..]);

        // Environment at the LCL lies between its neighbours.
        assert!(profile.temperature[2] < 295.0 && profile.temperature[2] > 287.0);
        assert!(profile.dewpoint[2] < 289.0 && profile.dewpoint[2] > 282.0);

        assert_eq!(profile.parcel[2], t_lcl);
        assert_relative_eq!(profile.parcel[1], dry_lapse(90_000.0, 303.15, 100_000.0));

        let plain = parcel_profile(&profile.pressure, 303.15, 293.15, &config);
        assert_eq!(profile.parcel[3..], plain[3..]);
    }

    #[test]
    fn interpolation_is_linear_in_log_pressure() {
        let pressure = [100_000.0_f64, 50_000.0];
        let temperature = [300.0, 260.0];
        let dewpoint = [260.0, 250.0];

        let config = SolverConfig::default();
        let profile = parcel_profile_with_lcl(&pressure, &temperature, &dewpoint, &config);
        let p_lcl = profile.pressure[1];
        let weight = (100_000.0_f64.ln() - p_lcl.ln()) / 2.0_f64.ln();
        assert_relative_eq!(profile.temperature[1], 300.0 - 40.0 * weight, max_relative = 1e-12);
    }

    #[test]
    fn saturated_parcel_inserts_after_the_surface() {
        let (p, t, td) = ([85_000.0, 70_000.0], [280.0, 270.0], [280.0, 265.0]);
        let profile = parcel_profile_with_lcl(&p, &t, &td, &SolverConfig::default());

        assert_relative_eq!(profile.pressure[1], 85_000.0, max_relative = 1e-9);
        assert_relative_eq!(profile.temperature[1], 280.0, max_relative = 1e-9);
        assert_eq!(profile.pressure[2], 70_000.0);
    }

    #[test]
    fn lcl_above_the_sounding() {
        let (p, t, td) = ([100_000.0_f64, 95_000.0], [303.15, 300.0], [273.15, 270.0]);
        let profile = parcel_profile_with_lcl(&p, &t, &td, &SolverConfig::default());

        assert!(profile.pressure[2] < 95_000.0);
        assert!(profile.temperature[2].is_nan() && profile.dewpoint[2].is_nan());
        assert!(profile.parcel[2].is_finite());
    }

    #[test]
    fn degenerate_soundings() {
        let empty = parcel_profile_with_lcl::<f64>(&[], &[], &[], &Default::default());
        assert!(empty.pressure.is_empty() && empty.parcel.is_empty());

        let config = SolverConfig::default().with_max_iters(0);
        let failed = parcel_profile_with_lcl(&PRESSURE, &TEMPERATURE, &DEWPOINT, &config);
        assert_eq!(failed.pressure.len(), 5);
        assert!(failed.pressure.iter().chain(&failed.parcel).all(|v| v.is_nan()));
    }
}
