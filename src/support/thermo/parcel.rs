//! Lifted parcel solvers: moist adiabats, the lifting condensation level and
//! wet-bulb temperature.
//!
//! These wire the closed-form formulas into the iterative solvers:
//!
//! - [`moist_lapse`] integrates [`MoistLapseRate`] with [`rk2`].
//! - [`lcl_pressure`] iterates [`LclPressureMap`] with [`fixed_point`].
//! - [`wet_bulb_temperature`] lifts to the LCL, then descends the moist
//!   adiabat back to the starting pressure.

use crate::support::{
    constants::{CPD, EPSILON, KAPPA, LV, RD},
    float::Real,
    solve::{RateFn, UpdateFn, fixed_point, rk2},
};

use super::{
    config::SolverConfig,
    moisture::{dewpoint_from_mixing_ratio, mixing_ratio_from_dewpoint, saturation_mixing_ratio},
};

/// Rate of change of temperature with pressure, `dT/dp` (K/Pa), along a
/// saturated adiabat at `(p, t)`.
#[inline]
pub fn moist_lapse_rate<T: Real>(p: T, t: T) -> T {
    let rd = T::lit(RD);
    let lv = T::lit(LV);
    let r = saturation_mixing_ratio(p, t);

    (rd * t + lv * r) / (T::lit(CPD) + lv * lv * r * T::lit(EPSILON) / (rd * t * t)) / p
}

/// [`moist_lapse_rate`] as an ODE right-hand side in `(pressure, temperature)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoistLapseRate;

impl<T: Real> RateFn<T> for MoistLapseRate {
    #[inline]
    fn rate(&self, p: T, t: T) -> T {
        moist_lapse_rate(p, t)
    }
}

/// Temperature (K) at `p_next` of a saturated parcel at `(p, t)`.
///
/// The adiabat is integrated in pressure substeps no larger than `step` (Pa).
pub fn moist_lapse<T: Real>(p: T, p_next: T, t: T, step: T) -> T {
    rk2(&MoistLapseRate, p, p_next, t, step)
}

/// Fixed-point map for the LCL pressure of a parcel.
///
/// Given a trial pressure, recomputes the dewpoint the parcel would have
/// there with its conserved mixing ratio, then finds the pressure at which a
/// dry adiabat from the parcel's starting point reaches that dewpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LclPressureMap<T> {
    /// Starting pressure (Pa).
    pub pressure: T,
    /// Starting temperature (K).
    pub temperature: T,
    /// Conserved mixing ratio (kg/kg).
    pub mixing_ratio: T,
}

impl<T: Real> LclPressureMap<T> {
    /// Builds the map for a parcel at `(p, t)` with dewpoint `td`.
    pub fn new(p: T, t: T, td: T) -> Self {
        Self {
            pressure: p,
            temperature: t,
            mixing_ratio: mixing_ratio_from_dewpoint(p, td),
        }
    }
}

impl<T: Real> UpdateFn<T> for LclPressureMap<T> {
    fn update(&self, trial: T) -> T {
        let td = dewpoint_from_mixing_ratio(trial, self.mixing_ratio);
        let p = self.pressure * (td / self.temperature).powf(T::lit(KAPPA.recip()));

        // Domain excursions leave the trial pressure where it was.
        if p.is_nan() { trial } else { p }
    }
}

/// Lifting condensation level pressure (Pa) of a parcel at `(p, t)` with dewpoint `td`.
///
/// `NaN` if the solve does not converge within `max_iters`.
pub fn lcl_pressure<T: Real>(p: T, t: T, td: T, eps: T, max_iters: usize) -> T {
    fixed_point(&LclPressureMap::new(p, t, td), p, eps, max_iters)
}

/// Lifting condensation level `(pressure, temperature)` of a parcel.
///
/// The temperature is the dewpoint at the LCL pressure with the parcel's
/// conserved mixing ratio, so both halves are `NaN` together.
///
/// ```
/// use atmos_thermo::support::thermo::lcl;
///
/// let (p_lcl, t_lcl) = lcl(100_000.0_f64, 303.15, 293.15, 0.1, 50);
/// assert!((p_lcl - 86_480.6).abs() < 1.0);
/// assert!((t_lcl - 290.83).abs() < 0.01);
/// ```
pub fn lcl<T: Real>(p: T, t: T, td: T, eps: T, max_iters: usize) -> (T, T) {
    let map = LclPressureMap::new(p, t, td);
    let p_lcl = fixed_point(&map, p, eps, max_iters);
    (p_lcl, dewpoint_from_mixing_ratio(p_lcl, map.mixing_ratio))
}

/// Wet-bulb temperature (K) of a parcel at `(p, t)` with dewpoint `td`.
///
/// Lifts the parcel to its LCL, then brings it back down the moist adiabat
/// to `p`.
pub fn wet_bulb_temperature<T: Real>(p: T, t: T, td: T, config: &SolverConfig) -> T {
    let (p_lcl, t_lcl) = lcl(p, t, td, T::lit(config.eps), config.max_iters);
    moist_lapse(p_lcl, p, t_lcl, T::lit(config.step))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::solve::fixed_point_solve;

    #[test]
    fn moist_adiabat_from_surface() {
        assert_relative_eq!(
            moist_lapse(100_000.0, 50_000.0, 300.0, 1000.0),
            276.0305,
            max_relative = 1e-6
        );
        // One coarse step lands somewhere else.
        assert_relative_eq!(
            moist_lapse(100_000.0, 50_000.0, 300.0, 100_000.0),
            278.0302,
            max_relative = 1e-6
        );
        assert_eq!(moist_lapse(85_000.0, 85_000.0, 290.0, 1000.0), 290.0);
    }

    #[test]
    fn lapse_rate_is_positive() {
        // Temperature falls with pressure along a saturated adiabat.
        assert!(moist_lapse_rate(100_000.0, 300.0) > 0.0);
        assert!(moist_lapse_rate(50_000.0_f32, 250.0) > 0.0);
    }

    #[test]
    fn lcl_reference_values() {
        let cases = [
            ((100_000.0, 303.15, 293.15), (86_480.6066, 290.826_75)),
            ((100_000.0, 293.15, 280.0), (82_191.52, 277.1754)),
            ((85_000.0, 280.0, 270.0), (72_871.45, 267.9506)),
            ((50_000.0, 250.0, 240.0), (42_269.85, 238.2869)),
        ];

        for ((p, t, td), (p_lcl, t_lcl)) in cases {
            let (p_got, t_got) = lcl(p, t, td, 0.1, 50);
            assert_relative_eq!(p_got, p_lcl, max_relative = 1e-6);
            assert_relative_eq!(t_got, t_lcl, max_relative = 1e-6);
            assert_eq!(lcl_pressure(p, t, td, 0.1, 50), p_got);
        }
    }

    #[test]
    fn lcl_converges_quickly() {
        let map = LclPressureMap::new(100_000.0, 303.15, 293.15);
        let solution = fixed_point_solve(&map, 100_000.0, 0.1, 50);
        assert_eq!(solution.iters, 2);
    }

    #[test]
    fn saturated_parcel_is_at_its_lcl() {
        let (p_lcl, t_lcl) = lcl(100_000.0, 300.0, 300.0, 0.1, 50);
        assert_relative_eq!(p_lcl, 100_000.0, max_relative = 0.1);
        assert_relative_eq!(t_lcl, 300.0, max_relative = 1e-6);

        let config = SolverConfig::default();
        assert_relative_eq!(
            wet_bulb_temperature(70_000.0, 280.0, 280.0, &config),
            280.0,
            max_relative = 1e-6
        );
    }

    #[test]
    fn wet_bulb_reference_values() {
        let config = SolverConfig::default();
        let cases = [
            ((100_000.0, 303.15, 293.15), 295.9146),
            ((100_000.0, 293.15, 280.0), 285.6663),
            ((85_000.0, 280.0, 270.0), 275.5128),
            ((50_000.0, 250.0, 240.0), 248.5798),
        ];

        for ((p, t, td), expected) in cases {
            let wb = wet_bulb_temperature(p, t, td, &config);
            assert_relative_eq!(wb, expected, max_relative = 1e-6);
            assert!(wb > td && wb < t);
        }

        assert_relative_eq!(
            wet_bulb_temperature(100_000.0_f32, 303.15, 293.15, &config),
            295.9146,
            max_relative = 1e-4
        );
    }

    #[test]
    fn budget_exhaustion_is_nan() {
        let (p_lcl, t_lcl) = lcl(100_000.0_f64, 303.15, 293.15, 0.1, 0);
        assert!(p_lcl.is_nan());
        assert!(t_lcl.is_nan());

        let config = SolverConfig::default().with_max_iters(0);
        assert!(wet_bulb_temperature(100_000.0_f64, 303.15, 293.15, &config).is_nan());
    }

    #[test]
    fn nan_inputs_are_nan() {
        assert!(lcl_pressure(f64::NAN, 300.0, 290.0, 0.1, 50).is_nan());
        assert!(moist_lapse(100_000.0, f64::NAN, 300.0, 1000.0).is_nan());
    }
}
