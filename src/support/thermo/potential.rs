//! Exner function and potential temperatures.

use crate::support::{
    constants::{KAPPA, P0, T0},
    float::Real,
};

use super::moisture::{saturation_mixing_ratio, saturation_vapor_pressure};

/// θe at or below which [`wet_bulb_potential_temperature`] returns θe unchanged (K).
pub const THETA_W_CUTOFF: f64 = 173.15;

/// Exner function `(p / p_ref)^κ`, dimensionless.
#[inline]
pub fn exner_function<T: Real>(p: T, p_ref: T) -> T {
    (p / p_ref).powf(T::lit(KAPPA))
}

/// Potential temperature (K) referenced to [`P0`].
///
/// ```
/// use atmos_thermo::support::thermo::potential_temperature;
///
/// assert_eq!(potential_temperature(100_000.0_f64, 288.15), 288.15);
/// assert!(potential_temperature(85_000.0_f64, 290.0) > 290.0);
/// ```
#[inline]
pub fn potential_temperature<T: Real>(p: T, t: T) -> T {
    potential_temperature_at(p, t, T::lit(P0))
}

/// Potential temperature (K) referenced to an explicit pressure `p_ref` (Pa).
#[inline]
pub fn potential_temperature_at<T: Real>(p: T, t: T, p_ref: T) -> T {
    t / exner_function(p, p_ref)
}

/// Temperature (K) at `p` of a parcel lifted dry-adiabatically from `(p_ref, t_ref)`.
#[inline]
pub fn dry_lapse<T: Real>(p: T, t_ref: T, p_ref: T) -> T {
    t_ref * exner_function(p, p_ref)
}

/// Equivalent potential temperature θe (K), after Bolton (1980).
///
/// The temperature at the lifting condensation level is approximated in
/// closed form from `t` and `td`, then used for both the moist-adjusted
/// potential temperature and the latent heat correction.
pub fn equivalent_potential_temperature<T: Real>(p: T, t: T, td: T) -> T {
    let one = T::one();
    let r = saturation_mixing_ratio(p, td);
    let e = saturation_vapor_pressure(td);

    let t56 = T::lit(56.0);
    let t_lcl = t56 + one / (one / (td - t56) + (t / td).ln() / T::lit(800.0));
    let theta_lcl = potential_temperature(p - e, t) * (t / t_lcl).powf(T::lit(0.28) * r);

    theta_lcl * (r * (one + T::lit(0.448) * r) * (T::lit(3036.0) / t_lcl - T::lit(1.78))).exp()
}

/// Wet-bulb potential temperature θw (K) of a parcel, after Davies-Jones (2008).
///
/// Computes θe with [`equivalent_potential_temperature`] and converts it with
/// [`theta_w_from_theta_e`].
pub fn wet_bulb_potential_temperature<T: Real>(p: T, t: T, td: T) -> T {
    theta_w_from_theta_e(equivalent_potential_temperature(p, t, td))
}

/// Converts θe (K) to θw (K) with the Davies-Jones (2008) rational fit.
///
/// For θe at or below [`THETA_W_CUTOFF`] the fit does not apply and θe is
/// returned unchanged. The result is therefore discontinuous at the cutoff.
pub fn theta_w_from_theta_e<T: Real>(theta_e: T) -> T {
    if theta_e <= T::lit(THETA_W_CUTOFF) {
        return theta_e;
    }

    let x = theta_e / T::lit(T0);
    let x2 = x * x;
    let x3 = x2 * x;
    let x4 = x2 * x2;

    let a = T::lit(7.101_574) - T::lit(20.682_08) * x + T::lit(16.111_82) * x2
        + T::lit(2.574_631) * x3
        - T::lit(5.205_688) * x4;
    let b = T::one() - T::lit(3.552_497) * x + T::lit(3.781_782) * x2
        - T::lit(0.689_965_5) * x3
        - T::lit(0.592_934_0) * x4;

    theta_e - (a / b).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn theta_above_reference_level() {
        assert_relative_eq!(potential_temperature(85_000.0, 290.0), 303.7834, max_relative = 1e-6);
        assert_relative_eq!(
            potential_temperature_at(85_000.0, 290.0, 85_000.0),
            290.0,
            max_relative = 1e-15
        );
    }

    #[test]
    fn dry_lapse_inverts_theta() {
        let theta = potential_temperature(70_000.0, 275.0);
        assert_relative_eq!(dry_lapse(70_000.0, theta, P0), 275.0, max_relative = 1e-12);
        assert_relative_eq!(exner_function(50_000.0_f32, 50_000.0), 1.0);
    }

    #[test]
    fn theta_e_reference_values() {
        assert_relative_eq!(
            equivalent_potential_temperature(100_000.0, 303.15, 293.15),
            347.5458,
            max_relative = 1e-5
        );
        assert_relative_eq!(
            equivalent_potential_temperature(85_000.0, 280.0, 270.0),
            304.0024,
            max_relative = 1e-5
        );
        assert_relative_eq!(
            equivalent_potential_temperature(100_000.0_f32, 303.15, 293.15),
            347.5458,
            max_relative = 1e-4
        );
    }

    #[test]
    fn theta_w_reference_values() {
        assert_relative_eq!(
            wet_bulb_potential_temperature(100_000.0, 303.15, 293.15),
            296.0264,
            max_relative = 1e-5
        );
        assert_relative_eq!(
            wet_bulb_potential_temperature(50_000.0, 250.0, 240.0),
            283.877,
            max_relative = 1e-5
        );
    }

    #[test]
    fn theta_w_passes_cold_theta_e_through() {
        let theta_e = equivalent_potential_temperature(100_000.0, 150.0, 140.0);
        assert!(theta_e <= THETA_W_CUTOFF);
        assert_eq!(wet_bulb_potential_temperature(100_000.0, 150.0, 140.0), theta_e);
    }

    #[test]
    fn theta_w_cutoff_is_inclusive() {
        assert_eq!(theta_w_from_theta_e(THETA_W_CUTOFF), THETA_W_CUTOFF);
        assert_eq!(theta_w_from_theta_e(173.15_f32), 173.15_f32);
        assert_eq!(theta_w_from_theta_e(100.0), 100.0);

        assert_relative_eq!(theta_w_from_theta_e(200.0), 199.999_387_085, max_relative = 1e-10);
        assert_relative_eq!(theta_w_from_theta_e(300.0), 281.257_715_823, max_relative = 1e-10);
        assert!(theta_w_from_theta_e(f64::NAN).is_nan());
    }

    proptest! {
        #[test]
        fn identity_at_reference_pressure(t in 150.0..350.0_f64) {
            prop_assert_eq!(potential_temperature(P0, t), t);
        }
    }
}
