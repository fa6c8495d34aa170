//! Wind vector conversions in the meteorological convention.
//!
//! Direction is where the wind blows *from*, in degrees clockwise from north:
//! a southerly wind (`v > 0`) has direction 180°, a westerly (`u > 0`) 270°.
//! Directions lie in `(0, 360]`, with calm air (`u = v = 0`) reported as 0°.

use crate::support::float::Real;

/// Direction (degrees) the wind blows from, given its components.
///
/// ```
/// use atmos_thermo::support::thermo::wind_direction;
///
/// assert_eq!(wind_direction(0.0_f64, -5.0), 360.0);
/// assert_eq!(wind_direction(5.0_f64, 0.0), 270.0);
/// assert_eq!(wind_direction(0.0_f64, 0.0), 0.0);
/// ```
#[inline]
pub fn wind_direction<T: Real>(u: T, v: T) -> T {
    if u == T::zero() && v == T::zero() {
        return T::zero();
    }

    let full = T::lit(360.0);
    let direction = T::lit(90.0) - (-v).atan2(-u).to_degrees();
    if direction <= T::zero() {
        direction + full
    } else {
        direction
    }
}

/// Wind speed, in the units of `u` and `v`.
#[inline]
pub fn wind_magnitude<T: Real>(u: T, v: T) -> T {
    u.hypot(v)
}

/// Components `(u, v)` of a wind blowing from `direction` (degrees) at `magnitude`.
#[inline]
pub fn wind_components<T: Real>(direction: T, magnitude: T) -> (T, T) {
    let (sin, cos) = direction.to_radians().sin_cos();
    (-magnitude * sin, -magnitude * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn cardinal_directions() {
        assert_relative_eq!(wind_direction(0.0, -1.0), 360.0);
        assert_relative_eq!(wind_direction(-1.0, 0.0), 90.0);
        assert_relative_eq!(wind_direction(0.0, 1.0), 180.0);
        assert_relative_eq!(wind_direction(1.0, 0.0), 270.0);
        assert_relative_eq!(wind_direction(1.0_f32, 1.0), 225.0);
    }

    #[test]
    fn calm_and_missing() {
        assert_eq!(wind_direction(0.0, 0.0), 0.0);
        assert_eq!(wind_magnitude(0.0, 0.0), 0.0);
        assert!(wind_direction(f64::NAN, 1.0).is_nan());
        assert!(wind_magnitude(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn components_of_westerly() {
        let (u, v) = wind_components(270.0, 10.0);
        assert_relative_eq!(u, 10.0, epsilon = 1e-12);
        assert_relative_eq!(v, 0.0, epsilon = 1e-12);
        assert_relative_eq!(wind_magnitude(3.0, -4.0), 5.0);
    }

    proptest! {
        #[test]
        fn components_round_trip(direction in 1.0..360.0_f64, speed in 0.1..80.0_f64) {
            let (u, v) = wind_components(direction, speed);
            prop_assert!((wind_direction(u, v) - direction).abs() < 1e-9);
            prop_assert!((wind_magnitude(u, v) - speed).abs() < 1e-9);
        }
    }
}
