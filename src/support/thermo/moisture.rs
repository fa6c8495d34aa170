//! Water vapor: saturation, mixing ratio, dewpoint.
//!
//! Saturation vapor pressure over liquid water uses the Bolton (1980) form of
//! the Magnus formula, and [`dewpoint`] is its exact inverse.

use crate::support::{
    constants::{E0, EPSILON, T0},
    float::Real,
};

const MAGNUS_A: f64 = 17.67;
const MAGNUS_B: f64 = 243.5;
/// `T0 - MAGNUS_B`, the temperature (K) where the Magnus denominator vanishes.
const MAGNUS_POLE: f64 = 29.65;

/// Saturation vapor pressure (Pa) at temperature `t` (K).
///
/// No domain restriction. Extreme temperatures can overflow to infinity.
///
/// ```
/// use atmos_thermo::support::thermo::saturation_vapor_pressure;
///
/// assert!((saturation_vapor_pressure(273.15_f64) - 611.21).abs() < 1e-9);
/// ```
#[inline]
pub fn saturation_vapor_pressure<T: Real>(t: T) -> T {
    let t0 = T::lit(T0);
    T::lit(E0) * (T::lit(MAGNUS_A) * (t - t0) / (t - T::lit(MAGNUS_POLE))).exp()
}

/// Mixing ratio (kg/kg) from partial vapor pressure `e` and total pressure `p`.
#[inline]
pub fn mixing_ratio<T: Real>(e: T, p: T) -> T {
    T::lit(EPSILON) * e / (p - e)
}

/// Saturation mixing ratio (kg/kg) at pressure `p` (Pa) and temperature `t` (K).
#[inline]
pub fn saturation_mixing_ratio<T: Real>(p: T, t: T) -> T {
    mixing_ratio(saturation_vapor_pressure(t), p)
}

/// Mixing ratio (kg/kg) of air at pressure `p` (Pa) with dewpoint `td` (K).
///
/// Numerically the same as [`saturation_mixing_ratio`] evaluated at the
/// dewpoint, named for how parcel solvers use it.
#[inline]
pub fn mixing_ratio_from_dewpoint<T: Real>(p: T, td: T) -> T {
    saturation_mixing_ratio(p, td)
}

/// Partial vapor pressure (Pa) at pressure `p` (Pa) and mixing ratio `r` (kg/kg).
#[inline]
pub fn vapor_pressure<T: Real>(p: T, r: T) -> T {
    p * r / (T::lit(EPSILON) + r)
}

/// Dewpoint (K) from vapor pressure `e` (Pa).
///
/// `NaN` for `e <= 0`.
#[inline]
pub fn dewpoint<T: Real>(e: T) -> T {
    let ln = (e / T::lit(E0)).ln();
    T::lit(T0) + T::lit(MAGNUS_B) * ln / (T::lit(MAGNUS_A) - ln)
}

/// Dewpoint (K) at pressure `p` (Pa) and mixing ratio `r` (kg/kg).
#[inline]
pub fn dewpoint_from_mixing_ratio<T: Real>(p: T, r: T) -> T {
    dewpoint(vapor_pressure(p, r))
}

/// Virtual temperature (K) of air at temperature `t` (K) and mixing ratio `r` (kg/kg).
#[inline]
pub fn virtual_temperature<T: Real>(t: T, r: T) -> T {
    let eps = T::lit(EPSILON);
    t * ((r + eps) / (eps * (T::one() + r)))
}
