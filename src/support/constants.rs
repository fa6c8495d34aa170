//! Physical constants (SI units).
//!
//! Stored as `f64` and narrowed with [`Real::lit`](super::float::Real::lit)
//! where a formula runs in single precision.

/// Freezing point of water (K).
pub const T0: f64 = 273.15;

/// Saturation vapor pressure over water at [`T0`] (Pa).
pub const E0: f64 = 611.21;

/// Specific heat of dry air at constant pressure (J/kg·K).
pub const CPD: f64 = 1004.666_218_420_146_2;

/// Gas constant for dry air (J/kg·K).
pub const RD: f64 = 287.047_490_977_184_57;

/// Gas constant for water vapor (J/kg·K).
pub const RV: f64 = 461.523_115_726_060_84;

/// Latent heat of vaporization (J/kg).
pub const LV: f64 = 2_501_000.0;

/// Ratio of the dry air and water vapor gas constants.
pub const EPSILON: f64 = RD / RV;

/// Poisson exponent `Rd / Cpd`.
pub const KAPPA: f64 = RD / CPD;

/// Reference pressure for potential temperature (Pa).
pub const P0: f64 = 100_000.0;
