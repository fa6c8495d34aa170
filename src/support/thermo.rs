//! Atmospheric thermodynamics over bare floats in SI units.
//!
//! Pressures are in pascals, temperatures in kelvin, mixing ratios in kg/kg,
//! wind directions in meteorological degrees.
//!
//! - [`moisture`]: Vapor pressure, mixing ratio, dewpoint, virtual temperature.
//! - [`potential`]: Exner function and the potential temperatures θ, θe, θw.
//! - [`wind`]: Conversions between components and direction/magnitude.
//! - [`wobus`]: The Wobus polynomial correction.
//! - [`parcel`]: Moist adiabats, LCL and wet-bulb temperature, which combine
//!   the formulas with the solvers in [`crate::support::solve`].
//! - [`profile`]: Parcel temperatures along a column of pressure levels.
//!
//! Nothing here returns an error. Out-of-domain inputs and solver budget
//! exhaustion both come back as `NaN`.

mod config;
pub mod moisture;
pub mod parcel;
pub mod potential;
pub mod profile;
pub mod wind;
pub mod wobus;

pub use config::{DEFAULT_EPS, DEFAULT_MAX_ITERS, DEFAULT_STEP, SolverConfig, SolverConfigError};
pub use moisture::{
    dewpoint, dewpoint_from_mixing_ratio, mixing_ratio, mixing_ratio_from_dewpoint,
    saturation_mixing_ratio, saturation_vapor_pressure, vapor_pressure, virtual_temperature,
};
pub use parcel::{
    LclPressureMap, MoistLapseRate, lcl, lcl_pressure, moist_lapse, moist_lapse_rate,
    wet_bulb_temperature,
};
pub use potential::{
    dry_lapse, equivalent_potential_temperature, exner_function, potential_temperature,
    potential_temperature_at, theta_w_from_theta_e, wet_bulb_potential_temperature,
};
pub use profile::{
    moist_lapse_profile, moist_lapse_profile_into, parcel_profile, parcel_profile_into,
};
pub use wind::{wind_components, wind_direction, wind_magnitude};
pub use wobus::wobus;
