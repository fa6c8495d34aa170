//! Extensions to [`uom`] used by the typed models.
//!
//! The numeric engine in [`crate::support::thermo`] works on bare floats in SI
//! units. The [`crate::models`] layer accepts [`uom`] quantities and converts
//! at the boundary.
//!
//! ## Temperature differences
//!
//! The [`TemperatureDifference`] trait provides a [`minus`](TemperatureDifference::minus)
//! method for subtracting one absolute temperature from another, for example
//! to get a dewpoint depression:
//!
//! ```
//! use uom::si::f64::ThermodynamicTemperature;
//! use uom::si::temperature_interval::kelvin as delta_kelvin;
//! use uom::si::thermodynamic_temperature::degree_celsius;
//! use atmos_thermo::support::units::TemperatureDifference;
//!
//! let temperature = ThermodynamicTemperature::new::<degree_celsius>(30.0);
//! let dewpoint = ThermodynamicTemperature::new::<degree_celsius>(20.0);
//! let depression = temperature.minus(dewpoint);
//! assert!((depression.get::<delta_kelvin>() - 10.0).abs() < 1e-9);
//! ```

mod temperature_difference;

pub use temperature_difference::TemperatureDifference;
