//! Parcel lifting models.
//!
//! Both models take a validated [`Parcel`] and a [`SolverConfig`]. A solve
//! that exhausts its iteration budget is reported as
//! [`ParcelError::NotConverged`] instead of the engine's `NaN`.
//!
//! ```
//! use atmos_thermo::models::atmosphere::parcel::{LiftingCondensationLevel, Parcel};
//! use twine_core::Model;
//! use uom::si::{
//!     f64::{Pressure, ThermodynamicTemperature},
//!     pressure::hectopascal,
//!     thermodynamic_temperature::degree_celsius,
//! };
//!
//! let parcel = Parcel::new(
//!     Pressure::new::<hectopascal>(1000.0),
//!     ThermodynamicTemperature::new::<degree_celsius>(30.0),
//!     ThermodynamicTemperature::new::<degree_celsius>(20.0),
//! )
//! .unwrap();
//!
//! let lcl = LiftingCondensationLevel::default().call(&parcel).unwrap();
//! assert!((lcl.pressure.get::<hectopascal>() - 864.8).abs() < 0.1);
//! ```

mod error;
mod input;

use twine_core::Model;
use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::support::thermo::{self, SolverConfig};

pub use error::ParcelError;
pub use input::Parcel;

/// The point where a lifted parcel saturates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LclPoint {
    /// Pressure at the lifting condensation level.
    pub pressure: Pressure,
    /// Temperature at the lifting condensation level.
    pub temperature: ThermodynamicTemperature,
}

/// Lifts a parcel dry-adiabatically to its lifting condensation level.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LiftingCondensationLevel {
    /// Tolerance and iteration budget for the fixed-point solve.
    pub config: SolverConfig,
}

impl Model for LiftingCondensationLevel {
    type Input = Parcel;
    type Output = LclPoint;
    type Error = ParcelError;

    fn call(&self, parcel: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.config.validate()?;

        let (p, t, td) = parcel.si();
        let (p_lcl, t_lcl) = thermo::lcl(p, t, td, self.config.eps, self.config.max_iters);
        if p_lcl.is_nan() || t_lcl.is_nan() {
            return Err(ParcelError::NotConverged { solver: "lcl" });
        }

        Ok(LclPoint {
            pressure: Pressure::new::<pascal>(p_lcl),
            temperature: ThermodynamicTemperature::new::<kelvin>(t_lcl),
        })
    }
}

/// Wet-bulb temperature of a parcel.
///
/// Lifts the parcel to its LCL, then descends the moist adiabat back to the
/// parcel's pressure.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WetBulbTemperature {
    /// Solver settings for both the LCL solve and the moist descent.
    pub config: SolverConfig,
}

impl Model for WetBulbTemperature {
    type Input = Parcel;
    type Output = ThermodynamicTemperature;
    type Error = ParcelError;

    fn call(&self, parcel: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.config.validate()?;

        let (p, t, td) = parcel.si();
        let wet_bulb = thermo::wet_bulb_temperature(p, t, td, &self.config);
        if wet_bulb.is_nan() {
            return Err(ParcelError::NotConverged {
                solver: "wet_bulb_temperature",
            });
        }

        Ok(ThermodynamicTemperature::new::<kelvin>(wet_bulb))
    }
}
