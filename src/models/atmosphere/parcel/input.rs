use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    units::TemperatureDifference,
};

use super::ParcelError;

/// An air parcel at a point in the atmosphere.
///
/// Construct with [`Parcel::new`], which guarantees finite, positive
/// quantities and a dewpoint at or below the temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parcel {
    pressure: Pressure,
    temperature: ThermodynamicTemperature,
    dewpoint: ThermodynamicTemperature,
}

impl Parcel {
    /// Creates a parcel.
    ///
    /// # Errors
    ///
    /// Returns a [`ParcelError`] if any quantity is non-finite or not strictly
    /// positive in SI units, or if the dewpoint exceeds the temperature.
    pub fn new(
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
        dewpoint: ThermodynamicTemperature,
    ) -> Result<Self, ParcelError> {
        check("pressure", pressure.get::<pascal>())?;
        check("temperature", temperature.get::<kelvin>())?;
        check("dewpoint", dewpoint.get::<kelvin>())?;

        let depression = temperature.minus(dewpoint);
        if depression.value < 0.0 {
            return Err(ParcelError::Supersaturated { depression });
        }

        Ok(Self {
            pressure,
            temperature,
            dewpoint,
        })
    }

    /// Parcel pressure.
    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    /// Parcel temperature.
    pub fn temperature(&self) -> ThermodynamicTemperature {
        self.temperature
    }

    /// Parcel dewpoint.
    pub fn dewpoint(&self) -> ThermodynamicTemperature {
        self.dewpoint
    }

    /// `(p, T, Td)` in pascals and kelvin.
    pub(super) fn si(&self) -> (f64, f64, f64) {
        (
            self.pressure.get::<pascal>(),
            self.temperature.get::<kelvin>(),
            self.dewpoint.get::<kelvin>(),
        )
    }
}

fn check(field: &'static str, value: f64) -> Result<(), ParcelError> {
    if !value.is_finite() {
        return Err(ParcelError::NonFinite { field });
    }
    StrictlyPositive::check(&value).map_err(|source| ParcelError::OutOfRange { field, source })
}
