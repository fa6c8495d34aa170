use thiserror::Error;
use uom::si::{f64::TemperatureInterval, temperature_interval::kelvin as delta_kelvin};

use crate::support::{constraint::ConstraintError, thermo::SolverConfigError};

/// Errors that can occur while building or lifting a [`Parcel`](super::Parcel).
#[derive(Debug, Error)]
pub enum ParcelError {
    /// A parcel quantity is infinite or `NaN`.
    #[error("parcel {field} is not finite")]
    NonFinite {
        /// The offending quantity.
        field: &'static str,
    },

    /// A parcel quantity is outside its physical range.
    #[error("parcel {field} is out of range: {source}")]
    OutOfRange {
        /// The offending quantity.
        field: &'static str,
        /// The violated constraint.
        source: ConstraintError,
    },

    /// The dewpoint is above the temperature.
    #[error("parcel is supersaturated: depression {} K", .depression.get::<delta_kelvin>())]
    Supersaturated {
        /// Temperature minus dewpoint; always negative.
        depression: TemperatureInterval,
    },

    /// The solver settings are invalid.
    #[error(transparent)]
    InvalidConfig(#[from] SolverConfigError),

    /// The solver produced no value within its iteration budget.
    #[error("{solver} did not converge")]
    NotConverged {
        /// Name of the solve that failed.
        solver: &'static str,
    },
}
