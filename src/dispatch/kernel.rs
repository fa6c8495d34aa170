use std::fmt;

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    float::Real,
    thermo::{self, SolverConfig, SolverConfigError},
};

/// An operation the dispatcher can apply elementwise.
///
/// Each variant documents its inputs in call order and its outputs. Solver
/// kernels carry their [`SolverConfig`]; the defaults reproduce the published
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum Kernel {
    /// `(T) -> e`
    SaturationVaporPressure,
    /// `(p, r) -> e`
    VaporPressure,
    /// `(e, p) -> r`
    MixingRatio,
    /// `(p, T) -> r`
    SaturationMixingRatio,
    /// `(T, r) -> Tv`
    VirtualTemperature,
    /// `(e) -> Td`
    Dewpoint,
    /// `(p, r) -> Td`
    DewpointFromMixingRatio,
    /// `(p) -> π`
    ExnerFunction {
        /// Reference pressure (Pa).
        reference_pressure: f64,
    },
    /// `(p, T) -> θ`
    PotentialTemperature {
        /// Reference pressure (Pa).
        reference_pressure: f64,
    },
    /// `(p, T_ref, p_ref) -> T`
    DryLapse,
    /// `(p, T, Td) -> θe`
    EquivalentPotentialTemperature,
    /// `(p, T, Td) -> θw`
    WetBulbPotentialTemperature,
    /// `(T) -> Δθ`
    Wobus,
    /// `(u, v) -> direction`
    WindDirection,
    /// `(u, v) -> speed`
    WindMagnitude,
    /// `(direction, speed) -> (u, v)`
    WindComponents,
    /// `(p, p_next, T) -> T_next`
    MoistLapse {
        /// Largest pressure substep (Pa).
        step: f64,
    },
    /// `(p, T, Td) -> p_lcl`
    LclPressure(SolverConfig),
    /// `(p, T, Td) -> (p_lcl, T_lcl)`
    Lcl(SolverConfig),
    /// `(p, T, Td) -> T_wb`
    WetBulbTemperature(SolverConfig),
}

impl Kernel {
    /// Potential temperature referenced to 1000 hPa.
    pub const POTENTIAL_TEMPERATURE: Self = Self::PotentialTemperature {
        reference_pressure: crate::support::constants::P0,
    };

    /// Exner function referenced to 1000 hPa.
    pub const EXNER_FUNCTION: Self = Self::ExnerFunction {
        reference_pressure: crate::support::constants::P0,
    };

    /// Moist adiabat with the default step.
    pub const MOIST_LAPSE: Self = Self::MoistLapse {
        step: thermo::DEFAULT_STEP,
    };

    /// Operation name, as used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SaturationVaporPressure => "saturation_vapor_pressure",
            Self::VaporPressure => "vapor_pressure",
            Self::MixingRatio => "mixing_ratio",
            Self::SaturationMixingRatio => "saturation_mixing_ratio",
            Self::VirtualTemperature => "virtual_temperature",
            Self::Dewpoint => "dewpoint",
            Self::DewpointFromMixingRatio => "dewpoint_from_mixing_ratio",
            Self::ExnerFunction { .. } => "exner_function",
            Self::PotentialTemperature { .. } => "potential_temperature",
            Self::DryLapse => "dry_lapse",
            Self::EquivalentPotentialTemperature => "equivalent_potential_temperature",
            Self::WetBulbPotentialTemperature => "wet_bulb_potential_temperature",
            Self::Wobus => "wobus",
            Self::WindDirection => "wind_direction",
            Self::WindMagnitude => "wind_magnitude",
            Self::WindComponents => "wind_components",
            Self::MoistLapse { .. } => "moist_lapse",
            Self::LclPressure(_) => "lcl_pressure",
            Self::Lcl(_) => "lcl",
            Self::WetBulbTemperature(_) => "wet_bulb_temperature",
        }
    }

    /// Number of inputs.
    pub fn inputs(&self) -> usize {
        match self {
            Self::SaturationVaporPressure
            | Self::Dewpoint
            | Self::Wobus
            | Self::ExnerFunction { .. } => 1,
            Self::VaporPressure
            | Self::MixingRatio
            | Self::SaturationMixingRatio
            | Self::VirtualTemperature
            | Self::DewpointFromMixingRatio
            | Self::PotentialTemperature { .. }
            | Self::WindDirection
            | Self::WindMagnitude
            | Self::WindComponents => 2,
            Self::DryLapse
            | Self::EquivalentPotentialTemperature
            | Self::WetBulbPotentialTemperature
            | Self::MoistLapse { .. }
            | Self::LclPressure(_)
            | Self::Lcl(_)
            | Self::WetBulbTemperature(_) => 3,
        }
    }

    /// Number of outputs.
    pub fn outputs(&self) -> usize {
        match self {
            Self::WindComponents | Self::Lcl(_) => 2,
            _ => 1,
        }
    }

    /// Checks the kernel's parameters.
    ///
    /// # Errors
    ///
    /// Returns the first parameter that is not strictly positive.
    pub fn validate(&self) -> Result<(), SolverConfigError> {
        let positive = |field, value: f64| {
            StrictlyPositive::check(&value).map_err(|source| SolverConfigError { field, source })
        };

        match self {
            Self::ExnerFunction { reference_pressure }
            | Self::PotentialTemperature { reference_pressure } => {
                positive("reference_pressure", *reference_pressure)
            }
            Self::MoistLapse { step } => positive("step", *step),
            Self::LclPressure(config) | Self::Lcl(config) | Self::WetBulbTemperature(config) => {
                config.validate()
            }
            _ => Ok(()),
        }
    }

    /// Evaluates the kernel at one index.
    ///
    /// Unused inputs are ignored. Single-output kernels return `NaN` as the
    /// second value.
    #[inline]
    pub fn eval<T: Real>(&self, [a, b, c]: [T; 3]) -> (T, T) {
        let single = |value: T| (value, T::nan());

        match self {
            Self::SaturationVaporPressure => single(thermo::saturation_vapor_pressure(a)),
            Self::VaporPressure => single(thermo::vapor_pressure(a, b)),
            Self::MixingRatio => single(thermo::mixing_ratio(a, b)),
            Self::SaturationMixingRatio => single(thermo::saturation_mixing_ratio(a, b)),
            Self::VirtualTemperature => single(thermo::virtual_temperature(a, b)),
            Self::Dewpoint => single(thermo::dewpoint(a)),
            Self::DewpointFromMixingRatio => single(thermo::dewpoint_from_mixing_ratio(a, b)),
            Self::ExnerFunction { reference_pressure } => {
                single(thermo::exner_function(a, T::lit(*reference_pressure)))
            }
            Self::PotentialTemperature { reference_pressure } => {
                single(thermo::potential_temperature_at(a, b, T::lit(*reference_pressure)))
            }
            Self::DryLapse => single(thermo::dry_lapse(a, b, c)),
            Self::EquivalentPotentialTemperature => {
                single(thermo::equivalent_potential_temperature(a, b, c))
            }
            Self::WetBulbPotentialTemperature => {
                single(thermo::wet_bulb_potential_temperature(a, b, c))
            }
            Self::Wobus => single(thermo::wobus(a)),
            Self::WindDirection => single(thermo::wind_direction(a, b)),
            Self::WindMagnitude => single(thermo::wind_magnitude(a, b)),
            Self::WindComponents => thermo::wind_components(a, b),
            Self::MoistLapse { step } => single(thermo::moist_lapse(a, b, c, T::lit(*step))),
            Self::LclPressure(config) => single(thermo::lcl_pressure(
                a,
                b,
                c,
                T::lit(config.eps),
                config.max_iters,
            )),
            Self::Lcl(config) => thermo::lcl(a, b, c, T::lit(config.eps), config.max_iters),
            Self::WetBulbTemperature(config) => {
                single(thermo::wet_bulb_temperature(a, b, c, config))
            }
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
