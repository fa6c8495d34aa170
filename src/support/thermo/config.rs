use thiserror::Error;

use crate::support::constraint::{Constraint, ConstraintError, StrictlyPositive};

/// Default convergence tolerance (relative) for the LCL solve.
pub const DEFAULT_EPS: f64 = 0.1;

/// Default integration step hint (Pa) for moist adiabats.
pub const DEFAULT_STEP: f64 = 1000.0;

/// Default iteration budget for the LCL solve.
pub const DEFAULT_MAX_ITERS: usize = 50;

/// Solver configuration shared by the LCL, moist adiabat and wet-bulb solvers.
///
/// The defaults are part of the published behavior and match the values
/// used when callers give no configuration at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Relative convergence tolerance for the fixed-point LCL solve.
    pub eps: f64,

    /// Largest pressure substep (Pa) when integrating a moist adiabat.
    pub step: f64,

    /// Iteration budget for the fixed-point LCL solve.
    pub max_iters: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            eps: DEFAULT_EPS,
            step: DEFAULT_STEP,
            max_iters: DEFAULT_MAX_ITERS,
        }
    }
}

/// A [`SolverConfig`] field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid solver setting `{field}`: {source}")]
pub struct SolverConfigError {
    /// Name of the offending field.
    pub field: &'static str,
    /// The violated constraint.
    pub source: ConstraintError,
}

impl SolverConfig {
    /// Returns this configuration with a different tolerance.
    #[must_use]
    pub fn with_eps(self, eps: f64) -> Self {
        Self { eps, ..self }
    }

    /// Returns this configuration with a different step hint.
    #[must_use]
    pub fn with_step(self, step: f64) -> Self {
        Self { step, ..self }
    }

    /// Returns this configuration with a different iteration budget.
    #[must_use]
    pub fn with_max_iters(self, max_iters: usize) -> Self {
        Self { max_iters, ..self }
    }

    /// Checks that every field is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns the first field that is zero, negative, or `NaN`.
    pub fn validate(&self) -> Result<(), SolverConfigError> {
        let tag = |field, result: Result<(), ConstraintError>| {
            result.map_err(|source| SolverConfigError { field, source })
        };

        tag("eps", StrictlyPositive::check(&self.eps))?;
        tag("step", StrictlyPositive::check(&self.step))?;
        tag("max_iters", StrictlyPositive::check(&self.max_iters))?;
        Ok(())
    }
}
