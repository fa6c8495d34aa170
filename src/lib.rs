//! # Atmos Thermo
//!
//! Atmospheric thermodynamics for scalar and array inputs: dewpoint, potential
//! temperature, lifting condensation level, moist adiabats, wet-bulb
//! temperature, and wind component conversions.
//!
//! ## Crate layout
//!
//! - [`support`]: The numeric engine. Closed-form formulas, a fixed-point root
//!   finder, a two-stage ODE stepper, the parcel solvers built from them, and
//!   monotonic profile search. Everything is generic over [`support::float::Real`].
//! - [`dispatch`]: Applies any of the above elementwise across same-length
//!   arrays of one precision, optionally in parallel.
//! - [`models`]: [`twine_core::Model`] adapters taking [`uom`] quantities.
//!
//! ## Failure model
//!
//! Kernels never fail. Inputs outside a formula's domain, and iterative
//! solvers that exhaust their budget, produce `NaN`. Only call-level
//! configuration problems (mismatched lengths or precisions, invalid solver
//! settings) are reported as errors, and always before any element is computed.

pub mod dispatch;
pub mod models;
pub mod support;
