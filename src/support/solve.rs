//! Derivative-free iterative solvers used by the parcel computations.
//!
//! - [`fixed_point`]: Steffensen-accelerated fixed-point iteration.
//! - [`rk2`]: Fixed-subdivision midpoint integration of a scalar ODE.
//!
//! Both take their problem as a strategy value ([`UpdateFn`] or [`RateFn`])
//! carrying only the physical parameters it needs. Neither allocates.
//! [`fixed_point`] stops after its iteration budget. [`rk2`] takes
//! `|x1 - x0| / step_hint` substeps, which no setting caps, so its cost is
//! bounded only by the span and hint it is given.

pub mod fixed_point;
pub mod rk2;

pub use fixed_point::{FixedPointSolution, Status, UpdateFn, fixed_point, fixed_point_solve};
pub use rk2::{RateFn, rk2, substeps};
