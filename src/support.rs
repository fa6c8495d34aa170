//! Supporting numerics used by the dispatcher and the models.
//!
//! Modules here are part of the public API because they're useful on their
//! own, for example to call a formula on a single `f32` without going through
//! [`crate::dispatch`].

pub mod constants;
pub mod constraint;
pub mod float;
pub mod search;
pub mod solve;
pub mod thermo;
pub mod units;
