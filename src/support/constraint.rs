//! Numeric constraints checked at construction time.
//!
//! Solver settings and typed model inputs carry invariants such as "the
//! convergence tolerance is strictly positive". This module expresses those
//! invariants once, as marker types implementing [`Constraint<T>`], so they
//! are checked the same way everywhere.
//!
//! # Provided constraints
//!
//! - [`StrictlyPositive`]: Greater than zero
//!
//! Callers check a value with [`Constraint::check`] and map the
//! [`ConstraintError`] into their own error, naming the offending field.

mod strictly_positive;

use thiserror::Error;

pub use strictly_positive::StrictlyPositive;

/// A trait for enforcing numeric invariants.
///
/// Implement this trait for a zero-sized marker type representing a numeric
/// constraint, such as [`StrictlyPositive`].
pub trait Constraint<T> {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value does not satisfy the constraint.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
}
