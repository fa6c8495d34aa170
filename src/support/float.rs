//! Floating-point precision abstraction.
//!
//! Every formula and solver in this crate is generic over [`Real`], which is
//! resolved once per call by monomorphization. A single call never mixes
//! precisions.

use std::fmt::{self, Debug, Display};

use num_traits::{Float, FloatConst};

/// Width of a floating-point element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    /// 32-bit `f32`.
    Single,
    /// 64-bit `f64`.
    Double,
}

impl Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "f32"),
            Self::Double => write!(f, "f64"),
        }
    }
}

/// A floating-point element type the numeric engine can run on.
///
/// Implemented for `f32` and `f64`.
pub trait Real: Float + FloatConst + Debug + Default + Send + Sync + 'static {
    /// The precision tag for this type.
    const PRECISION: Precision;

    /// Converts an `f64` constant into this precision.
    ///
    /// Narrowing to `f32` rounds to nearest.
    fn lit(value: f64) -> Self;
}

impl Real for f32 {
    const PRECISION: Precision = Precision::Single;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn lit(value: f64) -> Self {
        value as f32
    }
}

impl Real for f64 {
    const PRECISION: Precision = Precision::Double;

    #[inline]
    fn lit(value: f64) -> Self {
        value
    }
}
