use thiserror::Error;

use crate::support::{float::Precision, thermo::SolverConfigError};

/// A dispatch call was rejected before any element was computed.
///
/// These are the only failures the dispatcher reports. Per-element problems,
/// such as out-of-domain inputs or a solver running out of iterations, show
/// up as `NaN` in the outputs instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    /// Two non-broadcasting inputs have different lengths.
    #[error("input {position} has {found} elements, expected {expected}")]
    LengthMismatch {
        /// Index of the offending input.
        position: usize,
        /// Length of the first non-broadcasting input.
        expected: usize,
        /// Length of the offending input.
        found: usize,
    },

    /// An output buffer does not match the input length.
    #[error("output {position} has {found} elements, expected {expected}")]
    OutputLength {
        /// Index of the offending output.
        position: usize,
        /// Required length.
        expected: usize,
        /// Length of the offending output.
        found: usize,
    },

    /// Wrong number of inputs for the kernel.
    #[error("`{kernel}` takes {expected} inputs, got {found}")]
    InputArity {
        /// Kernel name.
        kernel: &'static str,
        /// Number of inputs the kernel takes.
        expected: usize,
        /// Number of inputs supplied.
        found: usize,
    },

    /// Wrong number of outputs for the kernel.
    #[error("`{kernel}` produces {expected} outputs, got {found} buffers")]
    OutputArity {
        /// Kernel name.
        kernel: &'static str,
        /// Number of outputs the kernel produces.
        expected: usize,
        /// Number of buffers supplied.
        found: usize,
    },

    /// Buffers of one call do not share a precision.
    #[error("{role} {position} is {found}, but the call runs in {expected}")]
    PrecisionMismatch {
        /// `"input"` or `"output"`.
        role: &'static str,
        /// Index of the offending buffer within its role.
        position: usize,
        /// Precision of the call, taken from its first buffer.
        expected: Precision,
        /// Precision of the offending buffer.
        found: Precision,
    },

    /// A batch of profiles does not tile its buffers.
    #[error("{rows} profiles of {levels} levels need {expected} values, got {found}")]
    ProfileShape {
        /// Number of profiles in the batch.
        rows: usize,
        /// Number of levels per profile.
        levels: usize,
        /// Values required.
        expected: usize,
        /// Values supplied.
        found: usize,
    },

    /// A kernel parameter or solver setting is invalid.
    #[error(transparent)]
    InvalidConfig(#[from] SolverConfigError),

    /// The worker pool for the call could not be built.
    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
