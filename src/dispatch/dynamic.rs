//! Buffers whose precision is known only at runtime.

use crate::support::float::Precision;

use super::{DispatchError, Dispatcher, Kernel, Operand};

/// An input of either precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DynOperand<'a> {
    /// Single-precision input.
    F32(Operand<'a, f32>),
    /// Double-precision input.
    F64(Operand<'a, f64>),
}

impl DynOperand<'_> {
    /// Precision of this input.
    pub fn precision(&self) -> Precision {
        match self {
            Self::F32(_) => Precision::Single,
            Self::F64(_) => Precision::Double,
        }
    }
}

/// An output buffer of either precision.
#[derive(Debug, PartialEq)]
pub enum DynOutput<'a> {
    /// Single-precision output.
    F32(&'a mut [f32]),
    /// Double-precision output.
    F64(&'a mut [f64]),
}

impl DynOutput<'_> {
    /// Precision of this output.
    pub fn precision(&self) -> Precision {
        match self {
            Self::F32(_) => Precision::Single,
            Self::F64(_) => Precision::Double,
        }
    }

    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            Self::F32(out) => out.len(),
            Self::F64(out) => out.len(),
        }
    }

    /// Returns `true` if the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! dyn_buffers {
    ($float:ty, $variant:ident) => {
        impl<'a> From<Operand<'a, $float>> for DynOperand<'a> {
            fn from(operand: Operand<'a, $float>) -> Self {
                Self::$variant(operand)
            }
        }

        impl From<$float> for DynOperand<'_> {
            fn from(value: $float) -> Self {
                Self::$variant(Operand::Scalar(value))
            }
        }

        impl<'a> From<&'a [$float]> for DynOperand<'a> {
            fn from(values: &'a [$float]) -> Self {
                Self::$variant(Operand::Array(values))
            }
        }

        impl<'a> From<&'a Vec<$float>> for DynOperand<'a> {
            fn from(values: &'a Vec<$float>) -> Self {
                Self::$variant(Operand::Array(values))
            }
        }

        impl<'a> From<&'a mut [$float]> for DynOutput<'a> {
            fn from(values: &'a mut [$float]) -> Self {
                Self::$variant(values)
            }
        }

        impl<'a> From<&'a mut Vec<$float>> for DynOutput<'a> {
            fn from(values: &'a mut Vec<$float>) -> Self {
                Self::$variant(values)
            }
        }
    };
}

dyn_buffers!(f32, F32);
dyn_buffers!(f64, F64);

impl Dispatcher {
    /// Runs `kernel` over buffers of a runtime-chosen precision.
    ///
    /// The call's precision is that of the first output, or of the first
    /// input if there are no outputs. Every other buffer must match it.
    ///
    /// ```
    /// use atmos_thermo::dispatch::{DispatchError, Dispatcher, Kernel};
    ///
    /// let temperature = vec![273.15_f32, 283.15];
    /// let mut single = vec![0.0_f32; 2];
    /// let mut double = vec![0.0_f64; 2];
    ///
    /// let dispatcher = Dispatcher::default();
    /// let kernel = Kernel::SaturationVaporPressure;
    ///
    /// dispatcher
    ///     .run_dyn(&kernel, &[(&temperature).into()], &mut [(&mut single).into()])
    ///     .unwrap();
    ///
    /// let mixed =
    ///     dispatcher.run_dyn(&kernel, &[(&temperature).into()], &mut [(&mut double).into()]);
    /// assert!(matches!(mixed, Err(DispatchError::PrecisionMismatch { .. })));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::PrecisionMismatch`] if the buffers mix
    /// precisions, and otherwise any error [`Dispatcher::run`] reports.
    pub fn run_dyn(
        &self,
        kernel: &Kernel,
        inputs: &[DynOperand<'_>],
        outputs: &mut [DynOutput<'_>],
    ) -> Result<(), DispatchError> {
        let Some(expected) = outputs
            .first()
            .map(DynOutput::precision)
            .or_else(|| inputs.first().map(DynOperand::precision))
        else {
            return self.run::<f64>(kernel, &[], &mut []);
        };

        let len = outputs.first().map_or(0, DynOutput::len);
        self.traced(kernel.name(), len, || check_precision(expected, inputs, outputs))?;

        match expected {
            Precision::Single => {
                let inputs: Vec<_> = inputs
                    .iter()
                    .filter_map(|input| match input {
                        DynOperand::F32(operand) => Some(*operand),
                        DynOperand::F64(_) => None,
                    })
                    .collect();
                let mut outputs: Vec<&mut [f32]> = outputs
                    .iter_mut()
                    .filter_map(|output| match output {
                        DynOutput::F32(out) => Some(&mut **out),
                        DynOutput::F64(_) => None,
                    })
                    .collect();
                self.run(kernel, &inputs, &mut outputs)
            }
            Precision::Double => {
                let inputs: Vec<_> = inputs
                    .iter()
                    .filter_map(|input| match input {
                        DynOperand::F64(operand) => Some(*operand),
                        DynOperand::F32(_) => None,
                    })
                    .collect();
                let mut outputs: Vec<&mut [f64]> = outputs
                    .iter_mut()
                    .filter_map(|output| match output {
                        DynOutput::F64(out) => Some(&mut **out),
                        DynOutput::F32(_) => None,
                    })
                    .collect();
                self.run(kernel, &inputs, &mut outputs)
            }
        }
    }
}

/// Finds the first buffer whose precision differs from `expected`.
fn check_precision(
    expected: Precision,
    inputs: &[DynOperand<'_>],
    outputs: &[DynOutput<'_>],
) -> Result<(), DispatchError> {
    let mismatch = |role, position, found| DispatchError::PrecisionMismatch {
        role,
        position,
        expected,
        found,
    };

    if let Some((position, found)) = inputs
        .iter()
        .map(DynOperand::precision)
        .enumerate()
        .find(|(_, found)| *found != expected)
    {
        return Err(mismatch("input", position, found));
    }

    if let Some((position, found)) = outputs
        .iter()
        .map(DynOutput::precision)
        .enumerate()
        .find(|(_, found)| *found != expected)
    {
        return Err(mismatch("output", position, found));
    }

    Ok(())
}
