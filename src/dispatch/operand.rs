use super::DispatchError;

/// One input of an elementwise call.
///
/// A [`Scalar`](Operand::Scalar) and a length-1 [`Array`](Operand::Array)
/// both broadcast: the same value is used at every index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a, T> {
    /// A single value repeated at every index.
    Scalar(T),
    /// One value per index.
    Array(&'a [T]),
}

impl<T: Copy> Operand<'_, T> {
    /// Returns the length this operand imposes on the call, or `None` if it broadcasts.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Array(values) if values.len() != 1 => Some(values.len()),
            _ => None,
        }
    }

    /// Returns `true` if this operand is an empty array.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// The value used at index `i`.
    ///
    /// `i` must be in bounds for a non-broadcasting array.
    #[inline]
    pub(crate) fn at(&self, i: usize) -> T {
        match self {
            Self::Scalar(value) => *value,
            Self::Array([value]) => *value,
            Self::Array(values) => values[i],
        }
    }
}

macro_rules! scalar_operand {
    ($($float:ty),*) => {
        $(
            impl From<$float> for Operand<'_, $float> {
                fn from(value: $float) -> Self {
                    Self::Scalar(value)
                }
            }
        )*
    };
}

scalar_operand!(f32, f64);

impl<'a, T> From<&'a [T]> for Operand<'a, T> {
    fn from(values: &'a [T]) -> Self {
        Self::Array(values)
    }
}

impl<'a, T> From<&'a Vec<T>> for Operand<'a, T> {
    fn from(values: &'a Vec<T>) -> Self {
        Self::Array(values)
    }
}

impl<'a, T, const N: usize> From<&'a [T; N]> for Operand<'a, T> {
    fn from(values: &'a [T; N]) -> Self {
        Self::Array(values)
    }
}

/// Resolves the common length of a set of operands.
///
/// Returns `None` if every operand broadcasts.
///
/// # Errors
///
/// Returns [`DispatchError::LengthMismatch`] naming the first operand whose
/// length differs from the earliest non-broadcasting one.
pub(crate) fn common_len<T: Copy>(
    operands: &[Operand<'_, T>],
) -> Result<Option<usize>, DispatchError> {
    let mut expected: Option<usize> = None;
    for (position, operand) in operands.iter().enumerate() {
        let Some(found) = operand.len() else {
            continue;
        };
        match expected {
            None => expected = Some(found),
            Some(expected) if expected != found => {
                return Err(DispatchError::LengthMismatch {
                    position,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
    }
    Ok(expected)
}

/// Checks output buffers against the resolved input length.
///
/// Without a resolved input length the first output sets it.
pub(crate) fn output_len(
    expected: Option<usize>,
    outputs: impl IntoIterator<Item = usize>,
) -> Result<usize, DispatchError> {
    let mut expected = expected;
    for (position, found) in outputs.into_iter().enumerate() {
        match expected {
            None => expected = Some(found),
            Some(expected) if expected != found => {
                return Err(DispatchError::OutputLength {
                    position,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
    }
    Ok(expected.unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcasting() {
        let one = [5.0];
        let many = [1.0, 2.0, 3.0];

        assert_eq!(Operand::Scalar(2.0).len(), None);
        assert_eq!(Operand::from(&one).len(), None);
        assert_eq!(Operand::from(&many).len(), Some(3));
        assert!(Operand::<f64>::Array(&[]).is_empty());

        assert_eq!(Operand::Scalar(2.0).at(7), 2.0);
        assert_eq!(Operand::from(&one).at(2), 5.0);
        assert_eq!(Operand::from(&many).at(2), 3.0);
    }

    #[test]
    fn resolves_lengths() {
        let a = [1.0_f32, 2.0];
        let b = [1.0_f32, 2.0, 3.0];

        assert_eq!(common_len::<f32>(&[]).unwrap(), None);
        assert_eq!(common_len(&[Operand::Scalar(1.0_f32), Operand::from(&a)]).unwrap(), Some(2));

        let err = common_len(&[Operand::from(&a), Operand::Scalar(1.0), Operand::from(&b)])
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::LengthMismatch { position: 2, expected: 2, found: 3 }
        ));
    }

    #[test]
    fn outputs_follow_inputs() {
        assert_eq!(output_len(Some(4), [4, 4]).unwrap(), 4);
        assert_eq!(output_len(None, [6]).unwrap(), 6);
        assert_eq!(output_len(None, []).unwrap(), 1);
        assert!(matches!(
            output_len(Some(4), [4, 3]).unwrap_err(),
            DispatchError::OutputLength { position: 1, expected: 4, found: 3 }
        ));
    }
}
