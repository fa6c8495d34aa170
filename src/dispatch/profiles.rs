//! Batched vertical profiles.
//!
//! A batch is a row-major `rows × levels` buffer with one profile per row.
//! Rows are independent and are distributed across threads whole; levels
//! within a row are computed in order because each seeds the next.

use rayon::prelude::*;

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    float::Real,
    thermo::{self, SolverConfig, SolverConfigError},
};

use super::{DispatchError, Dispatcher, Operand, Parallelism, operand::common_len};

/// Pressure levels for a batch of profiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Levels<'a, T> {
    /// Every row uses the same levels.
    Shared(&'a [T]),
    /// Each row has its own levels, stored row-major.
    PerRow {
        /// `rows × levels` values.
        values: &'a [T],
        /// Number of levels per row.
        levels: usize,
    },
}

impl<'a, T> Levels<'a, T> {
    /// Number of levels per row.
    pub fn levels(&self) -> usize {
        match self {
            Self::Shared(values) => values.len(),
            Self::PerRow { levels, .. } => *levels,
        }
    }

    /// Levels of row `row`.
    pub(super) fn row(&self, row: usize) -> &'a [T] {
        match *self {
            Self::Shared(values) => values,
            Self::PerRow { values, levels } => &values[row * levels..(row + 1) * levels],
        }
    }

    /// Number of rows the levels imply, if they imply one.
    pub(super) fn rows(&self) -> Result<Option<usize>, DispatchError> {
        match *self {
            Self::Shared(_) => Ok(None),
            Self::PerRow { values, levels } if levels == 0 => {
                if values.is_empty() {
                    Ok(None)
                } else {
                    Err(DispatchError::ProfileShape {
                        rows: 0,
                        levels,
                        expected: 0,
                        found: values.len(),
                    })
                }
            }
            Self::PerRow { values, levels } => {
                let rows = values.len().div_ceil(levels);
                if rows * levels == values.len() {
                    Ok(Some(rows))
                } else {
                    Err(DispatchError::ProfileShape {
                        rows,
                        levels,
                        expected: rows * levels,
                        found: values.len(),
                    })
                }
            }
        }
    }
}

impl Dispatcher {
    /// Integrates one moist adiabat per row.
    ///
    /// Row `i` starts at `(reference_pressure[i], temperature[i])` and is
    /// written to `out[i * levels..(i + 1) * levels]`, following
    /// [`moist_lapse_profile`](thermo::moist_lapse_profile).
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if `step` is not strictly positive or the
    /// buffers do not describe the same number of rows.
    pub fn moist_lapse_profiles<T: Real>(
        &self,
        levels: Levels<'_, T>,
        temperature: Operand<'_, T>,
        reference_pressure: Operand<'_, T>,
        step: T,
        out: &mut [T],
    ) -> Result<(), DispatchError> {
        self.traced("moist_lapse_profiles", out.len(), || {
            StrictlyPositive::check(&step)
                .map_err(|source| SolverConfigError { field: "step", source })?;
            let nlev = profile_shape(&levels, &[temperature, reference_pressure], out.len())?;

            self.execute(out.len(), || {
                self.fill_rows(out, nlev, |row, chunk| {
                    thermo::moist_lapse_profile_into(
                        levels.row(row),
                        temperature.at(row),
                        reference_pressure.at(row),
                        step,
                        chunk,
                    );
                });
            })
        })
    }

    /// Lifts one parcel per row from its first level.
    ///
    /// Row `i` starts at the first of its levels with `temperature[i]` and
    /// `dewpoint[i]`, following [`parcel_profile`](thermo::parcel_profile).
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if `config` is invalid or the buffers do
    /// not describe the same number of rows.
    pub fn parcel_profiles<T: Real>(
        &self,
        levels: Levels<'_, T>,
        temperature: Operand<'_, T>,
        dewpoint: Operand<'_, T>,
        config: &SolverConfig,
        out: &mut [T],
    ) -> Result<(), DispatchError> {
        self.traced("parcel_profiles", out.len(), || {
            config.validate()?;
            let nlev = profile_shape(&levels, &[temperature, dewpoint], out.len())?;

            self.execute(out.len(), || {
                self.fill_rows(out, nlev, |row, chunk| {
                    thermo::parcel_profile_into(
                        levels.row(row),
                        temperature.at(row),
                        dewpoint.at(row),
                        config,
                        chunk,
                    );
                });
            })
        })
    }

    /// Calls `f` with each row of `out`.
    pub(super) fn fill_rows<T, F>(&self, out: &mut [T], levels: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        if levels == 0 {
            return;
        }

        if self.parallelism == Parallelism::Sequential {
            for (row, chunk) in out.chunks_mut(levels).enumerate() {
                f(row, chunk);
            }
        } else {
            out.par_chunks_mut(levels)
                .enumerate()
                .for_each(|(row, chunk)| f(row, chunk));
        }
    }
}

/// Checks that levels, per-row inputs and the output agree on the row count.
///
/// Returns the number of levels per row.
fn profile_shape<T: Copy>(
    levels: &Levels<'_, T>,
    per_row: &[Operand<'_, T>],
    out_len: usize,
) -> Result<usize, DispatchError> {
    let nlev = levels.levels();
    let from_inputs = common_len(per_row)?;
    let from_levels = levels.rows()?;

    let rows = match (from_inputs, from_levels) {
        (Some(inputs), Some(level_rows)) if inputs != level_rows => {
            return Err(DispatchError::ProfileShape {
                rows: inputs,
                levels: nlev,
                expected: inputs * nlev,
                found: level_rows * nlev,
            });
        }
        (Some(rows), _) | (None, Some(rows)) => rows,
        (None, None) if nlev == 0 => 0,
        (None, None) => out_len.div_ceil(nlev),
    };

    let expected = rows * nlev;
    if out_len != expected {
        return Err(DispatchError::ProfileShape {
            rows,
            levels: nlev,
            expected,
            found: out_len,
        });
    }
    Ok(nlev)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::num::NonZeroUsize;

    use approx::assert_relative_eq;

    #[test]
    fn shared_levels() {
        let levels = [100_000.0, 85_000.0, 70_000.0];
        let temperature = [300.0, 290.0];
        let mut out = [0.0; 6];

        Dispatcher::default()
            .with_min_len(1)
            .moist_lapse_profiles(
                Levels::Shared(&levels),
                (&temperature).into(),
                Operand::Scalar(100_000.0),
                1000.0,
                &mut out,
            )
            .unwrap();

        for (row, t) in temperature.iter().enumerate() {
            let expected = thermo::moist_lapse_profile(&levels, *t, 100_000.0, 1000.0);
            assert_eq!(&out[row * 3..(row + 1) * 3], expected.as_slice());
        }
    }

    #[test]
    fn per_row_levels() {
        let levels = [100_000.0, 90_000.0, 95_000.0, 80_000.0];
        let mut out = [0.0_f32; 4];
        let config = SolverConfig::default();

        let threads = NonZeroUsize::new(2).unwrap();
        Dispatcher::default()
            .with_parallelism(Parallelism::Threads(threads))
            .parcel_profiles(
                Levels::PerRow {
                    values: &levels,
                    levels: 2,
                },
                Operand::Scalar(300.0),
                Operand::Scalar(290.0),
                &config,
                &mut out,
            )
            .unwrap();

        let first = thermo::parcel_profile(&levels[..2], 300.0, 290.0, &config);
        let second = thermo::parcel_profile(&levels[2..], 300.0, 290.0, &config);
        assert_eq!(&out[..2], first.as_slice());
        assert_eq!(&out[2..], second.as_slice());
        assert_relative_eq!(out[2], 300.0);
    }

    #[test]
    fn rejects_ragged_batches() {
        let levels = [100_000.0, 90_000.0, 80_000.0];
        let mut out = [0.0; 4];

        let err = Dispatcher::default()
            .moist_lapse_profiles(
                Levels::Shared(&levels),
                Operand::Scalar(300.0),
                Operand::Scalar(100_000.0),
                1000.0,
                &mut out,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::ProfileShape { rows: 2, levels: 3, expected: 6, found: 4 }
        ));

        let err = Dispatcher::default()
            .parcel_profiles(
                Levels::PerRow {
                    values: &levels,
                    levels: 2,
                },
                Operand::Scalar(300.0),
                Operand::Scalar(290.0),
                &SolverConfig::default(),
                &mut out,
            )
            .unwrap_err();
        assert!(matches!(err, DispatchError::ProfileShape { found: 3, .. }));
    }

    #[test]
    fn rejects_bad_step() {
        let levels = [100_000.0];
        let mut out = [0.0];

        let err = Dispatcher::default()
            .moist_lapse_profiles(
                Levels::Shared(&levels),
                Operand::Scalar(300.0),
                Operand::Scalar(100_000.0),
                0.0,
                &mut out,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::InvalidConfig(SolverConfigError { field: "step", .. })
        ));
    }

    #[test]
    fn empty_batches() {
        let mut out: [f64; 0] = [];

        Dispatcher::default()
            .moist_lapse_profiles(
                Levels::Shared(&[]),
                Operand::Scalar(300.0),
                Operand::Scalar(100_000.0),
                1000.0,
                &mut out,
            )
            .unwrap();

        let temperature: [f64; 0] = [];
        Dispatcher::sequential()
            .parcel_profiles(
                Levels::Shared(&[100_000.0, 90_000.0]),
                (&temperature).into(),
                Operand::Scalar(290.0),
                &SolverConfig::default(),
                &mut out,
            )
            .unwrap();
    }
}
