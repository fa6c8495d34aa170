//! Elementwise application of the numeric engine across arrays.
//!
//! A [`Dispatcher`] applies a function, or a named [`Kernel`], at every index
//! of one or more equal-length inputs and writes each result into the
//! matching slot of the output buffers. Scalars and length-1 arrays
//! broadcast. Every buffer of a call has the same element type, so a call
//! runs entirely in `f32` or entirely in `f64`; [`Dispatcher::run_dyn`]
//! enforces this for buffers whose precision is only known at runtime.
//!
//! Each index reads only its own inputs and writes only its own outputs, so
//! results do not depend on how the index range is split across threads.
//! Iterative kernels are bounded by their iteration budget and step count.
//!
//! Vertical profiles and sounding analyses run one column per row instead,
//! over row-major batches described by [`Levels`] and [`Soundings`].
//!
//! ```
//! use atmos_thermo::dispatch::{Dispatcher, Kernel, Operand};
//! use atmos_thermo::support::thermo::SolverConfig;
//!
//! let pressure = [100_000.0, 85_000.0, 70_000.0];
//! let temperature = [303.15, 293.15, 283.15];
//! let dewpoint = [293.15, 283.15, 273.15];
//!
//! let mut p_lcl = [0.0; 3];
//! let mut t_lcl = [0.0; 3];
//! Dispatcher::default()
//!     .run(
//!         &Kernel::Lcl(SolverConfig::default()),
//!         &[(&pressure).into(), (&temperature).into(), (&dewpoint).into()],
//!         &mut [&mut p_lcl, &mut t_lcl],
//!     )
//!     .unwrap();
//!
//! assert!(p_lcl.iter().zip(&pressure).all(|(lcl, p)| lcl < p));
//!
//! // Scalars broadcast against arrays.
//! let theta = Dispatcher::default()
//!     .apply2(
//!         atmos_thermo::support::thermo::potential_temperature,
//!         Operand::Scalar(100_000.0),
//!         (&temperature).into(),
//!     )
//!     .unwrap();
//! assert_eq!(theta, temperature);
//! ```
//!
//! ## Failure model
//!
//! A call either fails with a [`DispatchError`] before computing anything, or
//! fills every output slot. Mismatched lengths, arities or precisions and
//! invalid kernel parameters are rejected up front.

mod dynamic;
mod error;
mod kernel;
mod operand;
mod profiles;
mod soundings;

use std::num::NonZeroUsize;

use rayon::prelude::*;
use tracing::{debug, debug_span, warn};

use crate::support::float::Real;

pub use dynamic::{DynOperand, DynOutput};
pub use error::DispatchError;
pub use kernel::Kernel;
pub use operand::Operand;
pub use profiles::Levels;
pub use soundings::Soundings;

use operand::{common_len, output_len};

/// How a call distributes its indices across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Parallelism {
    /// Run on the calling thread.
    Sequential,
    /// Run on rayon's global pool, sized to the available parallelism.
    #[default]
    Auto,
    /// Run on a pool of exactly this many threads, built for the call and
    /// dropped when it returns.
    Threads(NonZeroUsize),
}

/// Applies functions elementwise over arrays of one precision.
///
/// A dispatcher is plain configuration. It holds no pools or buffers between
/// calls and can be shared freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatcher {
    parallelism: Parallelism,
    min_len: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            parallelism: Parallelism::Auto,
            min_len: Self::DEFAULT_MIN_LEN,
        }
    }
}

impl Dispatcher {
    /// Default smallest number of indices a parallel task processes.
    pub const DEFAULT_MIN_LEN: usize = 64;

    /// A dispatcher that runs on the calling thread.
    pub fn sequential() -> Self {
        Self::default().with_parallelism(Parallelism::Sequential)
    }

    /// Returns this dispatcher with a different parallelism.
    #[must_use]
    pub fn with_parallelism(self, parallelism: Parallelism) -> Self {
        Self {
            parallelism,
            ..self
        }
    }

    /// Returns this dispatcher with a different minimum task length.
    ///
    /// Zero is treated as one.
    #[must_use]
    pub fn with_min_len(self, min_len: usize) -> Self {
        Self {
            min_len: min_len.max(1),
            ..self
        }
    }

    /// The configured parallelism.
    pub fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    /// The configured minimum task length.
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Applies `f` to one input, writing into `out`.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if `out` does not match the input length.
    pub fn map1<T, F>(&self, f: F, a: Operand<'_, T>, out: &mut [T]) -> Result<(), DispatchError>
    where
        T: Real,
        F: Fn(T) -> T + Sync,
    {
        self.traced("map1", out.len(), || {
            let len = output_len(common_len(&[a])?, [out.len()])?;
            self.execute(len, || self.fill(out, |i| f(a.at(i))))
        })
    }

    /// Applies `f` to two inputs, writing into `out`.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if the inputs or `out` differ in length.
    pub fn map2<T, F>(
        &self,
        f: F,
        a: Operand<'_, T>,
        b: Operand<'_, T>,
        out: &mut [T],
    ) -> Result<(), DispatchError>
    where
        T: Real,
        F: Fn(T, T) -> T + Sync,
    {
        self.traced("map2", out.len(), || {
            let len = output_len(common_len(&[a, b])?, [out.len()])?;
            self.execute(len, || self.fill(out, |i| f(a.at(i), b.at(i))))
        })
    }

    /// Applies `f` to three inputs, writing into `out`.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if the inputs or `out` differ in length.
    pub fn map3<T, F>(
        &self,
        f: F,
        a: Operand<'_, T>,
        b: Operand<'_, T>,
        c: Operand<'_, T>,
        out: &mut [T],
    ) -> Result<(), DispatchError>
    where
        T: Real,
        F: Fn(T, T, T) -> T + Sync,
    {
        self.traced("map3", out.len(), || {
            let len = output_len(common_len(&[a, b, c])?, [out.len()])?;
            self.execute(len, || self.fill(out, |i| f(a.at(i), b.at(i), c.at(i))))
        })
    }

    /// Applies a two-output `f` to two inputs, writing both halves of each
    /// result at the same index.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if the inputs or outputs differ in length.
    pub fn map2_pair<T, F>(
        &self,
        f: F,
        a: Operand<'_, T>,
        b: Operand<'_, T>,
        out: (&mut [T], &mut [T]),
    ) -> Result<(), DispatchError>
    where
        T: Real,
        F: Fn(T, T) -> (T, T) + Sync,
    {
        let (first, second) = out;
        self.traced("map2_pair", first.len(), || {
            let len = output_len(common_len(&[a, b])?, [first.len(), second.len()])?;
            self.execute(len, || self.fill_pair(first, second, |i| f(a.at(i), b.at(i))))
        })
    }

    /// Applies a two-output `f` to three inputs, writing both halves of each
    /// result at the same index.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if the inputs or outputs differ in length.
    pub fn map3_pair<T, F>(
        &self,
        f: F,
        a: Operand<'_, T>,
        b: Operand<'_, T>,
        c: Operand<'_, T>,
        out: (&mut [T], &mut [T]),
    ) -> Result<(), DispatchError>
    where
        T: Real,
        F: Fn(T, T, T) -> (T, T) + Sync,
    {
        let (first, second) = out;
        self.traced("map3_pair", first.len(), || {
            let len = output_len(common_len(&[a, b, c])?, [first.len(), second.len()])?;
            self.execute(len, || {
                self.fill_pair(first, second, |i| f(a.at(i), b.at(i), c.at(i)));
            })
        })
    }

    /// Like [`map1`](Self::map1), allocating the output.
    ///
    /// A call where every input broadcasts yields one element.
    ///
    /// # Errors
    ///
    /// See [`map1`](Self::map1).
    pub fn apply1<T, F>(&self, f: F, a: Operand<'_, T>) -> Result<Vec<T>, DispatchError>
    where
        T: Real,
        F: Fn(T) -> T + Sync,
    {
        let mut out = vec![T::nan(); self.allocation_len(&[a])?];
        self.map1(f, a, &mut out)?;
        Ok(out)
    }

    /// Like [`map2`](Self::map2), allocating the output.
    ///
    /// # Errors
    ///
    /// See [`map2`](Self::map2).
    pub fn apply2<T, F>(
        &self,
        f: F,
        a: Operand<'_, T>,
        b: Operand<'_, T>,
    ) -> Result<Vec<T>, DispatchError>
    where
        T: Real,
        F: Fn(T, T) -> T + Sync,
    {
        let mut out = vec![T::nan(); self.allocation_len(&[a, b])?];
        self.map2(f, a, b, &mut out)?;
        Ok(out)
    }

    /// Like [`map3`](Self::map3), allocating the output.
    ///
    /// # Errors
    ///
    /// See [`map3`](Self::map3).
    pub fn apply3<T, F>(
        &self,
        f: F,
        a: Operand<'_, T>,
        b: Operand<'_, T>,
        c: Operand<'_, T>,
    ) -> Result<Vec<T>, DispatchError>
    where
        T: Real,
        F: Fn(T, T, T) -> T + Sync,
    {
        let mut out = vec![T::nan(); self.allocation_len(&[a, b, c])?];
        self.map3(f, a, b, c, &mut out)?;
        Ok(out)
    }

    /// Like [`map2_pair`](Self::map2_pair), allocating both outputs.
    ///
    /// # Errors
    ///
    /// See [`map2_pair`](Self::map2_pair).
    pub fn apply2_pair<T, F>(
        &self,
        f: F,
        a: Operand<'_, T>,
        b: Operand<'_, T>,
    ) -> Result<(Vec<T>, Vec<T>), DispatchError>
    where
        T: Real,
        F: Fn(T, T) -> (T, T) + Sync,
    {
        let len = self.allocation_len(&[a, b])?;
        let (mut first, mut second) = (vec![T::nan(); len], vec![T::nan(); len]);
        self.map2_pair(f, a, b, (&mut first, &mut second))?;
        Ok((first, second))
    }

    /// Like [`map3_pair`](Self::map3_pair), allocating both outputs.
    ///
    /// # Errors
    ///
    /// See [`map3_pair`](Self::map3_pair).
    pub fn apply3_pair<T, F>(
        &self,
        f: F,
        a: Operand<'_, T>,
        b: Operand<'_, T>,
        c: Operand<'_, T>,
    ) -> Result<(Vec<T>, Vec<T>), DispatchError>
    where
        T: Real,
        F: Fn(T, T, T) -> (T, T) + Sync,
    {
        let len = self.allocation_len(&[a, b, c])?;
        let (mut first, mut second) = (vec![T::nan(); len], vec![T::nan(); len]);
        self.map3_pair(f, a, b, c, (&mut first, &mut second))?;
        Ok((first, second))
    }

    /// Runs `kernel` over `inputs`, writing into `outputs`.
    ///
    /// The number of inputs and outputs must match [`Kernel::inputs`] and
    /// [`Kernel::outputs`].
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] for invalid kernel parameters, wrong
    /// arity, or mismatched lengths.
    pub fn run<T: Real>(
        &self,
        kernel: &Kernel,
        inputs: &[Operand<'_, T>],
        outputs: &mut [&mut [T]],
    ) -> Result<(), DispatchError> {
        let len_hint = outputs.first().map_or(0, |out| out.len());
        self.traced(kernel.name(), len_hint, || {
            kernel.validate()?;
            if inputs.len() != kernel.inputs() {
                return Err(DispatchError::InputArity {
                    kernel: kernel.name(),
                    expected: kernel.inputs(),
                    found: inputs.len(),
                });
            }
            if outputs.len() != kernel.outputs() {
                return Err(DispatchError::OutputArity {
                    kernel: kernel.name(),
                    expected: kernel.outputs(),
                    found: outputs.len(),
                });
            }

            let len = output_len(common_len(inputs)?, outputs.iter().map(|out| out.len()))?;

            let mut args = [Operand::Scalar(T::nan()); 3];
            args[..inputs.len()].copy_from_slice(inputs);
            let gather = |i: usize| [args[0].at(i), args[1].at(i), args[2].at(i)];

            match outputs {
                [out] => self.execute(len, || self.fill(out, |i| kernel.eval(gather(i)).0)),
                [first, second] => {
                    self.execute(len, || self.fill_pair(first, second, |i| kernel.eval(gather(i))))
                }
                _ => unreachable!("kernels have one or two outputs"),
            }
        })
    }

    /// Length of a freshly allocated output for these inputs.
    fn allocation_len<T: Copy>(&self, inputs: &[Operand<'_, T>]) -> Result<usize, DispatchError> {
        let len = common_len(inputs);
        if let Err(error) = &len {
            warn!(%error, "rejected dispatch");
        }
        Ok(len?.unwrap_or(1))
    }

    /// Runs `body` inside the call's span, logging a rejection.
    fn traced<R>(
        &self,
        kernel: &'static str,
        len: usize,
        body: impl FnOnce() -> Result<R, DispatchError>,
    ) -> Result<R, DispatchError> {
        let span = debug_span!("dispatch", kernel, len);
        let _guard = span.enter();

        let result = body();
        if let Err(error) = &result {
            warn!(%error, "rejected dispatch");
        }
        result
    }

    /// Runs a validated job under the configured parallelism.
    fn execute<R: Send>(
        &self,
        len: usize,
        job: impl FnOnce() -> R + Send,
    ) -> Result<R, DispatchError> {
        debug!(len, parallelism = ?self.parallelism, min_len = self.min_len, "executing");

        match self.parallelism {
            Parallelism::Threads(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads.get())
                    .build()?;
                Ok(pool.install(job))
            }
            Parallelism::Sequential | Parallelism::Auto => Ok(job()),
        }
    }

    /// Writes `f(i)` into every slot of `out`.
    fn fill<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        if self.parallelism == Parallelism::Sequential {
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = f(i);
            }
        } else {
            out.par_iter_mut()
                .with_min_len(self.min_len)
                .enumerate()
                .for_each(|(i, slot)| *slot = f(i));
        }
    }

    /// Writes both halves of `f(i)` into the matching slots of two buffers.
    fn fill_pair<T, F>(&self, first: &mut [T], second: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> (T, T) + Sync,
    {
        let write = |(i, (a, b)): (usize, (&mut T, &mut T))| {
            (*a, *b) = f(i);
        };

        if self.parallelism == Parallelism::Sequential {
            first.iter_mut().zip(second.iter_mut()).enumerate().for_each(write);
        } else {
            first
                .par_iter_mut()
                .zip(second.par_iter_mut())
                .with_min_len(self.min_len)
                .enumerate()
                .for_each(write);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::thermo::{self, SolverConfig};

    fn dispatchers() -> [Dispatcher; 3] {
        let two = NonZeroUsize::new(2).unwrap();
        [
            Dispatcher::sequential(),
            Dispatcher::default().with_min_len(1),
            Dispatcher::default().with_parallelism(Parallelism::Threads(two)),
        ]
    }

    #[test]
    fn maps_match_scalar_calls() {
        let temperature: Vec<f64> = (0..200).map(|i| 230.0 + 0.5 * f64::from(i)).collect();

        for dispatcher in dispatchers() {
            let mut out = vec![0.0; temperature.len()];
            dispatcher
                .map1(thermo::saturation_vapor_pressure, (&temperature).into(), &mut out)
                .unwrap();

            for (t, e) in temperature.iter().zip(&out) {
                assert_eq!(*e, thermo::saturation_vapor_pressure(*t));
            }
        }
    }

    #[test]
    fn scalars_fill_outputs() {
        let mut out = [0.0_f32; 4];
        Dispatcher::default()
            .map2(thermo::wind_magnitude, Operand::Scalar(3.0), Operand::Scalar(4.0), &mut out)
            .unwrap();
        assert_eq!(out, [5.0; 4]);

        let single = Dispatcher::default()
            .apply1(thermo::wobus, Operand::Scalar(293.15))
            .unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn pairs_are_written_together() {
        let u = [1.0, 0.0, -3.0];
        let v = [0.0, -1.0, 4.0];

        for dispatcher in dispatchers() {
            let (direction, speed) = dispatcher
                .apply2_pair(
                    |u, v| (thermo::wind_direction(u, v), thermo::wind_magnitude(u, v)),
                    (&u).into(),
                    (&v).into(),
                )
                .unwrap();

            assert_eq!(direction[0], 270.0);
            assert_eq!(direction[1], 360.0);
            assert_relative_eq!(speed[2], 5.0);
        }
    }

    #[test]
    fn runs_named_kernels() {
        let pressure = [100_000.0, 85_000.0];
        let temperature = [303.15, 280.0];
        let dewpoint = [293.15, 270.0];
        let inputs: [Operand<'_, f64>; 3] =
            [(&pressure).into(), (&temperature).into(), (&dewpoint).into()];

        let mut wb = [0.0; 2];
        Dispatcher::default()
            .run(
                &Kernel::WetBulbTemperature(SolverConfig::default()),
                &inputs,
                &mut [&mut wb],
            )
            .unwrap();
        assert_relative_eq!(wb[0], 295.914_601_6, max_relative = 1e-8);
        assert_relative_eq!(wb[1], 275.512_821_4, max_relative = 1e-8);

        let (mut p_lcl, mut t_lcl) = ([0.0; 2], [0.0; 2]);
        Dispatcher::sequential()
            .run(
                &Kernel::Lcl(SolverConfig::default()),
                &inputs,
                &mut [&mut p_lcl, &mut t_lcl],
            )
            .unwrap();
        assert_relative_eq!(p_lcl[1], 72_871.450_534, max_relative = 1e-8);
        assert_relative_eq!(t_lcl[1], 267.950_605_2, max_relative = 1e-8);
    }

    #[test]
    fn rejects_before_writing() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0, 2.0];
        let mut out = [-1.0; 3];

        let err = Dispatcher::default()
            .map2(|x, y| x + y, (&a).into(), (&b).into(), &mut out)
            .unwrap_err();
        assert!(matches!(err, DispatchError::LengthMismatch { position: 1, .. }));
        assert_eq!(out, [-1.0; 3]);

        let mut short = [-1.0; 2];
        let err = Dispatcher::default()
            .map1(|x| x, (&a).into(), &mut short)
            .unwrap_err();
        assert!(matches!(err, DispatchError::OutputLength { expected: 3, found: 2, .. }));

        let err = Dispatcher::default()
            .run(&Kernel::Dewpoint, &[(&a).into(), (&a).into()], &mut [&mut out])
            .unwrap_err();
        assert!(matches!(err, DispatchError::InputArity { expected: 1, found: 2, .. }));

        let err = Dispatcher::default()
            .run(&Kernel::WindComponents, &[(&a).into(), (&a).into()], &mut [&mut out])
            .unwrap_err();
        assert!(matches!(err, DispatchError::OutputArity { expected: 2, found: 1, .. }));

        let config = SolverConfig::default().with_max_iters(0);
        let err = Dispatcher::default()
            .run(&Kernel::LclPressure(config), &[(&a).into(); 3], &mut [&mut out])
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidConfig(_)));
        assert_eq!(out, [-1.0; 3]);
    }

    #[test]
    fn empty_inputs_yield_empty_outputs() {
        let empty: [f64; 0] = [];
        let mut out: [f64; 0] = [];

        for dispatcher in dispatchers() {
            dispatcher
                .run(&Kernel::Dewpoint, &[(&empty).into()], &mut [&mut out])
                .unwrap();
            let theta = dispatcher
                .apply2(thermo::potential_temperature, (&empty).into(), Operand::Scalar(300.0))
                .unwrap();
            assert!(theta.is_empty());
        }
    }

    #[test]
    fn min_len_is_at_least_one() {
        assert_eq!(Dispatcher::default().with_min_len(0).min_len(), 1);
        assert_eq!(Dispatcher::default().parallelism(), Parallelism::Auto);
    }
}
