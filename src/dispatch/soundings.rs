//! Batched sounding analyses.
//!
//! A batch holds one sounding per row: temperature and dewpoint are
//! row-major `rows × levels` buffers over shared or per-row [`Levels`].
//! Analyses that reduce a sounding write one value per row, those that keep
//! the level axis write one row per sounding. Rows are distributed across
//! threads whole.

use rayon::prelude::*;

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    float::Real,
    thermo::{
        SolverConfig, SolverConfigError,
        profile::{self, Pick, ProfileWithLclMut},
    },
};

use super::{DispatchError, Dispatcher, Levels, Parallelism};

/// A batch of soundings sharing a level count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Soundings<'a, T> {
    /// Pressure (Pa), decreasing along each row.
    pub pressure: Levels<'a, T>,
    /// Temperature (K), `rows × levels`.
    pub temperature: &'a [T],
    /// Dewpoint (K), `rows × levels`.
    pub dewpoint: &'a [T],
}

impl<'a, T> Soundings<'a, T> {
    /// Number of levels per sounding.
    pub fn levels(&self) -> usize {
        self.pressure.levels()
    }

    /// Number of soundings, checked against every column.
    fn rows(&self) -> Result<usize, DispatchError> {
        let nlev = self.levels();
        let rows = match self.pressure.rows()? {
            Some(rows) => rows,
            None if nlev == 0 => 0,
            None => self.temperature.len().div_ceil(nlev),
        };
        for column in [self.temperature, self.dewpoint] {
            row_shape(rows, nlev, column.len())?;
        }
        Ok(rows)
    }

    /// Pressure, temperature and dewpoint of row `row`.
    fn row(&self, row: usize) -> (&'a [T], &'a [T], &'a [T]) {
        let span = row * self.levels()..(row + 1) * self.levels();
        (
            self.pressure.row(row),
            &self.temperature[span.clone()],
            &self.dewpoint[span],
        )
    }
}

impl Dispatcher {
    /// Writes the lifted parcel's mixing ratio for every sounding.
    ///
    /// `out` is `rows × levels`, following
    /// [`parcel_mixing_ratio`](profile::parcel_mixing_ratio).
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if `config` is invalid or the buffers do
    /// not describe the same batch.
    pub fn parcel_mixing_ratios<T: Real>(
        &self,
        soundings: Soundings<'_, T>,
        config: &SolverConfig,
        out: &mut [T],
    ) -> Result<(), DispatchError> {
        self.traced("parcel_mixing_ratios", out.len(), || {
            config.validate()?;
            let rows = soundings.rows()?;
            let nlev = soundings.levels();
            row_shape(rows, nlev, out.len())?;

            self.execute(out.len(), || {
                self.fill_rows(out, nlev, |row, chunk| {
                    let (p, t, td) = soundings.row(row);
                    profile::parcel_mixing_ratio_into(p, t, td, config, chunk);
                });
            })
        })
    }

    /// Writes every sounding with its LCL inserted.
    ///
    /// Each column of `out` holds `levels + 1` values per row, following
    /// [`parcel_profile_with_lcl`](profile::parcel_profile_with_lcl).
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if `config` is invalid or the buffers do
    /// not describe the same batch.
    pub fn parcel_profiles_with_lcl<T: Real>(
        &self,
        soundings: Soundings<'_, T>,
        config: &SolverConfig,
        out: ProfileWithLclMut<'_, T>,
    ) -> Result<(), DispatchError> {
        self.traced("parcel_profiles_with_lcl", out.pressure.len(), || {
            config.validate()?;
            let rows = soundings.rows()?;
            let width = match soundings.levels() {
                0 => 0,
                nlev => nlev + 1,
            };
            for column in [&out.pressure, &out.temperature, &out.dewpoint, &out.parcel] {
                row_shape(rows, width, column.len())?;
            }

            self.execute(rows * width, || {
                if width == 0 {
                    return;
                }
                let write = |(row, columns): RowColumns<'_, T>| {
                    let (((pressure, temperature), dewpoint), parcel) = columns;
                    let (p, t, td) = soundings.row(row);
                    let columns = ProfileWithLclMut {
                        pressure,
                        temperature,
                        dewpoint,
                        parcel,
                    };
                    profile::parcel_profile_with_lcl_into(p, t, td, config, columns);
                };

                let ProfileWithLclMut {
                    pressure,
                    temperature,
                    dewpoint,
                    parcel,
                } = out;
                if self.parallelism == Parallelism::Sequential {
                    pressure
                        .chunks_mut(width)
                        .zip(temperature.chunks_mut(width))
                        .zip(dewpoint.chunks_mut(width))
                        .zip(parcel.chunks_mut(width))
                        .enumerate()
                        .for_each(write);
                } else {
                    pressure
                        .par_chunks_mut(width)
                        .zip(temperature.par_chunks_mut(width))
                        .zip(dewpoint.par_chunks_mut(width))
                        .zip(parcel.par_chunks_mut(width))
                        .enumerate()
                        .for_each(write);
                }
            })
        })
    }

    /// Writes the most unstable level of every sounding.
    ///
    /// Follows [`most_unstable_parcel_index`](profile::most_unstable_parcel_index)
    /// from each sounding's first level.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if `depth` is not strictly positive or the
    /// buffers do not describe the same batch.
    pub fn most_unstable_parcel_indices<T: Real>(
        &self,
        soundings: Soundings<'_, T>,
        depth: f64,
        out: &mut [usize],
    ) -> Result<(), DispatchError> {
        self.traced("most_unstable_parcel_indices", out.len(), || {
            check_depth(depth)?;
            let rows = soundings.rows()?;
            per_row(rows, 0, out.len())?;

            self.execute(rows, || {
                self.fill(out, |row| {
                    let (p, t, td) = soundings.row(row);
                    profile::most_unstable_parcel_index(p, t, td, depth, None)
                });
            })
        })
    }

    /// Writes the mixed-layer `(T, Td)` of every sounding.
    ///
    /// Follows [`mixed_layer`](profile::mixed_layer) from each sounding's
    /// first level.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if `depth` is not strictly positive or the
    /// buffers do not describe the same batch.
    pub fn mixed_layers<T: Real>(
        &self,
        soundings: Soundings<'_, T>,
        depth: f64,
        out: (&mut [T], &mut [T]),
    ) -> Result<(), DispatchError> {
        let (temperature, dewpoint) = out;
        self.traced("mixed_layers", temperature.len(), || {
            check_depth(depth)?;
            let rows = soundings.rows()?;
            per_row(rows, 0, temperature.len())?;
            per_row(rows, 1, dewpoint.len())?;

            self.execute(rows, || {
                self.fill_pair(temperature, dewpoint, |row| {
                    let (p, t, td) = soundings.row(row);
                    profile::mixed_layer(p, t, td, depth, None)
                });
            })
        })
    }

    /// Writes the downdraft CAPE (J/kg) of every sounding.
    ///
    /// Follows [`downdraft_cape`](profile::downdraft_cape).
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if `config` is invalid or the buffers do
    /// not describe the same batch.
    pub fn downdraft_capes<T: Real>(
        &self,
        soundings: Soundings<'_, T>,
        config: &SolverConfig,
        out: &mut [T],
    ) -> Result<(), DispatchError> {
        self.traced("downdraft_capes", out.len(), || {
            config.validate()?;
            let rows = soundings.rows()?;
            per_row(rows, 0, out.len())?;

            self.execute(rows, || {
                self.fill(out, |row| {
                    let (p, t, td) = soundings.row(row);
                    profile::downdraft_cape(p, t, td, config)
                });
            })
        })
    }

    /// Writes the `(p, T)` of the chosen LFC of every sounding.
    ///
    /// `parcel` is `rows × levels`, one parcel profile per sounding, as
    /// [`parcel_profiles`](Dispatcher::parcel_profiles) writes it. Follows
    /// [`lfc`](profile::lfc).
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if `config` is invalid or the buffers do
    /// not describe the same batch.
    pub fn lfcs<T: Real>(
        &self,
        soundings: Soundings<'_, T>,
        parcel: &[T],
        config: &SolverConfig,
        which: Pick,
        out: (&mut [T], &mut [T]),
    ) -> Result<(), DispatchError> {
        self.parcel_levels("lfcs", soundings, parcel, config, out, |p, t, td, tp| {
            profile::lfc(p, t, td, tp, config, which)
        })
    }

    /// Writes the `(p, T)` of the chosen EL of every sounding.
    ///
    /// `parcel` is laid out as for [`lfcs`](Dispatcher::lfcs). Follows
    /// [`el`](profile::el).
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if `config` is invalid or the buffers do
    /// not describe the same batch.
    pub fn els<T: Real>(
        &self,
        soundings: Soundings<'_, T>,
        parcel: &[T],
        config: &SolverConfig,
        which: Pick,
        out: (&mut [T], &mut [T]),
    ) -> Result<(), DispatchError> {
        self.parcel_levels("els", soundings, parcel, config, out, |p, t, td, tp| {
            profile::el(p, t, td, tp, config, which)
        })
    }

    /// Writes the `(CAPE, CIN)` (J/kg) of every sounding.
    ///
    /// `parcel` is laid out as for [`lfcs`](Dispatcher::lfcs). The integral
    /// runs from the lowest LFC to the highest EL, following
    /// [`cape_cin`](profile::cape_cin).
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if `config` is invalid or the buffers do
    /// not describe the same batch.
    pub fn cape_cins<T: Real>(
        &self,
        soundings: Soundings<'_, T>,
        parcel: &[T],
        config: &SolverConfig,
        out: (&mut [T], &mut [T]),
    ) -> Result<(), DispatchError> {
        self.parcel_levels("cape_cins", soundings, parcel, config, out, |p, t, td, tp| {
            profile::cape_cin(p, t, td, tp, config, Pick::Bottom, Pick::Top)
        })
    }

    /// Writes the most unstable `(CAPE, CIN)` (J/kg) of every sounding.
    ///
    /// Follows [`most_unstable_cape_cin`](profile::most_unstable_cape_cin).
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if `depth` is not strictly positive,
    /// `config` is invalid or the buffers do not describe the same batch.
    pub fn most_unstable_cape_cins<T: Real>(
        &self,
        soundings: Soundings<'_, T>,
        depth: f64,
        config: &SolverConfig,
        out: (&mut [T], &mut [T]),
    ) -> Result<(), DispatchError> {
        let (cape, cin) = out;
        self.traced("most_unstable_cape_cins", cape.len(), || {
            check_depth(depth)?;
            config.validate()?;
            let rows = soundings.rows()?;
            per_row(rows, 0, cape.len())?;
            per_row(rows, 1, cin.len())?;

            self.execute(rows, || {
                self.fill_pair(cape, cin, |row| {
                    let (p, t, td) = soundings.row(row);
                    profile::most_unstable_cape_cin(p, t, td, depth, config)
                });
            })
        })
    }

    /// Writes the `(p, T, Tc)` of the chosen CCL of every sounding.
    ///
    /// Follows [`ccl`](profile::ccl).
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if the buffers do not describe the same
    /// batch.
    pub fn ccls<T: Real>(
        &self,
        soundings: Soundings<'_, T>,
        which: Pick,
        out: (&mut [T], &mut [T], &mut [T]),
    ) -> Result<(), DispatchError> {
        let (pressure, temperature, convective) = out;
        self.traced("ccls", pressure.len(), || {
            let rows = soundings.rows()?;
            for (position, len) in [pressure.len(), temperature.len(), convective.len()]
                .into_iter()
                .enumerate()
            {
                per_row(rows, position, len)?;
            }

            self.execute(rows, || {
                let write = |(row, ((a, b), c)): (usize, ((&mut T, &mut T), &mut T))| {
                    let (p, t, td) = soundings.row(row);
                    (*a, *b, *c) = profile::ccl(p, t, td, which);
                };

                if self.parallelism == Parallelism::Sequential {
                    pressure
                        .iter_mut()
                        .zip(temperature.iter_mut())
                        .zip(convective.iter_mut())
                        .enumerate()
                        .for_each(write);
                } else {
                    pressure
                        .par_iter_mut()
                        .zip(temperature.par_iter_mut())
                        .zip(convective.par_iter_mut())
                        .with_min_len(self.min_len)
                        .enumerate()
                        .for_each(write);
                }
            })
        })
    }

    /// Shared body of the analyses that take a parcel profile per sounding.
    fn parcel_levels<T, F>(
        &self,
        kernel: &'static str,
        soundings: Soundings<'_, T>,
        parcel: &[T],
        config: &SolverConfig,
        out: (&mut [T], &mut [T]),
        f: F,
    ) -> Result<(), DispatchError>
    where
        T: Real,
        F: Fn(&[T], &[T], &[T], &[T]) -> (T, T) + Sync,
    {
        let (first, second) = out;
        self.traced(kernel, first.len(), || {
            config.validate()?;
            let rows = soundings.rows()?;
            let nlev = soundings.levels();
            row_shape(rows, nlev, parcel.len())?;
            per_row(rows, 0, first.len())?;
            per_row(rows, 1, second.len())?;

            self.execute(rows, || {
                self.fill_pair(first, second, |row| {
                    let (p, t, td) = soundings.row(row);
                    f(p, t, td, &parcel[row * nlev..(row + 1) * nlev])
                });
            })
        })
    }
}

/// One row of every column of a [`ProfileWithLclMut`] batch.
type RowColumns<'a, T> = (usize, (((&'a mut [T], &'a mut [T]), &'a mut [T]), &'a mut [T]));

/// Checks a `rows × levels` buffer.
fn row_shape(rows: usize, levels: usize, found: usize) -> Result<(), DispatchError> {
    let expected = rows * levels;
    if found == expected {
        Ok(())
    } else {
        Err(DispatchError::ProfileShape {
            rows,
            levels,
            expected,
            found,
        })
    }
}

/// Checks a buffer holding one value per row.
fn per_row(rows: usize, position: usize, found: usize) -> Result<(), DispatchError> {
    if found == rows {
        Ok(())
    } else {
        Err(DispatchError::OutputLength {
            position,
            expected: rows,
            found,
        })
    }
}

fn check_depth(depth: f64) -> Result<(), SolverConfigError> {
    StrictlyPositive::check(&depth).map_err(|source| SolverConfigError { field: "depth", source })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::num::NonZeroUsize;

    use crate::support::thermo::{self, profile::MOST_UNSTABLE_DEPTH};

    const LEVELS: [f64; 6] = [100_000.0, 92_500.0, 85_000.0, 70_000.0, 50_000.0, 30_000.0];
    const TEMPERATURE: [f64; 12] = [
        303.0, 298.0, 293.0, 283.0, 265.0, 240.0, //
        290.0, 288.0, 286.0, 280.0, 265.0, 245.0,
    ];
    const DEWPOINT: [f64; 12] = [
        295.0, 292.0, 288.0, 270.0, 250.0, 225.0, //
        280.0, 275.0, 270.0, 260.0, 245.0, 225.0,
    ];

    fn dispatchers() -> [Dispatcher; 3] {
        let threads = NonZeroUsize::new(2).unwrap();
        [
            Dispatcher::sequential(),
            Dispatcher::default().with_min_len(1),
            Dispatcher::default().with_parallelism(Parallelism::Threads(threads)),
        ]
    }

    fn batch() -> Soundings<'static, f64> {
        Soundings {
            pressure: Levels::Shared(&LEVELS),
            temperature: &TEMPERATURE,
            dewpoint: &DEWPOINT,
        }
    }

    fn row(row: usize) -> (&'static [f64], &'static [f64], &'static [f64]) {
        (&LEVELS, &TEMPERATURE[row * 6..(row + 1) * 6], &DEWPOINT[row * 6..(row + 1) * 6])
    }

    fn parcels(config: &SolverConfig) -> Vec<f64> {
        (0..2)
            .flat_map(|i| {
                let (p, t, td) = row(i);
                thermo::parcel_profile(p, t[0], td[0], config)
            })
            .collect()
    }

    /// Equality that treats two `NaN`s as the same value.
    fn same(a: f64, b: f64) -> bool {
        a == b || (a.is_nan() && b.is_nan())
    }

    #[test]
    fn reductions_match_single_soundings() {
        let config = SolverConfig::default();
        let parcel = parcels(&config);

        for dispatcher in dispatchers() {
            let mut dcape = [0.0; 2];
            dispatcher.downdraft_capes(batch(), &config, &mut dcape).unwrap();

            let mut index = [9; 2];
            dispatcher
                .most_unstable_parcel_indices(batch(), MOST_UNSTABLE_DEPTH, &mut index)
                .unwrap();

            let (mut a, mut b) = ([0.0; 2], [0.0; 2]);
            dispatcher.mixed_layers(batch(), 10_000.0, (&mut a, &mut b)).unwrap();

            let (mut cape, mut cin) = ([0.0; 2], [0.0; 2]);
            dispatcher.cape_cins(batch(), &parcel, &config, (&mut cape, &mut cin)).unwrap();

            let (mut mu_cape, mut mu_cin) = ([0.0; 2], [0.0; 2]);
            dispatcher
                .most_unstable_cape_cins(batch(), 30_000.0, &config, (&mut mu_cape, &mut mu_cin))
                .unwrap();

            for i in 0..2 {
                let (p, t, td) = row(i);
                let tp = &parcel[i * 6..(i + 1) * 6];

                assert!(same(dcape[i], profile::downdraft_cape(p, t, td, &config)));
                assert_eq!(index[i], profile::most_unstable_parcel_index(p, t, td, 30_000.0, None));

                let (t_ml, td_ml) = profile::mixed_layer(p, t, td, 10_000.0, None);
                assert!(same(a[i], t_ml) && same(b[i], td_ml));

                let (c, n) = profile::cape_cin(p, t, td, tp, &config, Pick::Bottom, Pick::Top);
                assert!(same(cape[i], c) && same(cin[i], n));

                let (c, n) = profile::most_unstable_cape_cin(p, t, td, 30_000.0, &config);
                assert!(same(mu_cape[i], c) && same(mu_cin[i], n));
            }
        }
    }

    #[test]
    fn levels_of_interest_match_single_soundings() {
        let config = SolverConfig::default();
        let parcel = parcels(&config);

        for dispatcher in dispatchers() {
            let (mut lfc_p, mut lfc_t) = ([0.0; 2], [0.0; 2]);
            dispatcher
                .lfcs(batch(), &parcel, &config, Pick::Bottom, (&mut lfc_p, &mut lfc_t))
                .unwrap();

            let (mut el_p, mut el_t) = ([0.0; 2], [0.0; 2]);
            dispatcher.els(batch(), &parcel, &config, Pick::Top, (&mut el_p, &mut el_t)).unwrap();

            let (mut ccl_p, mut ccl_t, mut ccl_tc) = ([0.0; 2], [0.0; 2], [0.0; 2]);
            dispatcher
                .ccls(batch(), Pick::Bottom, (&mut ccl_p, &mut ccl_t, &mut ccl_tc))
                .unwrap();

            for i in 0..2 {
                let (p, t, td) = row(i);
                let tp = &parcel[i * 6..(i + 1) * 6];

                let (lp, lt) = profile::lfc(p, t, td, tp, &config, Pick::Bottom);
                assert!(same(lfc_p[i], lp) && same(lfc_t[i], lt));

                let (ep, et) = profile::el(p, t, td, tp, &config, Pick::Top);
                assert!(same(el_p[i], ep) && same(el_t[i], et));

                let (cp, ct, ctc) = profile::ccl(p, t, td, Pick::Bottom);
                assert!(same(ccl_p[i], cp) && same(ccl_t[i], ct) && same(ccl_tc[i], ctc));
            }
        }
    }

    #[test]
    fn level_columns_match_single_soundings() {
        let config = SolverConfig::default();
        let pressure = [LEVELS, [95_000.0, 90_000.0, 80_000.0, 65_000.0, 45_000.0, 25_000.0]]
            .concat();
        let soundings = Soundings {
            pressure: Levels::PerRow {
                values: &pressure,
                levels: 6,
            },
            temperature: &TEMPERATURE,
            dewpoint: &DEWPOINT,
        };

        for dispatcher in dispatchers() {
            let mut ratio = [0.0; 12];
            dispatcher.parcel_mixing_ratios(soundings, &config, &mut ratio).unwrap();

            let mut columns = [[0.0; 14]; 4];
            let [p_out, t_out, td_out, tp_out] = &mut columns;
            let out = ProfileWithLclMut {
                pressure: p_out,
                temperature: t_out,
                dewpoint: td_out,
                parcel: tp_out,
            };
            dispatcher.parcel_profiles_with_lcl(soundings, &config, out).unwrap();

            for i in 0..2 {
                let p = &pressure[i * 6..(i + 1) * 6];
                let (_, t, td) = row(i);

                let expected = profile::parcel_mixing_ratio(p, t, td, &config);
                assert_eq!(&ratio[i * 6..(i + 1) * 6], expected.as_slice());

                let expected = profile::parcel_profile_with_lcl(p, t, td, &config);
                let span = i * 7..(i + 1) * 7;
                let expected = [
                    expected.pressure,
                    expected.temperature,
                    expected.dewpoint,
                    expected.parcel,
                ];
                for (column, want) in columns.iter().zip(&expected) {
                    let got = &column[span.clone()];
                    assert!(got.iter().zip(want).all(|(a, b)| same(*a, *b)));
                }
            }
        }
    }

    #[test]
    fn rejects_mismatched_batches() {
        let config = SolverConfig::default();
        let dispatcher = Dispatcher::default();

        let short = Soundings {
            dewpoint: &DEWPOINT[..11],
            ..batch()
        };
        let err = dispatcher.downdraft_capes(short, &config, &mut [0.0; 2]).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::ProfileShape { rows: 2, levels: 6, expected: 12, found: 11 }
        ));

        let err = dispatcher.downdraft_capes(batch(), &config, &mut [0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::OutputLength { position: 0, expected: 2, found: 3 }
        ));

        let (mut a, mut b) = ([0.0; 2], [0.0; 1]);
        let err = dispatcher.mixed_layers(batch(), 10_000.0, (&mut a, &mut b)).unwrap_err();
        assert!(matches!(err, DispatchError::OutputLength { position: 1, .. }));

        let (mut a, mut b) = ([0.0; 2], [0.0; 2]);
        let err = dispatcher
            .cape_cins(batch(), &[300.0; 6], &config, (&mut a, &mut b))
            .unwrap_err();
        assert!(matches!(err, DispatchError::ProfileShape { expected: 12, found: 6, .. }));

        let mut columns = [[0.0; 12]; 4];
        let [p_out, t_out, td_out, tp_out] = &mut columns;
        let out = ProfileWithLclMut {
            pressure: p_out,
            temperature: t_out,
            dewpoint: td_out,
            parcel: tp_out,
        };
        let err = dispatcher.parcel_profiles_with_lcl(batch(), &config, out).unwrap_err();
        assert!(matches!(err, DispatchError::ProfileShape { levels: 7, expected: 14, .. }));
    }

    #[test]
    fn rejects_bad_settings() {
        let dispatcher = Dispatcher::default();

        let err = dispatcher
            .most_unstable_parcel_indices(batch(), 0.0, &mut [0; 2])
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::InvalidConfig(SolverConfigError { field: "depth", .. })
        ));

        let config = SolverConfig::default().with_eps(0.0);
        let err = dispatcher.downdraft_capes(batch(), &config, &mut [0.0; 2]).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::InvalidConfig(SolverConfigError { field: "eps", .. })
        ));
    }

    #[test]
    fn empty_batches() {
        let config = SolverConfig::default();
        let empty = Soundings {
            pressure: Levels::Shared(&LEVELS),
            temperature: &[],
            dewpoint: &[],
        };

        let mut out: [f64; 0] = [];
        Dispatcher::default().downdraft_capes(empty, &config, &mut out).unwrap();

        let no_levels = Soundings::<f64> {
            pressure: Levels::Shared(&[]),
            temperature: &[],
            dewpoint: &[],
        };
        Dispatcher::sequential().parcel_mixing_ratios(no_levels, &config, &mut out).unwrap();

        let ragged = Soundings {
            temperature: &[300.0],
            ..no_levels
        };
        let err = Dispatcher::sequential()
            .parcel_mixing_ratios(ragged, &config, &mut out)
            .unwrap_err();
        assert!(matches!(err, DispatchError::ProfileShape { expected: 0, found: 1, .. }));
    }
}
