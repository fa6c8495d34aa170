//! Parcel temperatures and sounding analyses along a column of pressure levels.
//!
//! Levels are visited in the order given and each level's result seeds the
//! next one, so the usual input is a pressure profile decreasing with height,
//! the first level at the surface. The `_into` variants write into caller
//! buffers; the others allocate.
//!
//! Beyond the lifted parcel itself the module finds the special levels of a
//! sounding (LCL insertion, LFC, EL, CCL), picks source parcels (most
//! unstable, mixed layer) and integrates buoyancy into CAPE, CIN and
//! downdraft CAPE. Like the rest of the engine these never fail: missing
//! levels are skipped and a quantity that cannot be found is `NaN`.

mod energy;
mod intersect;
mod layer;
mod with_lcl;

use crate::support::float::Real;

use super::{
    config::SolverConfig,
    parcel::{lcl, moist_lapse},
    potential::dry_lapse,
};

pub use energy::{
    DOWNDRAFT_BOTTOM, DOWNDRAFT_TOP, cape_cin, ccl, downdraft_cape, el, lfc,
    most_unstable_cape_cin,
};
pub use intersect::{Pick, intersections, pick};
pub use layer::{
    MIXED_LAYER_DEPTH, MOST_UNSTABLE_DEPTH, mixed_layer, most_unstable_parcel,
    most_unstable_parcel_index, parcel_mixing_ratio, parcel_mixing_ratio_into,
};
pub use with_lcl::{
    ProfileWithLcl, ProfileWithLclMut, parcel_profile_with_lcl, parcel_profile_with_lcl_into,
};

/// Temperatures (K) along the moist adiabat through `(p_ref, t)` at each level.
///
/// ```
/// use atmos_thermo::support::thermo::moist_lapse_profile;
///
/// let levels = [100_000.0_f64, 85_000.0, 70_000.0];
/// let trace = moist_lapse_profile(&levels, 300.0, 100_000.0, 1000.0);
///
/// assert_eq!(trace[0], 300.0);
/// assert!(trace[1] < trace[0] && trace[2] < trace[1]);
/// ```
pub fn moist_lapse_profile<T: Real>(levels: &[T], t: T, p_ref: T, step: T) -> Vec<T> {
    let mut out = vec![T::nan(); levels.len()];
    moist_lapse_profile_into(levels, t, p_ref, step, &mut out);
    out
}

/// Writes the moist adiabat through `(p_ref, t)` at each level into `out`.
///
/// A `NaN` level yields `NaN` and the integration resumes at the next level
/// from the last valid one.
pub fn moist_lapse_profile_into<T: Real>(levels: &[T], t: T, p_ref: T, step: T, out: &mut [T]) {
    debug_assert_eq!(levels.len(), out.len(), "output must match the levels");

    let mut p_prev = p_ref;
    let mut t_prev = t;
    for (&p, slot) in levels.iter().zip(out.iter_mut()) {
        if p.is_nan() {
            *slot = T::nan();
            continue;
        }
        t_prev = moist_lapse(p_prev, p, t_prev, step);
        p_prev = p;
        *slot = t_prev;
    }
}

/// Temperatures (K) of a parcel lifted from the first level.
///
/// The parcel starts at `levels[0]` with temperature `t` and dewpoint `td`.
/// It follows the dry adiabat at every level with pressure at or above its
/// lifting condensation level and the moist adiabat from the LCL above that.
/// If the LCL cannot be found every level is `NaN`.
///
/// ```
/// use atmos_thermo::support::thermo::{SolverConfig, parcel_profile};
///
/// let levels = [100_000.0_f64, 90_000.0, 80_000.0, 70_000.0];
/// let trace = parcel_profile(&levels, 303.15, 293.15, &SolverConfig::default());
///
/// assert_eq!(trace[0], 303.15);
/// assert!(trace.windows(2).all(|pair| pair[1] < pair[0]));
/// ```
pub fn parcel_profile<T: Real>(levels: &[T], t: T, td: T, config: &SolverConfig) -> Vec<T> {
    let mut out = vec![T::nan(); levels.len()];
    parcel_profile_into(levels, t, td, config, &mut out);
    out
}

/// Writes the lifted parcel temperatures into `out`. See [`parcel_profile`].
pub fn parcel_profile_into<T: Real>(
    levels: &[T],
    t: T,
    td: T,
    config: &SolverConfig,
    out: &mut [T],
) {
    debug_assert_eq!(levels.len(), out.len(), "output must match the levels");

    let Some(&p_start) = levels.first() else {
        return;
    };
    let (p_lcl, t_lcl) = lcl(p_start, t, td, T::lit(config.eps), config.max_iters);
    let step = T::lit(config.step);

    let mut p_prev = p_lcl;
    let mut t_prev = t_lcl;
    for (&p, slot) in levels.iter().zip(out.iter_mut()) {
        *slot = if p.is_nan() || p_lcl.is_nan() {
            T::nan()
        } else if p >= p_lcl {
            dry_lapse(p, t, p_start)
        } else {
            t_prev = moist_lapse(p_prev, p, t_prev, step);
            p_prev = p;
            t_prev
        };
    }
}
