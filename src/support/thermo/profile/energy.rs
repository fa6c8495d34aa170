use std::cmp::Ordering;

use crate::support::{
    constants::RD,
    float::Real,
    search::{Direction, trapezoid},
    thermo::{
        SolverConfig, dewpoint_from_mixing_ratio, dry_lapse, equivalent_potential_temperature,
        lcl, mixing_ratio_from_dewpoint, saturation_mixing_ratio, virtual_temperature,
        wet_bulb_temperature,
    },
};

use super::{
    intersect::{Pick, intersections, pick},
    layer::{most_unstable_parcel_index, parcel_mixing_ratio, within},
    moist_lapse_profile,
    with_lcl::parcel_profile_with_lcl,
};

/// Upper bound (Pa) of the layer searched for the downdraft source.
pub const DOWNDRAFT_TOP: f64 = 50_000.0;

/// Lower bound (Pa) of the layer searched for the downdraft source.
pub const DOWNDRAFT_BOTTOM: f64 = 70_000.0;

const CLOSE_RTOL: f64 = 1e-5;
const CLOSE_ATOL: f64 = 1e-8;

/// Level of free convection `(p, T)` of `parcel` lifted through the sounding.
///
/// Candidates are the levels above the LCL of the first level where the
/// parcel becomes warmer than the environment, found in `ln p`. With no
/// candidate the LFC is the LCL itself if the parcel is at least as warm as
/// the environment anywhere at or above the LCL, and `(NaN, NaN)` otherwise.
pub fn lfc<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    parcel: &[T],
    config: &SolverConfig,
    which: Pick,
) -> (T, T) {
    let surface_lcl = first_lcl(pressure, temperature, dewpoint, config);
    lfc_point(pressure, temperature, parcel, surface_lcl, which)
}

/// Equilibrium level `(p, T)` of `parcel` lifted through the sounding.
///
/// Candidates are the levels above the LCL of the first level where the
/// parcel becomes colder than the environment, found in `ln p`. There is
/// none unless the parcel ends no warmer than the environment at the highest
/// level before the first missing one. No candidate gives `(NaN, NaN)`.
pub fn el<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    parcel: &[T],
    config: &SolverConfig,
    which: Pick,
) -> (T, T) {
    let (p_lcl, _) = first_lcl(pressure, temperature, dewpoint, config);
    pick(&el_candidates(pressure, temperature, parcel, p_lcl), which)
}

/// Convective condensation level `(p, T, Tc)`.
///
/// The CCL is where the constant mixing ratio line through the first
/// level's dewpoint meets the environmental temperature, in `ln p`. `Tc` is
/// the convective temperature: the CCL temperature brought back down the dry
/// adiabat to the first level. No crossing gives `NaN` for all three.
pub fn ccl<T: Real>(pressure: &[T], temperature: &[T], dewpoint: &[T], which: Pick) -> (T, T, T) {
    let (Some(&p0), Some(&td0)) = (pressure.first(), dewpoint.first()) else {
        return (T::nan(), T::nan(), T::nan());
    };
    let r = mixing_ratio_from_dewpoint(p0, td0);
    let saturation: Vec<T> = pressure
        .iter()
        .map(|&p| dewpoint_from_mixing_ratio(p, r))
        .collect();

    let crossings = intersections(
        pressure,
        &saturation,
        temperature,
        Some(Direction::Increasing),
        true,
    );
    let (p, t) = pick(&crossings, which);
    (p, t, dry_lapse(p0, t, p))
}

/// Downdraft CAPE (J/kg).
///
/// The downdraft starts at the level of minimum θe between
/// [`DOWNDRAFT_BOTTOM`] and [`DOWNDRAFT_TOP`], or at the first level if none
/// lies there. It descends the moist adiabat from that level's wet-bulb
/// temperature to the first level. The result is `Rd` times the integral of
/// the environment's virtual temperature excess over the saturated
/// downdraft's, taken in `ln p` over the levels at and below the source.
/// `NaN` if the wet-bulb solve fails.
pub fn downdraft_cape<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    config: &SolverConfig,
) -> T {
    let (bottom, top) = (T::lit(DOWNDRAFT_BOTTOM), T::lit(DOWNDRAFT_TOP));

    let mut source = 0;
    let mut lowest = T::infinity();
    let levels = pressure.iter().zip(temperature).zip(dewpoint).enumerate();
    for (i, ((&p, &t), &td)) in levels {
        if !within(p, bottom, top) {
            continue;
        }
        let theta_e = equivalent_potential_temperature(p, t, td);
        if theta_e < lowest {
            lowest = theta_e;
            source = i;
        }
    }

    let (Some(&p_top), Some(&t_top), Some(&td_top)) =
        (pressure.get(source), temperature.get(source), dewpoint.get(source))
    else {
        return T::nan();
    };
    let wet_bulb = wet_bulb_temperature(p_top, t_top, td_top, config);
    if wet_bulb.is_nan() {
        return T::nan();
    }

    let below: Vec<T> = pressure
        .iter()
        .map(|&p| if greater_or_close(p, p_top) { p } else { T::nan() })
        .collect();
    let trace = moist_lapse_profile(&below, wet_bulb, p_top, T::lit(config.step));

    let samples = below
        .iter()
        .zip(temperature)
        .zip(dewpoint)
        .zip(&trace)
        .map(|(((&p, &t), &td), &t_parcel)| {
            let environment = virtual_temperature(t, saturation_mixing_ratio(p, td));
            let downdraft = virtual_temperature(t_parcel, saturation_mixing_ratio(p, t_parcel));
            (p.ln(), downdraft - environment)
        });
    T::lit(RD) * trapezoid(samples)
}

/// `(CAPE, CIN)` in J/kg of `parcel` lifted through the sounding.
///
/// Buoyancy is measured between virtual temperatures: the parcel's at
/// [`parcel_mixing_ratio`], the environment's saturated at its dewpoint. The
/// LFC and EL are found on those virtual profiles, picked by `which_lfc` and
/// `which_el`. Zero crossings of the buoyancy are added as samples, then
/// CAPE is `Rd` times its integral in `ln p` from the LFC up to the EL, and
/// CIN the same integral below the LFC. CAPE is never negative and CIN never
/// positive. Both are zero without an LFC; CAPE is zero without an EL.
pub fn cape_cin<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    parcel: &[T],
    config: &SolverConfig,
    which_lfc: Pick,
    which_el: Pick,
) -> (T, T) {
    let mixing = parcel_mixing_ratio(pressure, temperature, dewpoint, config);
    let parcel_vt: Vec<T> = parcel
        .iter()
        .zip(&mixing)
        .map(|(&t, &r)| virtual_temperature(t, r))
        .collect();
    let env_vt: Vec<T> = pressure
        .iter()
        .zip(temperature)
        .zip(dewpoint)
        .map(|((&p, &t), &td)| virtual_temperature(t, saturation_mixing_ratio(p, td)))
        .collect();

    let surface_lcl = first_lcl(pressure, &env_vt, dewpoint, config);
    let (p_el, _) = pick(&el_candidates(pressure, &env_vt, &parcel_vt, surface_lcl.0), which_el);
    let (p_lfc, _) = lfc_point(pressure, &env_vt, &parcel_vt, surface_lcl, which_lfc);

    let buoyancy: Vec<T> = parcel_vt.iter().zip(&env_vt).map(|(&a, &b)| a - b).collect();
    let samples = with_zero_crossings(pressure, &buoyancy);
    let integral = |keep: &dyn Fn(T) -> bool| {
        let layer = samples.iter().filter(|(p, _)| keep(*p)).map(|&(p, b)| (p.ln(), b));
        -T::lit(RD) * trapezoid(layer)
    };

    let cape = integral(&|p| less_or_close(p, p_lfc) && greater_or_close(p, p_el));
    let cin = integral(&|p| greater_or_close(p, p_lfc));
    (cape.max(T::zero()), cin.min(T::zero()))
}

/// `(CAPE, CIN)` in J/kg of the most unstable parcel within `depth` (Pa) of
/// the first level.
///
/// The sounding is cut at [`most_unstable_parcel_index`], the parcel's LCL
/// is inserted with [`parcel_profile_with_lcl`], and the result goes through
/// [`cape_cin`] with the lowest LFC and the highest EL.
pub fn most_unstable_cape_cin<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    depth: f64,
    config: &SolverConfig,
) -> (T, T) {
    let idx = most_unstable_parcel_index(pressure, temperature, dewpoint, depth, None);
    let profile = parcel_profile_with_lcl(
        pressure.get(idx..).unwrap_or_default(),
        temperature.get(idx..).unwrap_or_default(),
        dewpoint.get(idx..).unwrap_or_default(),
        config,
    );
    cape_cin(
        &profile.pressure,
        &profile.temperature,
        &profile.dewpoint,
        &profile.parcel,
        config,
        Pick::Bottom,
        Pick::Top,
    )
}

/// LCL of the first level, or `NaN` for an empty sounding.
fn first_lcl<T: Real>(
    pressure: &[T],
    temperature: &[T],
    dewpoint: &[T],
    config: &SolverConfig,
) -> (T, T) {
    match (pressure.first(), temperature.first(), dewpoint.first()) {
        (Some(&p), Some(&t), Some(&td)) => lcl(p, t, td, T::lit(config.eps), config.max_iters),
        _ => (T::nan(), T::nan()),
    }
}

fn el_candidates<T: Real>(
    pressure: &[T],
    temperature: &[T],
    parcel: &[T],
    p_lcl: T,
) -> Vec<(T, T)> {
    let n = pressure.len().min(temperature.len()).min(parcel.len());
    if n < 2 {
        return Vec::new();
    }
    let (p, env, lifted) = (&pressure[1..n], &temperature[1..n], &parcel[1..n]);

    let top = match p.iter().position(|v| v.is_nan()) {
        None | Some(0) => p.len() - 1,
        Some(i) => i - 1,
    };
    let ends_cooler = lifted[top] <= env[top];
    if !ends_cooler {
        return Vec::new();
    }

    intersections(p, lifted, env, Some(Direction::Decreasing), true)
        .into_iter()
        .filter(|&(p_el, _)| p_el < p_lcl)
        .collect()
}

fn lfc_point<T: Real>(
    pressure: &[T],
    temperature: &[T],
    parcel: &[T],
    (p_lcl, t_lcl): (T, T),
    which: Pick,
) -> (T, T) {
    let n = pressure.len().min(temperature.len()).min(parcel.len());
    if n < 2 {
        return (T::nan(), T::nan());
    }
    let (p, env, lifted) = (&pressure[1..n], &temperature[1..n], &parcel[1..n]);

    let candidates: Vec<_> = intersections(p, lifted, env, Some(Direction::Increasing), true)
        .into_iter()
        .filter(|&(p_lfc, _)| p_lfc < p_lcl)
        .collect();
    if !candidates.is_empty() {
        return pick(&candidates, which);
    }

    let buoyant_above_lcl = p
        .iter()
        .zip(lifted)
        .zip(env)
        .any(|((&p, &t_parcel), &t_env)| {
            less_or_close(p, p_lcl) && greater_or_close(t_parcel, t_env)
        });
    if buoyant_above_lcl {
        (p_lcl, t_lcl)
    } else {
        (T::nan(), T::nan())
    }
}

/// `(p, buoyancy)` samples with the buoyancy's zero crossings added, ordered
/// by decreasing pressure. Missing samples are dropped.
fn with_zero_crossings<T: Real>(pressure: &[T], buoyancy: &[T]) -> Vec<(T, T)> {
    let zeros = vec![T::zero(); buoyancy.len()];

    let mut samples: Vec<(T, T)> = pressure
        .iter()
        .zip(buoyancy)
        .map(|(&p, &b)| (p, b))
        .filter(|(p, b)| !p.is_nan() && !b.is_nan())
        .collect();
    samples.extend(
        intersections(pressure, buoyancy, &zeros, None, true)
            .into_iter()
            .map(|(p, _)| (p, T::zero())),
    );

    samples.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    samples.dedup_by(|a, b| a.0 == b.0);
    samples
}

fn is_close<T: Real>(a: T, b: T) -> bool {
    (a - b).abs() <= T::lit(CLOSE_ATOL) + T::lit(CLOSE_RTOL) * b.abs()
}

fn greater_or_close<T: Real>(a: T, b: T) -> bool {
    a >= b || is_close(a, b)
}

fn less_or_close<T: Real>(a: T, b: T) -> bool {
    a <= b || is_close(a, b)
}
