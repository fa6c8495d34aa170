//! The Wobus function.

use crate::support::{constants::T0, float::Real};

/// Wobus correction (K) at temperature `t` (K).
///
/// An empirical polynomial fit to the difference between the potential
/// temperatures of a saturated and a dry adiabat that cross at `t`. It is a
/// lookup formula only; the parcel solvers integrate the moist adiabat
/// directly instead.
///
/// ```
/// use atmos_thermo::support::thermo::wobus;
///
/// // The fit is anchored at 20 °C.
/// assert!((wobus(293.15_f64) - 15.13).abs() < 1e-9);
/// ```
pub fn wobus<T: Real>(t: T) -> T {
    let x = t - T::lit(T0) - T::lit(20.0);

    if x <= T::zero() {
        let pol = T::one()
            + x * (T::lit(-8.841_660_499_999_999e-3)
                + x * (T::lit(1.471_414_3e-4)
                    + x * (T::lit(-9.671_989_000_000_001e-7)
                        + x * (T::lit(-3.260_721_7e-8) + x * T::lit(-3.859_807_3e-10)))));
        return T::lit(15.13) / pol.powi(4);
    }

    let pol = x
        * (T::lit(4.961_892_2e-7)
            + x * (T::lit(-6.105_936_5e-9)
                + x * (T::lit(3.940_155_1e-11)
                    + x * (T::lit(-1.258_812_9e-13) + x * T::lit(1.668_828_0e-16)))));
    let pol = T::one() + x * (T::lit(3.618_298_9e-3) + x * (T::lit(-1.360_327_3e-5) + pol));

    T::lit(29.93) / pol.powi(4) + T::lit(0.96) * x - T::lit(14.8)
}
