//! Phases of the Moon, Meeus chapter 49.
//!
//! Lunations are counted by `k` from the new moon of 2000-01-06; `k` carries
//! a fraction of `.25`, `.5` or `.75` for the quarter and full phases.

use super::{Phase, cos_deg, horner, sin_deg};
use crate::time_scales::Tt;

/// Mean number of synodic months in a tropical year.
pub const LUNATIONS_PER_YEAR: f64 = 12.3685;

/// Lunation index `k` of `phase` nearest to `decimal_year`.
///
/// ```
/// use celtic_wheel::ephemeris::{Phase, moon_phase};
///
/// assert_eq!(-283.0, moon_phase::lunation(Phase::New, 1977.13));
/// ```
pub fn lunation(phase: Phase, decimal_year: f64) -> f64 {
    let q = phase.fraction();
    ((decimal_year - 2000.0) * LUNATIONS_PER_YEAR - q).round() + q
}

/// Instant of the lunar `phase` nearest to `decimal_year`.
pub fn jde(phase: Phase, decimal_year: f64) -> Tt {
    true_phase(phase, lunation(phase, decimal_year))
}

/// Mean phase instant of lunation `k`, without periodic terms.
pub fn mean(k: f64) -> Tt {
    let t = k / 1236.85;
    Tt(horner(
        t,
        &[0.0, 0.0, 0.00015437, -0.000000150, 0.00000000073],
    ) + 2451550.09766
        + 29.530588861 * k)
}

/// Instant of the phase at lunation `k`, where the fraction of `k` must
/// match `phase`.
pub fn true_phase(phase: Phase, k: f64) -> Tt {
    let t = k / 1236.85;
    let args = Arguments::new(k, t);
    let correction = match phase {
        Phase::New => args.new_moon(),
        Phase::Full => args.full_moon(),
        Phase::FirstQuarter => args.quarter() + args.quarter_w(),
        Phase::LastQuarter => args.quarter() - args.quarter_w(),
    };
    Tt(mean(k).0 + correction + planetary(k, t))
}

/// Fundamental arguments of the Moon's orbit at lunation `k`, in degrees.
struct Arguments {
    /// Eccentricity of Earth's orbit factor.
    e: f64,
    /// Sun's mean anomaly.
    m: f64,
    /// Moon's mean anomaly.
    mp: f64,
    /// Moon's argument of latitude.
    f: f64,
    /// Longitude of the ascending node.
    om: f64,
}

impl Arguments {
    fn new(k: f64, t: f64) -> Self {
        Self {
            e: horner(t, &[1.0, -0.002516, -0.0000074]),
            m: 2.5534 + 29.10535670 * k + horner(t, &[0.0, 0.0, -0.0000014, -0.00000011]),
            mp: 201.5643
                + 385.81693528 * k
                + horner(t, &[0.0, 0.0, 0.0107582, 0.00001238, -0.000000058]),
            f: 160.7108
                + 390.67050284 * k
                + horner(t, &[0.0, 0.0, -0.0016118, -0.00000227, 0.000000011]),
            om: 124.7746 - 1.56375588 * k + horner(t, &[0.0, 0.0, 0.0020672, 0.00000215]),
        }
    }

    /// Terms shared by new and full moon after the first fifteen.
    fn syzygy_tail(&self) -> f64 {
        let Self { m, mp, f, .. } = *self;
        -0.00007 * sin_deg(mp + 2.0 * m)
            + 0.00004 * sin_deg(2.0 * mp - 2.0 * f)
            + 0.00004 * sin_deg(3.0 * m)
            + 0.00003 * sin_deg(mp + m - 2.0 * f)
            + 0.00003 * sin_deg(2.0 * mp + 2.0 * f)
            - 0.00003 * sin_deg(mp + m + 2.0 * f)
            + 0.00003 * sin_deg(mp - m + 2.0 * f)
            - 0.00002 * sin_deg(mp - m - 2.0 * f)
            - 0.00002 * sin_deg(3.0 * mp + m)
            + 0.00002 * sin_deg(4.0 * mp)
    }

    fn new_moon(&self) -> f64 {
        let Self { e, m, mp, f, om } = *self;
        -0.40720 * sin_deg(mp)
            + 0.17241 * e * sin_deg(m)
            + 0.01608 * sin_deg(2.0 * mp)
            + 0.01039 * sin_deg(2.0 * f)
            + 0.00739 * e * sin_deg(mp - m)
            - 0.00514 * e * sin_deg(mp + m)
            + 0.00208 * e * e * sin_deg(2.0 * m)
            - 0.00111 * sin_deg(mp - 2.0 * f)
            - 0.00057 * sin_deg(mp + 2.0 * f)
            + 0.00056 * e * sin_deg(2.0 * mp + m)
            - 0.00042 * sin_deg(3.0 * mp)
            + 0.00042 * e * sin_deg(m + 2.0 * f)
            + 0.00038 * e * sin_deg(m - 2.0 * f)
            - 0.00024 * e * sin_deg(2.0 * mp - m)
            - 0.00017 * sin_deg(om)
            + self.syzygy_tail()
    }

    fn full_moon(&self) -> f64 {
        let Self { e, m, mp, f, om } = *self;
        -0.40614 * sin_deg(mp)
            + 0.17302 * e * sin_deg(m)
            + 0.01614 * sin_deg(2.0 * mp)
            + 0.01043 * sin_deg(2.0 * f)
            + 0.00734 * e * sin_deg(mp - m)
            - 0.00515 * e * sin_deg(mp + m)
            + 0.00209 * e * e * sin_deg(2.0 * m)
            - 0.00111 * sin_deg(mp - 2.0 * f)
            - 0.00057 * sin_deg(mp + 2.0 * f)
            + 0.00056 * e * sin_deg(2.0 * mp + m)
            - 0.00042 * sin_deg(3.0 * mp)
            + 0.00042 * e * sin_deg(m + 2.0 * f)
            + 0.00038 * e * sin_deg(m - 2.0 * f)
            - 0.00024 * e * sin_deg(2.0 * mp - m)
            - 0.00017 * sin_deg(om)
            + self.syzygy_tail()
    }

    fn quarter(&self) -> f64 {
        let Self { e, m, mp, f, om } = *self;
        -0.62801 * sin_deg(mp)
            + 0.17172 * e * sin_deg(m)
            - 0.01183 * e * sin_deg(mp + m)
            + 0.00862 * sin_deg(2.0 * mp)
            + 0.00804 * sin_deg(2.0 * f)
            + 0.00454 * e * sin_deg(mp - m)
            + 0.00204 * e * e * sin_deg(2.0 * m)
            - 0.00180 * sin_deg(mp - 2.0 * f)
            - 0.00070 * sin_deg(mp + 2.0 * f)
            - 0.00040 * sin_deg(3.0 * mp)
            - 0.00034 * e * sin_deg(2.0 * mp - m)
            + 0.00032 * e * sin_deg(m + 2.0 * f)
            + 0.00032 * e * sin_deg(m - 2.0 * f)
            - 0.00028 * e * e * sin_deg(mp + 2.0 * m)
            + 0.00027 * e * sin_deg(2.0 * mp + m)
            - 0.00017 * sin_deg(om)
            - 0.00005 * sin_deg(mp - m - 2.0 * f)
            + 0.00004 * sin_deg(2.0 * mp + 2.0 * f)
            - 0.00004 * sin_deg(mp + m + 2.0 * f)
            + 0.00004 * sin_deg(mp - 2.0 * m)
            + 0.00003 * sin_deg(mp + m - 2.0 * f)
            + 0.00003 * sin_deg(3.0 * m)
            + 0.00002 * sin_deg(2.0 * mp - 2.0 * f)
            + 0.00002 * sin_deg(mp - m + 2.0 * f)
            - 0.00002 * sin_deg(3.0 * mp + m)
    }

    /// Added for first quarter, subtracted for last quarter.
    fn quarter_w(&self) -> f64 {
        let Self { e, m, mp, f, .. } = *self;
        0.00306 - 0.00038 * e * cos_deg(m) + 0.00026 * cos_deg(mp) - 0.00002 * cos_deg(mp - m)
            + 0.00002 * cos_deg(mp + m)
            + 0.00002 * cos_deg(2.0 * f)
    }
}

/// `(coefficient, A₀, rate)` of the planetary arguments `A₁..A₁₄`.
const PLANETARY: [(f64, f64, f64); 14] = [
    (0.000325, 299.77, 0.107408),
    (0.000165, 251.88, 0.016321),
    (0.000164, 251.83, 26.651886),
    (0.000126, 349.42, 36.412478),
    (0.000110, 84.66, 18.206239),
    (0.000062, 141.74, 53.303771),
    (0.000060, 207.14, 2.453732),
    (0.000056, 154.84, 7.306860),
    (0.000047, 34.52, 27.261239),
    (0.000042, 207.19, 0.121824),
    (0.000040, 291.34, 1.844379),
    (0.000037, 161.72, 24.198154),
    (0.000035, 239.56, 25.513099),
    (0.000023, 331.55, 3.592518),
];

fn planetary(k: f64, t: f64) -> f64 {
    PLANETARY
        .iter()
        .enumerate()
        .map(|(i, &(coeff, a0, rate))| {
            // A₁ alone carries a T² term.
            let a = a0 + rate * k - if i == 0 { 0.009173 * t * t } else { 0.0 };
            coeff * sin_deg(a)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_scales::Ut;
    use chrono::{TimeZone, Utc};

    #[test]
    fn meeus_example() {
        let k = lunation(Phase::New, 1977.13);
        assert_eq!(-283.0, k);
        let jde = true_phase(Phase::New, k);
        assert!((jde.0 - 2443192.65118).abs() < 1e-4, "{jde:?}");
    }

    #[test]
    fn lunation_keeps_phase_fraction() {
        for phase in Phase::ALL {
            let k = lunation(phase, 2024.5);
            assert_eq!(phase.fraction(), k.rem_euclid(1.0), "{phase:?}");
        }
    }

    #[test]
    fn lunation_is_stable_at_its_own_decimal_year() {
        for k in -1200..1200 {
            for phase in Phase::ALL {
                let k = k as f64 + phase.fraction();
                let y = 2000.0 + k / LUNATIONS_PER_YEAR;
                assert_eq!(k, lunation(phase, y));
            }
        }
    }

    #[test]
    fn phases_in_january_2024() {
        let dataset = [
            (Phase::LastQuarter, 2024.01, (2024, 1, 4, 3, 30)),
            (Phase::New, 2024.03, (2024, 1, 11, 11, 57)),
            (Phase::FirstQuarter, 2024.05, (2024, 1, 18, 3, 52)),
            (Phase::Full, 2024.07, (2024, 1, 25, 17, 54)),
        ];
        for (phase, y, (yy, m, d, h, min)) in dataset {
            let instant = Ut::convert(jde(phase, y)).to_instant();
            let expected = Utc.with_ymd_and_hms(yy, m, d, h, min, 0).unwrap();
            assert!(
                (instant - expected).num_seconds().abs() < 120,
                "{phase:?}: {instant}"
            );
        }
    }
}
