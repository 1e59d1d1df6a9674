//! Equinoxes and solstices, Meeus chapter 27.
//!
//! The mean instant comes from a polynomial in the year, then a sum of 24
//! periodic terms corrects it. The result is good to about a minute between
//! years -1000 and 3000.

use super::{Solstice, cos_deg, horner};
use crate::time_scales::Tt;

/// Mean-instant polynomials for years -1000..1000, argument `year / 1000`.
const MEAN_EARLY: [[f64; 5]; 4] = [
    [1721139.29189, 365242.13740, 0.06134, 0.00111, -0.00071],
    [1721233.25401, 365241.72562, -0.05323, 0.00907, 0.00025],
    [1721325.70455, 365242.49558, -0.11677, -0.00297, 0.00074],
    [1721414.39987, 365242.88257, -0.00769, -0.00933, -0.00006],
];

/// Mean-instant polynomials for years 1000..3000, argument
/// `(year - 2000) / 1000`.
const MEAN_MODERN: [[f64; 5]; 4] = [
    [2451623.80984, 365242.37404, 0.05169, -0.00411, -0.00057],
    [2451716.56767, 365241.62603, 0.00325, 0.00888, -0.00030],
    [2451810.21715, 365242.01767, -0.11575, 0.00337, 0.00078],
    [2451900.05952, 365242.74049, -0.06223, -0.00823, 0.00032],
];

/// Periodic terms `(A, B, C)` of `A cos(B + C T)`.
const TERMS: [(f64, f64, f64); 24] = [
    (485.0, 324.96, 1934.136),
    (203.0, 337.23, 32964.467),
    (199.0, 342.08, 20.186),
    (182.0, 27.85, 445267.112),
    (156.0, 73.14, 45036.886),
    (136.0, 171.52, 22518.443),
    (77.0, 222.54, 65928.934),
    (74.0, 296.72, 3034.906),
    (70.0, 243.58, 9037.513),
    (58.0, 119.81, 33718.147),
    (52.0, 297.17, 150.678),
    (50.0, 21.02, 2281.226),
    (45.0, 247.54, 29929.562),
    (44.0, 325.15, 31555.956),
    (29.0, 60.93, 4443.417),
    (18.0, 155.12, 67555.328),
    (17.0, 288.79, 4562.452),
    (16.0, 198.04, 62894.029),
    (14.0, 199.76, 31436.921),
    (12.0, 95.39, 14577.848),
    (12.0, 287.11, 31931.756),
    (12.0, 320.81, 34777.259),
    (9.0, 227.73, 1222.114),
    (8.0, 15.45, 16859.074),
];

/// Mean instant of the equinox or solstice, before periodic corrections.
pub fn mean(kind: Solstice, year: i32) -> Tt {
    let idx = kind as usize;
    Tt(if year < 1000 {
        horner(year as f64 / 1000.0, &MEAN_EARLY[idx])
    } else {
        horner((year - 2000) as f64 / 1000.0, &MEAN_MODERN[idx])
    })
}

/// Instant of the equinox or solstice of `kind` in `year`.
///
/// # Example
///
/// ```
/// use celtic_wheel::ephemeris::{Solstice, solstice};
///
/// // Meeus example 27.a
/// let jde = solstice::jde(Solstice::June, 1962);
/// assert!((jde.0 - 2437837.39245).abs() < 1e-4);
/// ```
pub fn jde(kind: Solstice, year: i32) -> Tt {
    let jde0 = mean(kind, year).0;
    let t = (jde0 - 2451545.0) / 36525.0;
    let w = 35999.373 * t - 2.47;
    let dl = 1.0 + 0.0334 * cos_deg(w) + 0.0007 * cos_deg(2.0 * w);
    let s: f64 = TERMS.iter().map(|&(a, b, c)| a * cos_deg(b + c * t)).sum();
    Tt(jde0 + 0.00001 * s / dl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_scales::Ut;
    use chrono::{TimeZone, Utc};

    #[test]
    fn meeus_example() {
        let jde0 = mean(Solstice::June, 1962);
        assert!((jde0.0 - 2437837.38589).abs() < 2e-5, "{jde0:?}");
        let jde = jde(Solstice::June, 1962);
        assert!((jde.0 - 2437837.39245).abs() < 1e-4, "{jde:?}");
    }

    #[test]
    fn known_instants() {
        let dataset = [
            (Solstice::June, 2024, (6, 20, 20, 51)),
            (Solstice::September, 2024, (9, 22, 12, 44)),
            (Solstice::December, 2024, (12, 21, 9, 20)),
            (Solstice::March, 2000, (3, 20, 7, 35)),
        ];
        for (kind, year, (m, d, h, min)) in dataset {
            let instant = Ut::convert(jde(kind, year)).to_instant();
            let expected = Utc.with_ymd_and_hms(year, m, d, h, min, 0).unwrap();
            assert!(
                (instant - expected).num_seconds().abs() < 120,
                "{kind:?} {year}: {instant}"
            );
        }
    }

    #[test]
    fn early_years_use_other_polynomial() {
        let jde = jde(Solstice::March, 500);
        // Julian-day count of the March equinox in year 500 lands in March.
        assert!((jde.0 - mean(Solstice::March, 500).0).abs() < 0.025);
        assert!(jde.0 > 1903000.0 && jde.0 < 1904000.0, "{jde:?}");
    }
}
