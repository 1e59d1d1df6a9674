//! Astronomical date provider.
//!
//! Everything the festival calendar needs from astronomy goes through the
//! [`Ephemeris`] trait: the instants of the equinoxes and solstices of a year,
//! and the instant of a given lunar phase nearest a decimal year. [`Meeus`]
//! is the bundled implementation, see [`solstice`] and [`moon_phase`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time_scales::{Tt, Ut};

pub mod moon_phase;
pub mod solstice;

pub use moon_phase::LUNATIONS_PER_YEAR;

/// Source of astronomical instants, as Julian ephemeris days in [`Tt`].
///
/// Implementations must be deterministic: the same arguments always give the
/// same result, so callers may cache freely.
pub trait Ephemeris {
    /// The instant of the equinox or solstice of `kind` in `year`.
    fn equinox_solstice(&self, kind: Solstice, year: i32) -> Tt;
    /// The instant of the lunar `phase` closest to `decimal_year`.
    fn lunar_phase(&self, phase: Phase, decimal_year: f64) -> Tt;
    /// Converts an ephemeris time into a civil instant.
    fn to_instant(&self, tt: Tt) -> DateTime<Utc> {
        Ut::convert(tt).to_instant()
    }
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn equinox_solstice(&self, kind: Solstice, year: i32) -> Tt {
        (**self).equinox_solstice(kind, year)
    }
    fn lunar_phase(&self, phase: Phase, decimal_year: f64) -> Tt {
        (**self).lunar_phase(phase, decimal_year)
    }
    fn to_instant(&self, tt: Tt) -> DateTime<Utc> {
        (**self).to_instant(tt)
    }
}

/// Equinoxes and solstices, named by the month they fall in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Solstice {
    March,
    June,
    September,
    December,
}

impl Solstice {
    pub const ALL: [Solstice; 4] = [
        Solstice::March,
        Solstice::June,
        Solstice::September,
        Solstice::December,
    ];
}

/// The four principal phases of the Moon.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::New, Phase::FirstQuarter, Phase::Full, Phase::LastQuarter];

    /// Fraction of a lunation at which the phase occurs, counted from new
    /// moon.
    pub fn fraction(&self) -> f64 {
        match self {
            Phase::New => 0.0,
            Phase::FirstQuarter => 0.25,
            Phase::Full => 0.5,
            Phase::LastQuarter => 0.75,
        }
    }
    /// Stable identifier, e.g. `first-quarter`.
    pub fn key(&self) -> &'static str {
        match self {
            Phase::New => "new",
            Phase::FirstQuarter => "first-quarter",
            Phase::Full => "full",
            Phase::LastQuarter => "last-quarter",
        }
    }
    /// Localization key of the phase's label.
    pub fn label_key(&self) -> String {
        format!("festival-wheel.lunar-phases.{}", self.key())
    }
}

/// Equinoxes, solstices and lunar phases computed with the algorithms of
/// Jean Meeus, *Astronomical Algorithms* (2nd ed.), chapters 27 and 49.
///
/// Accurate to well under a minute for the years 1900 to 2100.
#[derive(Debug, Default, Copy, Clone)]
pub struct Meeus;

impl Ephemeris for Meeus {
    fn equinox_solstice(&self, kind: Solstice, year: i32) -> Tt {
        solstice::jde(kind, year)
    }
    fn lunar_phase(&self, phase: Phase, decimal_year: f64) -> Tt {
        moon_phase::jde(phase, decimal_year)
    }
}

/// Sine of an angle given in degrees.
fn sin_deg(deg: f64) -> f64 {
    deg.rem_euclid(360.0).to_radians().sin()
}

/// Cosine of an angle given in degrees.
fn cos_deg(deg: f64) -> f64 {
    deg.rem_euclid(360.0).to_radians().cos()
}

/// Evaluates `c[0] + c[1] x + c[2] x² + …`.
fn horner(x: f64, c: &[f64]) -> f64 {
    c.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    #[test]
    fn phase_keys() {
        assert_eq!("last-quarter", Phase::LastQuarter.key());
        assert_eq!("festival-wheel.lunar-phases.full", Phase::Full.label_key());
        let fractions: Vec<_> = Phase::ALL.iter().map(Phase::fraction).collect();
        assert_eq!(vec![0.0, 0.25, 0.5, 0.75], fractions);
    }

    #[test]
    fn provider_instants() {
        let eph = Meeus;
        let equinox = eph.to_instant(eph.equinox_solstice(Solstice::March, 2024));
        // 2024-03-20T03:06Z
        let expected = Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap();
        assert!((equinox - expected).num_seconds().abs() < 120, "{equinox}");

        let full = eph.to_instant(eph.lunar_phase(Phase::Full, 2024.07));
        // 2024-01-25T17:54Z
        let expected = Utc.with_ymd_and_hms(2024, 1, 25, 17, 54, 0).unwrap();
        assert!((full - expected).num_seconds().abs() < 120, "{full}");
        assert_eq!(2024, full.year());
    }

    #[test]
    fn polynomial() {
        assert_eq!(1.0 + 2.0 * 3.0 + 4.0 * 9.0, horner(3.0, &[1.0, 2.0, 4.0]));
    }
}
