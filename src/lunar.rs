//! Every new moon, quarter and full moon of a calendar year.
//!
//! Lunation indices only approximate a year boundary, so the scan covers two
//! extra lunations on either side, keeps what lands in the target UTC year
//! and drops repeats.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, trace};

use crate::ephemeris::{Ephemeris, LUNATIONS_PER_YEAR, Phase};

/// One instant at which the Moon reaches a phase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PhaseOccurrence {
    /// `<phase>-<ISO instant>`, unique within a year.
    pub id: String,
    pub phase: Phase,
    pub instant: DateTime<Utc>,
    pub label_key: String,
}

/// Range of lunation indices, counted from 2000, that surely covers `year`.
pub fn lunation_window(year: i32) -> (i64, i64) {
    let years = year as f64 - 2000.0;
    let start = (years * LUNATIONS_PER_YEAR).floor() as i64 - 2;
    let end = ((years + 1.0) * LUNATIONS_PER_YEAR).ceil() as i64 + 2;
    (start, end)
}

/// All phase occurrences whose UTC year is `year`, sorted by instant.
///
/// ```
/// use celtic_wheel::ephemeris::{Meeus, Phase};
/// use celtic_wheel::lunar::lunar_phases;
///
/// let phases = lunar_phases(&Meeus, 2024);
/// let full_moons = phases.iter().filter(|p| p.phase == Phase::Full).count();
/// assert!((12..=13).contains(&full_moons));
/// ```
pub fn lunar_phases<E: Ephemeris>(ephemeris: &E, year: i32) -> Vec<PhaseOccurrence> {
    let (start, end) = lunation_window(year);
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for base in start..=end {
        for phase in Phase::ALL {
            let k = base as f64 + phase.fraction();
            let decimal_year = 2000.0 + k / LUNATIONS_PER_YEAR;
            let instant = ephemeris.to_instant(ephemeris.lunar_phase(phase, decimal_year));
            if instant.year() != year {
                continue;
            }
            let id = format!(
                "{}-{}",
                phase.key(),
                instant.to_rfc3339_opts(SecondsFormat::Millis, true)
            );
            if !seen.insert(id.clone()) {
                trace!(%id, "dropped repeated phase");
                continue;
            }
            items.push(PhaseOccurrence {
                id,
                phase,
                instant,
                label_key: phase.label_key(),
            });
        }
    }

    items.sort_by_key(|p| p.instant);
    debug!(year, count = items.len(), "collected lunar phases");
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::Meeus;
    use crate::time_scales::Tt;
    use chrono::TimeZone;

    fn count(phases: &[PhaseOccurrence], phase: Phase) -> usize {
        phases.iter().filter(|p| p.phase == phase).count()
    }

    #[test]
    fn window_brackets_year() {
        assert_eq!((-2, 15), lunation_window(2000));
        assert_eq!((294, 312), lunation_window(2024));
    }

    #[test]
    fn year_2024() {
        let phases = lunar_phases(&Meeus, 2024);
        for phase in Phase::ALL {
            let n = count(&phases, phase);
            assert!((12..=13).contains(&n), "{phase:?}: {n}");
        }
        assert!(phases.windows(2).all(|w| w[0].instant <= w[1].instant));
        assert!(phases.iter().all(|p| p.instant.year() == 2024));

        let first = &phases[0];
        assert_eq!(Phase::LastQuarter, first.phase);
        let expected = Utc.with_ymd_and_hms(2024, 1, 4, 3, 30, 0).unwrap();
        assert!((first.instant - expected).num_seconds().abs() < 120);
        assert!(first.id.starts_with("last-quarter-2024-01-04T03:"));
        assert_eq!("festival-wheel.lunar-phases.last-quarter", first.label_key);
    }

    #[test]
    fn thirteen_full_moons_in_2028() {
        // Full moons on 2028-01-12 and 2028-12-31.
        let phases = lunar_phases(&Meeus, 2028);
        assert_eq!(13, count(&phases, Phase::Full));
    }

    #[test]
    fn unique_for_every_year() {
        for year in 1900..=2099 {
            let phases = lunar_phases(&Meeus, year);
            let ids: HashSet<_> = phases.iter().map(|p| &p.id).collect();
            assert_eq!(ids.len(), phases.len(), "{year}");
            for phase in Phase::ALL {
                let n = count(&phases, phase);
                assert!((12..=13).contains(&n), "{year} {phase:?}: {n}");
            }
        }
    }

    /// Ignores the fractional year and returns the same instant for every
    /// lunation of a phase, the worst case for repeats.
    struct Stuck;

    impl Ephemeris for Stuck {
        fn equinox_solstice(&self, kind: crate::ephemeris::Solstice, year: i32) -> Tt {
            Meeus.equinox_solstice(kind, year)
        }
        fn lunar_phase(&self, phase: Phase, _decimal_year: f64) -> Tt {
            Tt(2460400.5 + phase.fraction() * 29.5)
        }
    }

    #[test]
    fn repeats_are_dropped() {
        let phases = lunar_phases(&Stuck, 2024);
        assert_eq!(4, phases.len());
        let order: Vec<_> = phases.iter().map(|p| p.phase).collect();
        assert_eq!(Phase::ALL.to_vec(), order);
    }
}
