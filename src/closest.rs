//! Today's festival, or the next one to come.
//!
//! The reference instant is always passed in, together with the observer's
//! time zone (through `DateTime<Tz>`), so "today" means the observer's local
//! calendar day.
//!
//! Only the events of the reference instant's own year are searched. Once the
//! last of them has passed there is no next festival until the caller asks
//! with the following year's events.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use serde::Serialize;

use crate::ephemeris::Ephemeris;
use crate::festival::{Catalog, Event, keys};

const MS_PER_DAY: i64 = 86_400_000;

/// Text key of the line announcing today's festival.
pub const TODAYS_FESTIVAL_KEY: &str = "todays-festival";
/// Text key of the line announcing the next festival.
pub const NEXT_FESTIVAL_KEY: &str = "next-festival";

/// Result of a closest-festival lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Closest<'a> {
    /// An event falls on the observer's current day.
    Today { event: &'a Event },
    /// The earliest event still to come this year.
    Next {
        event: &'a Event,
        days_remaining: i64,
    },
    /// Every event of the year has passed.
    Nothing,
}

impl Closest<'_> {
    /// Key of the text describing the result, with `festivalName` and
    /// `daysRemaining` as its parameters. `None` for [`Closest::Nothing`].
    pub fn text_key(&self) -> Option<&'static str> {
        match self {
            Closest::Today { .. } => Some(TODAYS_FESTIVAL_KEY),
            Closest::Next { .. } => Some(NEXT_FESTIVAL_KEY),
            Closest::Nothing => None,
        }
    }
}

/// Local calendar day of an instant.
fn local_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.date_naive()
}

/// The first event of `events` falling on `now`'s local day.
///
/// The synthetic `today` marker is never a match.
pub fn todays_festival<'a, E, Tz>(
    catalog: &Catalog<E>,
    events: &[&'a Event],
    now: &DateTime<Tz>,
) -> Option<&'a Event>
where
    E: Ephemeris,
    Tz: TimeZone,
{
    let today = local_day(now);
    let year = now.year();
    events
        .iter()
        .copied()
        .filter(|e| e.key != keys::TODAY)
        .find(|e| local_day(&catalog.date(e, year).with_timezone(&now.timezone())) == today)
}

/// The earliest event strictly after `now` in `now`'s year, with the number
/// of days left, rounded up.
pub fn next_festival<'a, E, Tz>(
    catalog: &Catalog<E>,
    events: &[&'a Event],
    now: &DateTime<Tz>,
) -> Option<(&'a Event, i64)>
where
    E: Ephemeris,
    Tz: TimeZone,
{
    let year = now.year();
    let now_ms = now.timestamp_millis();
    events
        .iter()
        .copied()
        .map(|e| (e, catalog.date(e, year).timestamp_millis()))
        .filter(|&(_, ms)| ms > now_ms)
        .min_by_key(|&(_, ms)| ms)
        .map(|(e, ms)| (e, div_ceil(ms - now_ms, MS_PER_DAY)))
}

/// Today's festival if there is one, otherwise the next.
///
/// ```
/// use celtic_wheel::Catalog;
/// use celtic_wheel::closest::{Closest, closest_festival};
/// use chrono::{TimeZone, Utc};
///
/// let catalog = Catalog::default();
/// let events = catalog.build_events(2024, true, false);
/// let now = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
/// match closest_festival(&catalog, &events, &now) {
///     Closest::Next { event, days_remaining } => {
///         assert_eq!("samhain", event.key);
///         assert_eq!(30, days_remaining);
///     }
///     other => panic!("{other:?}"),
/// }
/// ```
pub fn closest_festival<'a, E, Tz>(
    catalog: &Catalog<E>,
    events: &[&'a Event],
    now: &DateTime<Tz>,
) -> Closest<'a>
where
    E: Ephemeris,
    Tz: TimeZone,
{
    if let Some(event) = todays_festival(catalog, events, now) {
        return Closest::Today { event };
    }
    match next_festival(catalog, events, now) {
        Some((event, days_remaining)) => Closest::Next {
            event,
            days_remaining,
        },
        None => Closest::Nothing,
    }
}

fn div_ceil(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b > 0 { q + 1 } else { q }
}
