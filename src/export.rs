//! The data a calendar file for one year is written from.
//!
//! Each festival becomes an all-day entry; turning the rows into iCalendar
//! text is left to the caller.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::ephemeris::Ephemeris;
use crate::festival::Catalog;

/// One calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEntry {
    pub key: String,
    /// Localization key of the entry title.
    pub summary_key: String,
    /// Stable across exports of the same year.
    pub uid: String,
    pub start: DateTime<Utc>,
    /// One day after `start`.
    pub end: DateTime<Utc>,
}

/// Entries for `year`, sorted by start. Fire festivals are always included.
///
/// ```
/// use celtic_wheel::Catalog;
/// use celtic_wheel::export::calendar_entries;
///
/// let entries = calendar_entries(&Catalog::default(), 2025, false);
/// assert_eq!(4, entries.len());
/// assert_eq!("imbolc-2025@celtic-calendar", entries[0].uid);
/// ```
pub fn calendar_entries<E: Ephemeris>(
    catalog: &Catalog<E>,
    year: i32,
    include_solar: bool,
) -> Vec<CalendarEntry> {
    let solar = catalog.solar().iter().filter(|_| include_solar);
    let mut entries: Vec<_> = catalog
        .fire()
        .iter()
        .chain(solar)
        .map(|event| {
            let start = catalog.date(event, year);
            CalendarEntry {
                key: event.key.clone(),
                summary_key: event.name_key.clone(),
                uid: format!("{}-{year}@celtic-calendar", event.key),
                start,
                end: start + Duration::days(1),
            }
        })
        .collect();
    entries.sort_by_key(|e| e.start);
    entries
}

/// Display name of the calendar for `year`.
pub fn calendar_name(year: i32) -> String {
    format!("Celtic Calendar {year}")
}

/// Suggested file name for the calendar of `year`.
pub fn file_name(year: i32) -> String {
    format!("celtic_calendar_{year}.ics")
}
