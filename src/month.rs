//! Months of a year, as the wheel's outer ring shows them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::date::{Date, YearType};

/// English month names, used as keys.
pub const MONTH_KEYS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// One calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthInfo {
    /// `0..12`
    pub index: u32,
    pub key: &'static str,
    pub name_key: String,
    pub days: u32,
    pub start: DateTime<Utc>,
    /// First day of the second half: start plus `ceil(days / 2) - 1` days.
    pub middle: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The twelve months of `year`, each day at midnight UTC.
///
/// ```
/// use celtic_wheel::month::months;
///
/// let feb = &months(2024)[1];
/// assert_eq!(29, feb.days);
/// assert_eq!("months.february", feb.name_key);
/// ```
pub fn months(year: i32) -> Vec<MonthInfo> {
    let year_type = YearType::from_gregorian(year);
    (0..12u32)
        .map(|index| {
            let days = year_type.days_in_month(index + 1);
            let start = Date::from_gregorian(year, index as i32 + 1, 1);
            let key = MONTH_KEYS[index as usize];
            MonthInfo {
                index,
                key,
                name_key: format!("months.{key}"),
                days,
                start: start.midnight_utc(),
                middle: (start + (days.div_ceil(2) as i32 - 1)).midnight_utc(),
                end: (start + (days as i32 - 1)).midnight_utc(),
            }
        })
        .collect()
}
