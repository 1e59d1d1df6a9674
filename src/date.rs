//! Calendar-independant date, and the day-of-year arithmetic the wheel is
//! laid out with.

use std::ops::{Add, Sub};

use chrono::{DateTime, Datelike, Utc};

/// Julian day number of 1970-01-01, the Unix epoch.
const UNIX_EPOCH_JDN: i32 = 2440588;

const MS_PER_DAY: i64 = 86_400_000;

/// A calendar-independant date.
///
/// Internally a Julian day number (JDN). Dates are whole civil days with no
/// time zone attached; converting from an instant always uses its UTC
/// components.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Date {
    jdn: i32,
}

impl Date {
    /// Creates a `Date` with a Julian day number (JDN).
    pub fn from_jdn(jdn: i32) -> Self {
        Self { jdn }
    }
    /// Returns the Julian day number (JDN) of the date.
    pub fn jdn(&self) -> i32 {
        self.jdn
    }

    /// Creates a `Date` with a Gregorian calendar date.
    ///
    /// `year` should be an astronomical year number, i.e. 1 BC is `0`, 2
    /// BC is `-1`, etc. Out-of-range months and days are not checked, and
    /// day numbers beyond the range of `i32` saturate.
    ///
    /// # Example
    ///
    /// ```
    /// use celtic_wheel::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1);
    /// assert_eq!(2451545, date.jdn());
    /// ```
    pub fn from_gregorian(year: i32, month: i32, day: i32) -> Self {
        let (y, m, d) = (year as i64, month as i64, day as i64);
        let jdn = (1461 * (y + 4800 + (m - 14) / 12)) / 4 + (367 * (m - 2 - 12 * ((m - 14) / 12))) / 12
            - (3 * ((y + 4900 + (m - 14) / 12) / 100)) / 4
            + d
            - 32075;
        Self::from_jdn(jdn.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }
    /// Represents the date in Gregorian calendar.
    ///
    /// Returns in `(year, month, day)` format.
    ///
    /// # Example
    ///
    /// ```
    /// use celtic_wheel::Date;
    ///
    /// let date = Date::from_jdn(2451545);
    /// assert_eq!((2000, 1, 1), date.gregorian());
    /// ```
    pub fn gregorian(&self) -> (i32, i32, i32) {
        let jdn = self.jdn as i64;
        let f = jdn + 1401 + (((4 * jdn + 274277) / 146097) * 3) / 4 - 38;
        let e = 4 * f + 3;
        let g = (e % 1461) / 4;
        let h = 5 * g + 2;
        let day = (h % 153) / 5 + 1;
        let month = (h / 153 + 2) % 12 + 1;
        let year = e / 1461 - 4716 + (12 + 2 - month) / 12;
        (year as i32, month as i32, day as i32)
    }
    /// Formats the date in ISO 8601 format.
    ///
    /// # Example
    ///
    /// ```
    /// use celtic_wheel::Date;
    ///
    /// let date = Date::from_gregorian(2024, 10, 31);
    /// assert_eq!("2024-10-31", date.iso_gregorian());
    /// ```
    pub fn iso_gregorian(&self) -> String {
        let (y, m, d) = self.gregorian();
        format!("{:04}-{:02}-{:02}", y, m, d)
    }

    /// The UTC calendar day an instant falls on. Time of day is discarded.
    pub fn from_instant(instant: &DateTime<Utc>) -> Self {
        Self::from_gregorian(instant.year(), instant.month() as i32, instant.day() as i32)
    }
    /// Midnight UTC at the start of the date.
    ///
    /// # Example
    ///
    /// ```
    /// use celtic_wheel::Date;
    ///
    /// let midnight = Date::from_gregorian(1970, 1, 2).midnight_utc();
    /// assert_eq!(86_400_000, midnight.timestamp_millis());
    /// ```
    pub fn midnight_utc(&self) -> DateTime<Utc> {
        instant_from_millis((self.jdn as i64 - UNIX_EPOCH_JDN as i64) * MS_PER_DAY)
    }

    /// Ordinal day within the date's own Gregorian year, `1..=366`.
    ///
    /// # Example
    ///
    /// ```
    /// use celtic_wheel::Date;
    ///
    /// assert_eq!(1, Date::from_gregorian(2023, 1, 1).day_of_year());
    /// assert_eq!(366, Date::from_gregorian(2024, 12, 31).day_of_year());
    /// ```
    pub fn day_of_year(&self) -> u32 {
        let (y, m, d) = self.gregorian();
        ordinal_day_number(m, d, YearType::from_gregorian(y)) as u32
    }
}

impl Add<i32> for Date {
    type Output = Date;
    fn add(self, rhs: i32) -> Self::Output {
        Date::from_jdn(self.jdn.saturating_add(rhs))
    }
}
impl Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> Self::Output {
        self.jdn.saturating_sub(rhs.jdn)
    }
}

/// Indicates whether a year is a leap year or common year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum YearType {
    Common,
    Leap,
}

impl YearType {
    /// Determines if `year` is a leap year in Gregorian calendar.
    pub fn from_gregorian(year: i32) -> Self {
        if year % 4 == 0 && year % 100 != 0 || year % 400 == 0 {
            Self::Leap
        } else {
            Self::Common
        }
    }
    /// Returns `true` if `self` is `Leap`, otherwise `false`.
    pub fn is_leap(&self) -> bool {
        matches!(self, YearType::Leap)
    }
    /// Number of days in the year, 365 or 366.
    pub fn days(&self) -> u32 {
        365 + self.is_leap() as u32
    }
    /// Number of days in `month` (`1..=12`).
    pub fn days_in_month(&self, month: u32) -> u32 {
        match month {
            2 => 28 + self.is_leap() as u32,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }
}

/// Gregorian leap-year rule.
///
/// ```
/// use celtic_wheel::date::is_leap_year;
///
/// assert!(is_leap_year(2000));
/// assert!(!is_leap_year(1900));
/// ```
pub fn is_leap_year(year: i32) -> bool {
    YearType::from_gregorian(year).is_leap()
}

/// Ordinal day (`1..=366`) of the UTC calendar day `instant` falls on.
///
/// Time of day never changes the result.
pub fn day_of_year(instant: &DateTime<Utc>) -> u32 {
    Date::from_instant(instant).day_of_year()
}

/// Builds an instant from Unix milliseconds, saturating at the ends of the
/// representable range instead of failing.
pub(crate) fn instant_from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(if ms < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

fn ordinal_day_number(month: i32, day: i32, year_type: YearType) -> i32 {
    day + match month {
        1 => 0,
        2 => 31,
        _ => 59 + (153 * (month - 3) + 2) / 5 + year_type.is_leap() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn from_gregorian() {
        let date = Date::from_gregorian(1970, 1, 1);
        assert_eq!(2440588, date.jdn());
        let date = Date::from_gregorian(2021, 9, 8);
        assert_eq!(2459466, date.jdn());
    }

    #[test]
    fn to_gregorian() {
        let date = Date::from_jdn(2440588);
        assert_eq!((1970, 1, 1), date.gregorian());
        let date = Date::from_jdn(2459466);
        assert_eq!((2021, 9, 8), date.gregorian());
        let date = Date::from_jdn(2451545);
        assert_eq!((2000, 1, 1), date.gregorian());
    }

    #[test]
    fn leap_years() {
        for (year, leap) in [(2000, true), (1900, false), (2024, true), (2023, false)] {
            assert_eq!(leap, is_leap_year(year), "{year}");
        }
        assert_eq!(366, YearType::from_gregorian(2024).days());
        assert_eq!(29, YearType::Leap.days_in_month(2));
        assert_eq!(30, YearType::Common.days_in_month(11));
    }

    #[test]
    fn day_of_year_ignores_time_of_day() {
        let morning = Utc.with_ymd_and_hms(2023, 7, 2, 0, 0, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2023, 7, 2, 23, 59, 59).unwrap();
        assert_eq!(183, day_of_year(&morning));
        assert_eq!(183, day_of_year(&night));
    }

    #[test]
    fn midnight_round_trip() {
        let date = Date::from_gregorian(2024, 2, 29);
        let midnight = date.midnight_utc();
        assert_eq!(Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap(), midnight);
        assert_eq!(date, Date::from_instant(&midnight));
        assert_eq!(1, (date + 1) - date);
    }

    #[test]
    fn far_years_saturate() {
        let date = Date::from_gregorian(1_500_000, 3, 1);
        assert_eq!((1_500_000, 3, 1), date.gregorian());
        assert_eq!(DateTime::<Utc>::MAX_UTC, date.midnight_utc());

        let last = Date::from_gregorian(i32::MAX, 12, 31);
        assert_eq!(i32::MAX, last.jdn());
        assert_eq!(last, last + 1);
        let first = Date::from_gregorian(i32::MIN, 1, 1);
        assert_eq!(DateTime::<Utc>::MIN_UTC, first.midnight_utc());
        assert_eq!(i32::MAX, last - first);
        let _ = first.gregorian();
        let _ = last.day_of_year();
    }

    #[test]
    fn iso_format() {
        assert_eq!("2021-09-08", Date::from_gregorian(2021, 9, 8).iso_gregorian());
    }
}
