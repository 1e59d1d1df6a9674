//! Deals with different time scales, specifically, conversion from TT (the
//! scale ephemeris results come in) into UT and then into civil instants.
//!
//! Only conversions necessary for other computations in this crate are
//! included.

use chrono::{DateTime, Utc};

use crate::date::instant_from_millis;

/// Julian date of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2440587.5;

/// [Terristrial time](https://en.wikipedia.org/wiki/Terrestrial_Time),
/// represented in Julian date (JD).
///
/// This is the "Julian ephemeris day" (JDE) astronomical formulae produce.
/// TDB differs no more than centiseconds from TT, so the two are treated
/// numerically the same here.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tt(pub f64);

impl Tt {
    /// Gregorian decimal year of the time point, e.g. `2000.0` near
    /// 2000-01-01.
    pub fn decimal_year(&self) -> f64 {
        (self.0 - 2451544.5) / 365.2425 + 2000.0
    }
}

impl From<Tai> for Tt {
    fn from(tai: Tai) -> Tt {
        Tt(tai.0 + 32.184 / 86400.0)
    }
}

/// [International atomic time](https://en.wikipedia.org/wiki/International_Atomic_Time),
/// represented in Julian date (JD).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tai(pub f64);

impl From<Tt> for Tai {
    fn from(tt: Tt) -> Tai {
        Tai(tt.0 - 32.184 / 86400.0)
    }
}

/// [Universal time](https://en.wikipedia.org/wiki/Universal_Time), the actual
/// civil time used for determining the actual date at a given time point.
///
/// This can be either UTC (coordinated universal time, based on TAI with leap
/// seconds) or UT1 (mean solar time on the Prime Meridian) depending on the
/// year. Specifically, UTC from 1972-01-01T00:00Z to the latest known leap
/// second, UT1 otherwise.
///
/// Before 1972, UT1 comes from the polynomial fits of ΔT published by Espenak
/// and Meeus. After the leap-second table expires, ΔT is extrapolated with
/// [a method described here](https://astro.ukho.gov.uk/nao/lvm/).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Ut(pub f64);

impl Ut {
    /// Converts a TAI (or other time scale easily convertible to TAI) into
    /// UT.
    ///
    /// # Example
    ///
    /// ```
    /// use celtic_wheel::time_scales::{Tt, Ut};
    /// use chrono::Datelike;
    ///
    /// let ut = Ut::convert(Tt(2451543.166666667));
    /// let instant = ut.to_instant();
    /// assert_eq!((1999, 12, 30), (instant.year(), instant.month(), instant.day()));
    /// ```
    pub fn convert<T>(time: T) -> Self
    where
        T: Into<Tai>,
    {
        let tai = time.into();
        let &leap_seconds::Data {
            starts,
            ref leap_seconds,
            expires,
            c2,
        } = leap_seconds::data();

        if tai < starts {
            let tt = Tt::from(tai);
            return Ut(tt.0 - delta_t::before_utc(tt.decimal_year()) / 86400.0); // NOTE UT1
        } else if tai > expires {
            let diff = leap_seconds::estimate(tai) + c2;
            return Ut(tai.0 - diff / 86400.0); // NOTE UT1, not UTC
        }

        let ls = match leap_seconds.partition_point(|ls| ls.tai <= tai) {
            0 => return Ut(tai.0 - 10.0 / 86400.0),
            i => &leap_seconds[i - 1],
        };
        // UTC spends two TAI seconds on 23:59:59 and 23:59:60.
        let leap = ((tai.0 - ls.tai.0) * 86400.0).min(2.0) / 2.0;
        Ut(tai.0 - (ls.delta_secs as f64 + leap) / 86400.0)
    }
    /// The civil instant of the time point, rounded to the millisecond.
    pub fn to_instant(&self) -> DateTime<Utc> {
        instant_from_millis(((self.0 - UNIX_EPOCH_JD) * 86_400_000.0).round() as i64)
    }
}

mod delta_t {
    /// ΔT = TT − UT1 in seconds for years before UTC existed.
    ///
    /// Piecewise polynomials from Espenak & Meeus, "Five Millennium Canon of
    /// Solar Eclipses" (2006); the long-term parabola outside 1800..1972.
    pub fn before_utc(y: f64) -> f64 {
        if y < 1800.0 {
            let u = (y - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u
        } else if y < 1860.0 {
            let t = y - 1800.0;
            13.72 - 0.332447 * t + 0.0068612 * t.powi(2) + 0.0041116 * t.powi(3)
                - 0.00037436 * t.powi(4)
                + 0.0000121272 * t.powi(5)
                - 0.0000001699 * t.powi(6)
                + 0.000000000875 * t.powi(7)
        } else if y < 1900.0 {
            let t = y - 1860.0;
            7.62 + 0.5737 * t - 0.251754 * t.powi(2) + 0.01680668 * t.powi(3)
                - 0.0004473624 * t.powi(4)
                + t.powi(5) / 233174.0
        } else if y < 1920.0 {
            let t = y - 1900.0;
            -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
                - 0.000197 * t.powi(4)
        } else if y < 1941.0 {
            let t = y - 1920.0;
            21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
        } else if y < 1961.0 {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
        } else {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
        }
    }
}

mod leap_seconds {
    use super::{Tai, Tt};
    use crate::date::Date;
    use std::sync::LazyLock;

    pub const DATES: &[(i32, i32, i32)] = &[
        (1972, 6, 30),
        (1972, 12, 31),
        (1973, 12, 31),
        (1974, 12, 31),
        (1975, 12, 31),
        (1976, 12, 31),
        (1977, 12, 31),
        (1978, 12, 31),
        (1979, 12, 31),
        (1981, 6, 30),
        (1982, 6, 30),
        (1983, 6, 30),
        (1985, 6, 30),
        (1987, 12, 31),
        (1989, 12, 31),
        (1990, 12, 31),
        (1992, 6, 30),
        (1993, 6, 30),
        (1994, 6, 30),
        (1995, 12, 31),
        (1997, 6, 30),
        (1998, 12, 31),
        (2005, 12, 31),
        (2008, 12, 31),
        (2012, 6, 30),
        (2015, 6, 30),
        (2016, 12, 31),
    ];
    pub const DATE_EXPIRES: (i32, i32, i32) = (2026, 12, 28);

    #[derive(Debug, Clone)]
    pub struct Data {
        pub starts: Tai,
        pub leap_seconds: Vec<LeapSecond>,
        pub expires: Tai,
        pub c2: f64,
    }
    #[derive(Debug, Clone)]
    pub struct LeapSecond {
        pub tai: Tai,
        pub delta_secs: i32,
    }

    static COMPUTED: LazyLock<Data> = LazyLock::new(|| {
        let starts = Tai(Date::from_gregorian(1972, 1, 1).jdn() as f64 - 0.5 + 10.0 / 86400.0);
        let leap_seconds = (10..)
            .zip(DATES)
            .map(|(delta_secs, &(y, m, d))| {
                let jdn = Date::from_gregorian(y, m, d).jdn();
                let tai = Tai(jdn as f64 + (43199 + delta_secs) as f64 / 86400.0);
                LeapSecond { tai, delta_secs }
            })
            .collect();
        let (y, m, d) = DATE_EXPIRES;
        let jdn = Date::from_gregorian(y, m, d).jdn();
        let expires = Tai(jdn as f64 + (43199 + 10 + DATES.len()) as f64 / 86400.0);
        let c2 = (DATES.len() + 10) as f64 - estimate(expires);
        Data {
            starts,
            leap_seconds,
            expires,
            c2,
        }
    });

    pub fn data() -> &'static Data {
        &COMPUTED
    }

    pub fn estimate<T: Into<Tt>>(tt: T) -> f64 {
        use std::f64::consts::PI;
        let tt = tt.into();
        let y = (tt.0 - 2451544.5) / 365.2425 + 2000.0;
        let t = (y - 1825.0) / 100.0;
        31.4115 * t * t + 284.8435805251424 * (2.0 * PI * (t + 0.75) / 14.0).cos()
    }
}
