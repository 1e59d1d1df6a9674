//! The Celtic wheel of the year.
//!
//! The four fire festivals, the equinoxes and solstices and the phases of the
//! Moon for any year, and their layout on a circular calendar. Solar and
//! lunar instants are computed with the algorithms of Meeus' *Astronomical
//! Algorithms*, accurate to about a minute.
//!
//! # Examples
//!
//! Festivals of a year, in date order:
//!
//! ```
//! use celtic_wheel::Catalog;
//!
//! let catalog = Catalog::default();
//! let events = catalog.build_events(2024, true, true);
//!
//! assert_eq!("imbolc", events[0].key);
//! let solstice = catalog.date(events[7], 2024);
//! assert_eq!("2024-12-21", solstice.date_naive().to_string());
//! ```
//!
//! Today's or the next festival:
//!
//! ```
//! use celtic_wheel::Catalog;
//! use celtic_wheel::closest::{Closest, closest_festival};
//! use chrono::{TimeZone, Utc};
//!
//! let catalog = Catalog::default();
//! let events = catalog.build_events(2024, true, true);
//! let now = Utc.with_ymd_and_hms(2024, 2, 1, 18, 0, 0).unwrap();
//!
//! assert!(matches!(closest_festival(&catalog, &events, &now), Closest::Today { .. }));
//! ```

pub mod closest;
pub mod config;
pub mod content;
pub mod date;
pub mod ephemeris;
pub mod error;
pub mod export;
pub mod festival;
pub mod fmt;
pub mod geometry;
pub mod lunar;
pub mod month;
pub mod time_scales;
pub mod wheel;

pub use date::{Date, YearType};
pub use error::{Error, Result};
pub use festival::{Catalog, Event};
pub use wheel::{Wheel, WheelSettings};
