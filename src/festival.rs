//! Festival catalog.
//!
//! Two fixed lists make up the wheel of the year: the four Celtic fire
//! festivals on fixed civil dates, and the four solar festivals (equinoxes
//! and solstices) whose instants come from an [`Ephemeris`]. A [`Catalog`]
//! owns both lists together with the provider and a per-year cache of the
//! solar instants.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::Date;
use crate::ephemeris::{Ephemeris, Meeus, Solstice};

/// Festival keys, unique within a catalog.
pub mod keys {
    pub const IMBOLC: &str = "imbolc";
    pub const BELTANE: &str = "beltane";
    pub const LUGHNASADH: &str = "lughnasadh";
    pub const SAMHAIN: &str = "samhain";
    pub const SPRING_EQUINOX: &str = "spring-equinox";
    pub const SUMMER_SOLSTICE: &str = "summer-solstice";
    pub const AUTUMN_EQUINOX: &str = "autumn-equinox";
    pub const WINTER_SOLSTICE: &str = "winter-solstice";
    /// The synthetic marker for the current day on the wheel.
    pub const TODAY: &str = "today";
}

/// Kind of occasion; drives how an event is drawn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Fire,
    Solar,
    Christian,
    Today,
}

/// Categories of an event: exactly one primary, any number of secondary.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    pub primary: Category,
    pub secondary: BTreeSet<Category>,
}

impl Categories {
    /// Only a primary category.
    pub fn new(primary: Category) -> Self {
        Self {
            primary,
            secondary: BTreeSet::new(),
        }
    }
    /// Adds a secondary category. The primary is never duplicated.
    pub fn with(mut self, category: Category) -> Self {
        if category != self.primary {
            self.secondary.insert(category);
        }
        self
    }
    /// All categories, primary first.
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        std::iter::once(self.primary).chain(self.secondary.iter().copied())
    }
    pub fn contains(&self, category: Category) -> bool {
        self.primary == category || self.secondary.contains(&category)
    }
}

/// How the date of an event is found for a given year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRule {
    /// Same civil date every year, at midnight UTC.
    Fixed { month: u8, day: u8 },
    /// The instant of an equinox or solstice.
    Solar(Solstice),
}

impl DateRule {
    pub const IMBOLC: DateRule = DateRule::Fixed { month: 2, day: 1 };
    pub const BELTANE: DateRule = DateRule::Fixed { month: 5, day: 1 };
    pub const LUGHNASADH: DateRule = DateRule::Fixed { month: 8, day: 1 };
    pub const SAMHAIN: DateRule = DateRule::Fixed { month: 10, day: 31 };
}

/// One festival or occasion.
///
/// Text fields are keys into a localization table, never display text.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub key: String,
    pub categories: Categories,
    pub name_key: String,
    pub short_description_key: String,
    pub long_description_key: String,
    /// Long-form content file, relative to the language's content root.
    pub long_description_file: Option<String>,
    pub rule: DateRule,
}

impl Event {
    /// Builds an event, deriving the text keys from `key`.
    ///
    /// ```
    /// use celtic_wheel::festival::{Category, Categories, DateRule, Event};
    ///
    /// let event = Event::new(
    ///     "beltane",
    ///     Categories::new(Category::Fire),
    ///     DateRule::Fixed { month: 5, day: 1 },
    /// );
    /// assert_eq!("festivals.beltane.name", event.name_key);
    /// ```
    pub fn new(key: &str, categories: Categories, rule: DateRule) -> Self {
        Self {
            key: key.to_owned(),
            categories,
            name_key: format!("festivals.{key}.name"),
            short_description_key: format!("festivals.{key}.shortDescription"),
            long_description_key: format!("festivals.{key}.longDescription"),
            long_description_file: None,
            rule,
        }
    }
    /// Attaches a long-form content file.
    pub fn with_long_description_file(mut self, file: &str) -> Self {
        self.long_description_file = Some(file.to_owned());
        self
    }
    /// The primary category.
    pub fn category(&self) -> Category {
        self.categories.primary
    }
}

/// Resolved solar festival instants of one year.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SolarDates([DateTime<Utc>; 4]);

impl SolarDates {
    pub fn get(&self, kind: Solstice) -> DateTime<Utc> {
        self.0[kind as usize]
    }
}

/// Per-year memo of solar instants.
///
/// Unbounded: a session only ever looks at a handful of years. Filled outside
/// the lock, so two threads racing on one year may both compute it; the first
/// insert wins and both results are identical anyway.
#[derive(Debug, Default)]
pub struct SolarCache {
    years: Mutex<HashMap<i32, SolarDates>>,
}

impl SolarCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solar instants of `year`, asking `ephemeris` only if not yet cached.
    pub fn get<E: Ephemeris>(&self, ephemeris: &E, year: i32) -> SolarDates {
        if let Some(&dates) = self.years.lock().get(&year) {
            return dates;
        }
        let dates = SolarDates(
            Solstice::ALL.map(|kind| ephemeris.to_instant(ephemeris.equinox_solstice(kind, year))),
        );
        debug!(year, "computed solar festival dates");
        *self.years.lock().entry(year).or_insert(dates)
    }

    /// Number of cached years.
    pub fn len(&self) -> usize {
        self.years.lock().len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The fire festivals: Imbolc, Beltane, Lughnasadh and Samhain.
pub fn fire_events() -> Vec<Event> {
    let fire = |key, rule| Event::new(key, Categories::new(Category::Fire), rule);
    vec![
        fire(keys::IMBOLC, DateRule::IMBOLC).with_long_description_file("descriptions/imbolc.md"),
        fire(keys::BELTANE, DateRule::BELTANE),
        fire(keys::LUGHNASADH, DateRule::LUGHNASADH),
        fire(keys::SAMHAIN, DateRule::SAMHAIN),
    ]
}

/// The solar festivals: both equinoxes and both solstices.
pub fn solar_events() -> Vec<Event> {
    let solar = |key, kind| Event::new(key, Categories::new(Category::Solar), DateRule::Solar(kind));
    vec![
        solar(keys::SPRING_EQUINOX, Solstice::March),
        solar(keys::SUMMER_SOLSTICE, Solstice::June),
        solar(keys::AUTUMN_EQUINOX, Solstice::September),
        solar(keys::WINTER_SOLSTICE, Solstice::December),
    ]
}

/// Both festival lists, the provider they are computed with, and the solar
/// cache.
///
/// Built once at start-up and shared; all methods take `&self`.
#[derive(Debug)]
pub struct Catalog<E = Meeus> {
    ephemeris: E,
    fire: Vec<Event>,
    solar: Vec<Event>,
    cache: SolarCache,
}

impl Default for Catalog<Meeus> {
    fn default() -> Self {
        Self::new(Meeus)
    }
}

impl<E: Ephemeris> Catalog<E> {
    /// The standard festival lists backed by `ephemeris`.
    pub fn new(ephemeris: E) -> Self {
        Self {
            ephemeris,
            fire: fire_events(),
            solar: solar_events(),
            cache: SolarCache::new(),
        }
    }

    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }
    pub fn fire(&self) -> &[Event] {
        &self.fire
    }
    pub fn solar(&self) -> &[Event] {
        &self.solar
    }
    pub fn cache(&self) -> &SolarCache {
        &self.cache
    }

    /// Looks an event up by key in either list.
    pub fn find(&self, key: &str) -> Option<&Event> {
        self.fire.iter().chain(&self.solar).find(|e| e.key == key)
    }

    /// Date of `event` in `year`.
    ///
    /// Fixed events fall at midnight UTC; solar events at the computed
    /// instant, memoized per year.
    ///
    /// ```
    /// use celtic_wheel::Catalog;
    /// use celtic_wheel::festival::keys;
    ///
    /// let catalog = Catalog::default();
    /// let samhain = catalog.find(keys::SAMHAIN).unwrap();
    /// assert_eq!("2024-10-31T00:00:00Z", catalog.date(samhain, 2024).to_rfc3339_opts(chrono::SecondsFormat::Secs, true));
    /// ```
    pub fn date(&self, event: &Event, year: i32) -> DateTime<Utc> {
        self.resolve(event.rule, year)
    }

    /// Applies a date rule to `year`, as [`Catalog::date`] does.
    pub fn resolve(&self, rule: DateRule, year: i32) -> DateTime<Utc> {
        match rule {
            DateRule::Fixed { month, day } => {
                Date::from_gregorian(year, month as i32, day as i32).midnight_utc()
            }
            DateRule::Solar(kind) => self.cache.get(&self.ephemeris, year).get(kind),
        }
    }

    /// Active events for `year`, sorted by date.
    ///
    /// Ties keep list order, fire festivals first.
    ///
    /// ```
    /// use celtic_wheel::Catalog;
    ///
    /// let catalog = Catalog::default();
    /// let keys: Vec<_> = catalog
    ///     .build_events(2024, true, false)
    ///     .iter()
    ///     .map(|e| e.key.as_str())
    ///     .collect();
    /// assert_eq!(vec!["imbolc", "beltane", "lughnasadh", "samhain"], keys);
    /// ```
    pub fn build_events(&self, year: i32, include_fire: bool, include_solar: bool) -> Vec<&Event> {
        let fire = self.fire.iter().filter(|_| include_fire);
        let solar = self.solar.iter().filter(|_| include_solar);
        let mut events: Vec<_> = fire
            .chain(solar)
            .map(|event| (self.date(event, year), event))
            .collect();
        events.sort_by_key(|&(date, _)| date);
        events.into_iter().map(|(_, event)| event).collect()
    }
}
