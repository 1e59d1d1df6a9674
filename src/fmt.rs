//! Text for people: emoji, localized names and the closest-festival line.
//!
//! The core only ever hands out localization keys. A [`Localizer`] turns them
//! into display text; [`Table`] is a simple one backed by nested JSON, in the
//! same shape as the locale files of the web front end.

use std::collections::HashMap;

use serde_json::Value;

use crate::closest::{Closest, NEXT_FESTIVAL_KEY, TODAYS_FESTIVAL_KEY};
use crate::ephemeris::{Ephemeris, Phase};
use crate::error::Result;
use crate::festival::{Catalog, Category, Event};

/// Looks up display text by key, substituting named parameters.
pub trait Localizer {
    /// Text for `key`. Implementations return the key itself when it has no
    /// translation.
    fn text(&self, key: &str, params: &[(&str, &str)]) -> String;
}

/// Echoes keys back, for output consumed by another program.
#[derive(Debug, Default, Copy, Clone)]
pub struct Keys;

impl Localizer for Keys {
    fn text(&self, key: &str, _params: &[(&str, &str)]) -> String {
        key.to_owned()
    }
}

/// Translations loaded from a JSON document.
///
/// Nested objects are flattened into dotted keys, and `{{name}}` in a value
/// is replaced by the parameter `name`.
///
/// ```
/// use celtic_wheel::fmt::{Localizer, Table};
///
/// let table = Table::from_json(r#"{"festivals": {"samhain": {"name": "Samhain"}}}"#).unwrap();
/// assert_eq!("Samhain", table.text("festivals.samhain.name", &[]));
/// assert_eq!("missing", table.text("missing", &[]));
/// ```
#[derive(Debug, Default, Clone)]
pub struct Table {
    entries: HashMap<String, String>,
}

impl Table {
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let mut entries = HashMap::new();
        flatten(String::new(), &value, &mut entries);
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(prefix: String, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(key, v, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        Value::Null => {}
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}

impl Localizer for Table {
    fn text(&self, key: &str, params: &[(&str, &str)]) -> String {
        let Some(template) = self.entries.get(key) else {
            return key.to_owned();
        };
        params.iter().fold(template.clone(), |text, (name, value)| {
            text.replace(&format!("{{{{{name}}}}}"), value)
        })
    }
}

pub fn category_emoji(category: Category) -> &'static str {
    match category {
        Category::Fire => "🔥",
        Category::Solar => "☀️",
        Category::Christian => "✝️",
        Category::Today => "📅",
    }
}

pub fn phase_emoji(phase: Phase) -> &'static str {
    match phase {
        Phase::New => "🌑",
        Phase::FirstQuarter => "🌓",
        Phase::Full => "🌕",
        Phase::LastQuarter => "🌗",
    }
}

/// All category emoji of an event, primary first.
pub fn event_emoji(event: &Event) -> String {
    event.categories.iter().map(category_emoji).collect()
}

/// The line shown for today's or the next festival; empty when there is
/// neither.
///
/// ```
/// use celtic_wheel::Catalog;
/// use celtic_wheel::closest::Closest;
/// use celtic_wheel::fmt::{Table, closest_festival_text};
///
/// let table = Table::from_json(r#"{
///     "next-festival": "{{festivalName}} in {{daysRemaining}} days",
///     "festivals": {"beltane": {"name": "Beltane"}}
/// }"#).unwrap();
/// let catalog = Catalog::default();
/// let event = catalog.find("beltane").unwrap();
/// let text = closest_festival_text(&Closest::Next { event, days_remaining: 3 }, &table);
/// assert_eq!("Beltane in 3 days", text);
/// ```
pub fn closest_festival_text<L: Localizer + ?Sized>(closest: &Closest<'_>, localizer: &L) -> String {
    match closest {
        Closest::Today { event } => {
            let name = localizer.text(&event.name_key, &[]);
            localizer.text(TODAYS_FESTIVAL_KEY, &[("festivalName", &name)])
        }
        Closest::Next {
            event,
            days_remaining,
        } => {
            let name = localizer.text(&event.name_key, &[]);
            let days = days_remaining.to_string();
            localizer.text(
                NEXT_FESTIVAL_KEY,
                &[("festivalName", &name), ("daysRemaining", &days)],
            )
        }
        Closest::Nothing => String::new(),
    }
}

/// One line of the festival table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TableRow {
    pub emoji: String,
    pub name: String,
    /// ISO 8601 calendar date, UTC.
    pub date: String,
    pub description: String,
}

/// Localized rows for `events` in `year`.
pub fn table_rows<E, L>(catalog: &Catalog<E>, events: &[&Event], year: i32, localizer: &L) -> Vec<TableRow>
where
    E: Ephemeris,
    L: Localizer + ?Sized,
{
    events
        .iter()
        .map(|event| TableRow {
            emoji: event_emoji(event),
            name: localizer.text(&event.name_key, &[]),
            date: catalog.date(event, year).format("%Y-%m-%d").to_string(),
            description: localizer.text(&event.short_description_key, &[]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::festival::{Categories, DateRule, keys};

    fn table() -> Table {
        Table::from_json(
            r#"{
                "todays-festival": "Today is {{festivalName}}!",
                "next-festival": "Next: {{festivalName}} in {{daysRemaining}} days",
                "festivals": {
                    "samhain": {"name": "Samhain", "shortDescription": "Summer's end"},
                    "imbolc": {"name": "Imbolc"}
                },
                "count": 3,
                "empty": null
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn nested_keys() {
        let table = table();
        assert_eq!(6, table.len());
        assert_eq!("Summer's end", table.text("festivals.samhain.shortDescription", &[]));
        assert_eq!("3", table.text("count", &[]));
        assert_eq!("empty", table.text("empty", &[]));
    }

    #[test]
    fn closest_lines() {
        let catalog = Catalog::default();
        let samhain = catalog.find(keys::SAMHAIN).unwrap();
        let table = table();
        assert_eq!(
            "Today is Samhain!",
            closest_festival_text(&Closest::Today { event: samhain }, &table)
        );
        assert_eq!(
            "Next: Samhain in 30 days",
            closest_festival_text(
                &Closest::Next {
                    event: samhain,
                    days_remaining: 30
                },
                &table
            )
        );
        assert_eq!("", closest_festival_text(&Closest::Nothing, &table));
        assert_eq!(
            "next-festival",
            closest_festival_text(
                &Closest::Next {
                    event: samhain,
                    days_remaining: 1
                },
                &Keys
            )
        );
    }

    #[test]
    fn emoji() {
        let event = Event::new(
            "candlemas",
            Categories::new(Category::Fire).with(Category::Christian),
            DateRule::IMBOLC,
        );
        assert_eq!("🔥✝️", event_emoji(&event));
        assert_eq!("🌕", phase_emoji(Phase::Full));
    }

    #[test]
    fn rows() {
        let catalog = Catalog::default();
        let events = catalog.build_events(2024, true, false);
        let rows = table_rows(&catalog, &events, 2024, &table());
        assert_eq!(4, rows.len());
        assert_eq!(
            TableRow {
                emoji: "🔥".to_owned(),
                name: "Imbolc".to_owned(),
                date: "2024-02-01".to_owned(),
                description: "festivals.imbolc.shortDescription".to_owned(),
            },
            rows[0]
        );
        assert_eq!("Summer's end", rows[3].description);
    }
}
