//! User settings, read from a TOML file.
//!
//! Every field is optional in the file; missing ones take their defaults.
//!
//! ```toml
//! year = 2025
//! include_solar = false
//! year_start = "imbolc"
//! season_scheme = "astronomical"
//! moon_view = "emoji"
//! language = "ga"
//! ```

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::wheel::{MoonView, SeasonScheme, WheelSettings, YearStart};

/// Years that can be shown.
pub const YEAR_RANGE: RangeInclusive<i32> = 1900..=2099;

/// Brings `year` into [`YEAR_RANGE`].
///
/// ```
/// use celtic_wheel::config::clamp_year;
///
/// assert_eq!(2099, clamp_year(3000));
/// assert_eq!(2024, clamp_year(2024));
/// ```
pub fn clamp_year(year: i32) -> i32 {
    year.clamp(*YEAR_RANGE.start(), *YEAR_RANGE.end())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Year to show; the current year when absent.
    pub year: Option<i32>,
    pub include_fire: bool,
    pub include_solar: bool,
    pub year_start: YearStart,
    pub season_scheme: SeasonScheme,
    pub moon_view: MoonView,
    pub size: f64,
    pub radius: f64,
    /// Language of long-form content.
    pub language: String,
    /// Directory holding `locales/<language>/...`.
    pub content_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let wheel = WheelSettings::new(*YEAR_RANGE.start());
        Self {
            year: None,
            include_fire: wheel.include_fire,
            include_solar: wheel.include_solar,
            year_start: wheel.year_start,
            season_scheme: wheel.season_scheme,
            moon_view: wheel.moon_view,
            size: wheel.size,
            radius: wheel.radius,
            language: crate::content::DEFAULT_LANGUAGE.to_owned(),
            content_root: PathBuf::from("public"),
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads `path`, or returns the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Wheel settings, with the year defaulting to `current_year` and
    /// clamped to [`YEAR_RANGE`].
    pub fn wheel_settings(&self, current_year: i32) -> WheelSettings {
        WheelSettings {
            year: clamp_year(self.year.unwrap_or(current_year)),
            include_fire: self.include_fire,
            include_solar: self.include_solar,
            year_start: self.year_start,
            season_scheme: self.season_scheme,
            moon_view: self.moon_view,
            size: self.size,
            radius: self.radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Settings::default(), Settings::from_toml("").unwrap());
    }

    #[test]
    fn partial_file() {
        let settings = Settings::from_toml(
            r#"
            year = 1850
            include_solar = false
            year_start = "jan-1"
            season_scheme = "meteo"
            moon_view = "emoji"
            "#,
        )
        .unwrap();
        let wheel = settings.wheel_settings(2024);
        assert_eq!(1900, wheel.year);
        assert!(wheel.include_fire);
        assert!(!wheel.include_solar);
        assert_eq!(YearStart::January1, wheel.year_start);
        assert_eq!(SeasonScheme::Meteorological, wheel.season_scheme);
        assert_eq!(MoonView::Emoji, wheel.moon_view);
        assert_eq!(200.0, wheel.radius);
    }

    #[test]
    fn year_defaults_to_current() {
        assert_eq!(2031, Settings::default().wheel_settings(2031).year);
        assert_eq!(2099, Settings::default().wheel_settings(2150).year);
    }

    #[test]
    fn bad_names_are_rejected() {
        let err = Settings::from_toml(r#"moon_view = "waxing""#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_file_is_default() {
        let settings = Settings::load(Path::new("/nonexistent/celtic-wheel.toml")).unwrap();
        assert_eq!("en", settings.language);
    }
}
