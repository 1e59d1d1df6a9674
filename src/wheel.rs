//! The wheel of the year.
//!
//! One year laid out on a circle: festivals on the rim, months and seasons on
//! inner bands, lunar phases on an outer ring. Every position is an angle in
//! the convention of [`crate::geometry`], rotated so that the chosen year
//! start sits at the top.

use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::closest::{Closest, closest_festival};
use crate::date::{Date, YearType};
use crate::ephemeris::{Ephemeris, Solstice};
use crate::error::Error;
use crate::festival::{Catalog, Categories, Category, DateRule, Event, keys};
use crate::geometry::{
    Point, annular_sector_path, circle_path, date_to_angle, normalize_angle, polar_to_cartesian,
    span,
};
use crate::lunar::{self, PhaseOccurrence};
use crate::month::{self, MonthInfo};

/// Marker radius of a festival.
pub const FESTIVAL_RADIUS: f64 = 10.0;
/// Marker radius of the current day.
pub const TODAY_RADIUS: f64 = 6.0;

/// Where the year begins, i.e. which date is drawn at the top.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum YearStart {
    #[default]
    Samhain,
    Imbolc,
    #[serde(rename = "jan-1", alias = "january-1")]
    January1,
}

impl YearStart {
    /// The instant put at the top of the wheel for `year`.
    pub fn reference<E: Ephemeris>(&self, catalog: &Catalog<E>, year: i32) -> DateTime<Utc> {
        match self {
            YearStart::Samhain => catalog.resolve(DateRule::SAMHAIN, year),
            YearStart::Imbolc => catalog.resolve(DateRule::IMBOLC, year),
            YearStart::January1 => Date::from_gregorian(year, 1, 1).midnight_utc(),
        }
    }
}

impl FromStr for YearStart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "samhain" => Ok(YearStart::Samhain),
            "imbolc" => Ok(YearStart::Imbolc),
            "jan-1" | "january-1" => Ok(YearStart::January1),
            _ => Err(Error::UnknownName {
                kind: "year start",
                name: s.to_owned(),
            }),
        }
    }
}

/// Rule set for where the four seasons begin.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeasonScheme {
    /// Seasons begin at the fire festivals.
    #[default]
    Celtic,
    /// Seasons begin at the solstices and equinoxes.
    #[serde(alias = "solar")]
    Astronomical,
    /// Seasons begin on the first of December, March, June and September.
    #[serde(alias = "meteo")]
    Meteorological,
}

impl SeasonScheme {
    /// Start instants of winter, spring, summer and autumn, in that order.
    ///
    /// Winter of the meteorological scheme begins in December of the
    /// previous year.
    pub fn boundaries<E: Ephemeris>(&self, catalog: &Catalog<E>, year: i32) -> [DateTime<Utc>; 4] {
        match self {
            SeasonScheme::Celtic => [
                DateRule::SAMHAIN,
                DateRule::IMBOLC,
                DateRule::BELTANE,
                DateRule::LUGHNASADH,
            ]
            .map(|rule| catalog.resolve(rule, year)),
            SeasonScheme::Astronomical => [
                Solstice::December,
                Solstice::March,
                Solstice::June,
                Solstice::September,
            ]
            .map(|kind| catalog.resolve(DateRule::Solar(kind), year)),
            SeasonScheme::Meteorological => [(year.saturating_sub(1), 12), (year, 3), (year, 6), (year, 9)]
                .map(|(y, m)| Date::from_gregorian(y, m, 1).midnight_utc()),
        }
    }
}

impl FromStr for SeasonScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "celtic" => Ok(SeasonScheme::Celtic),
            "astronomical" | "solar" => Ok(SeasonScheme::Astronomical),
            "meteorological" | "meteo" => Ok(SeasonScheme::Meteorological),
            _ => Err(Error::UnknownName {
                kind: "season scheme",
                name: s.to_owned(),
            }),
        }
    }
}

/// How lunar phases are shown, if at all.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoonView {
    #[default]
    None,
    Simple,
    Emoji,
}

impl FromStr for MoonView {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "none" => Ok(MoonView::None),
            "simple" => Ok(MoonView::Simple),
            "emoji" => Ok(MoonView::Emoji),
            _ => Err(Error::UnknownName {
                kind: "moon view",
                name: s.to_owned(),
            }),
        }
    }
}

/// Input of [`Wheel::build`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelSettings {
    pub year: i32,
    pub include_fire: bool,
    pub include_solar: bool,
    pub year_start: YearStart,
    pub season_scheme: SeasonScheme,
    pub moon_view: MoonView,
    /// Side of the square canvas.
    pub size: f64,
    /// Radius of the festival rim.
    pub radius: f64,
}

impl WheelSettings {
    /// Default settings for `year`.
    pub fn new(year: i32) -> Self {
        Self {
            year,
            include_fire: true,
            include_solar: true,
            year_start: YearStart::default(),
            season_scheme: SeasonScheme::default(),
            moon_view: MoonView::default(),
            size: 500.0,
            radius: 200.0,
        }
    }
}

/// Where a festival's label goes along its circular baseline.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LabelPlacement {
    /// Use the baseline starting at 180°, for labels near the top where the
    /// regular one begins and ends.
    pub alternate: bool,
    /// Start offset along the baseline, in percent.
    pub offset_pct: f64,
}

impl LabelPlacement {
    /// ```
    /// use celtic_wheel::wheel::LabelPlacement;
    ///
    /// let top = LabelPlacement::for_angle(0.0);
    /// assert!(top.alternate);
    /// assert_eq!(50.0, top.offset_pct);
    /// ```
    pub fn for_angle(angle: f64) -> Self {
        let angle = normalize_angle(angle);
        let alternate = angle >= 330.0 || angle <= 30.0;
        let path_start = if alternate { 180.0 } else { 0.0 };
        Self {
            alternate,
            offset_pct: normalize_angle(angle - path_start) / 360.0 * 100.0,
        }
    }
}

/// An event placed on the wheel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelFestival {
    #[serde(flatten)]
    pub event: Event,
    pub date: DateTime<Utc>,
    pub angle: f64,
    /// Marker radius.
    pub radius: f64,
    pub clickable: bool,
    /// Marker centre on the rim.
    pub position: Point,
    pub label: LabelPlacement,
}

/// A radial line segment.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub angle: f64,
    pub start: Point,
    pub end: Point,
}

impl Tick {
    fn radial(angle: f64, from: f64, to: f64) -> Self {
        Self {
            angle,
            start: polar_to_cartesian(from, angle, 0.0, 0.0),
            end: polar_to_cartesian(to, angle, 0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelMonth {
    #[serde(flatten)]
    pub month: MonthInfo,
    pub start_angle: f64,
    /// Angle of the middle day, where the name is centred.
    pub label_angle: f64,
    pub label_offset_pct: f64,
    pub tick: Tick,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// Translucent fill.
    pub fn color(&self) -> &'static str {
        match self {
            Season::Winter => "rgba(66,135,245,.12)",
            Season::Spring => "rgba(76,175,80,.12)",
            Season::Summer => "rgba(255,193,7,.12)",
            Season::Autumn => "rgba(255,87,34,.12)",
        }
    }
}

/// One season, clockwise from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonArc {
    pub season: Season,
    pub color: &'static str,
    pub from: f64,
    pub to: f64,
    /// Clockwise width in degrees.
    pub span: f64,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelPhase {
    #[serde(flatten)]
    pub occurrence: PhaseOccurrence,
    pub angle: f64,
    pub position: Point,
}

/// Circular text baselines, as SVG paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Baselines {
    pub festival_outer: String,
    pub festival_inner: String,
    pub festival_outer_alt: String,
    pub festival_inner_alt: String,
    pub month_outer: String,
    pub month_inner: String,
}

impl Baselines {
    fn new(radius: f64) -> Self {
        let festival = |r, start| circle_path(0.0, 0.0, radius + r, start);
        Self {
            festival_outer: festival(57.0, 0.0),
            festival_inner: festival(45.0, 0.0),
            festival_outer_alt: festival(57.0, 180.0),
            festival_inner_alt: festival(45.0, 180.0),
            month_outer: circle_path(0.0, 0.0, radius - 30.0, 0.0),
            month_inner: circle_path(0.0, 0.0, radius - 42.0, 0.0),
        }
    }
}

/// Everything needed to draw the wheel for one year, centred on the origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wheel<'a> {
    pub settings: WheelSettings,
    pub total_days: u32,
    /// Unrotated angle of the year start; subtracted from every other angle.
    pub start_angle: f64,
    pub festivals: Vec<WheelFestival>,
    /// The current day, if it falls in the year shown.
    pub today: Option<WheelFestival>,
    /// Today's or the next festival, described by the today marker.
    pub closest: Option<Closest<'a>>,
    pub months: Vec<WheelMonth>,
    pub seasons: [SeasonArc; 4],
    pub lunar_phases: Vec<WheelPhase>,
    /// Marks January 1 on the lunar ring.
    pub new_year_tick: Option<Tick>,
    pub baselines: Baselines,
}

impl<'a> Wheel<'a> {
    /// Lays out `settings.year`.
    ///
    /// `now` only decides whether and where the current day is marked.
    ///
    /// ```
    /// use celtic_wheel::Catalog;
    /// use celtic_wheel::wheel::{Wheel, WheelSettings};
    /// use chrono::{TimeZone, Utc};
    ///
    /// let catalog = Catalog::default();
    /// let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    /// let wheel = Wheel::build(&catalog, &WheelSettings::new(2024), &now);
    /// // Samhain is the default year start.
    /// let samhain = wheel.festivals.iter().find(|f| f.event.key == "samhain").unwrap();
    /// assert_eq!(0.0, samhain.angle);
    /// assert!(wheel.today.is_some());
    /// ```
    pub fn build<E, Tz>(catalog: &'a Catalog<E>, settings: &WheelSettings, now: &DateTime<Tz>) -> Self
    where
        E: Ephemeris,
        Tz: TimeZone,
    {
        let year = settings.year;
        let radius = settings.radius;
        let total_days = YearType::from_gregorian(year).days();
        let start_angle = date_to_angle(&settings.year_start.reference(catalog, year), total_days, 0.0);
        let angle_of = |date: &DateTime<Utc>| date_to_angle(date, total_days, start_angle);
        let place = |event: Event, date: DateTime<Utc>, marker: f64, clickable: bool| {
            let angle = angle_of(&date);
            WheelFestival {
                event,
                date,
                angle,
                radius: marker,
                clickable,
                position: polar_to_cartesian(radius, angle, 0.0, 0.0),
                label: LabelPlacement::for_angle(angle),
            }
        };

        let events = catalog.build_events(year, settings.include_fire, settings.include_solar);
        let festivals: Vec<_> = events
            .iter()
            .map(|&event| place(event.clone(), catalog.date(event, year), FESTIVAL_RADIUS, true))
            .collect();

        let now_utc = now.with_timezone(&Utc);
        let closest = (now_utc.year() == year).then(|| closest_festival(catalog, &events, now));
        let today = closest.map(|c| place(today_event(&now_utc, &c), now_utc, TODAY_RADIUS, false));

        let months = month::months(year)
            .into_iter()
            .map(|month| {
                let start_angle = angle_of(&month.start);
                let label_angle = angle_of(&month.middle);
                WheelMonth {
                    month,
                    start_angle,
                    label_angle,
                    label_offset_pct: label_angle / 360.0 * 100.0,
                    tick: Tick::radial(start_angle, radius - 15.0, radius - 45.0),
                }
            })
            .collect();

        let cuts = settings.season_scheme.boundaries(catalog, year).map(|d| angle_of(&d));
        let seasons = Season::ALL.map(|season| {
            let i = season as usize;
            let (from, to) = (cuts[i], cuts[(i + 1) % 4]);
            SeasonArc {
                season,
                color: season.color(),
                from,
                to,
                span: span(from, to),
                path: annular_sector_path(radius - 45.0, radius - 14.0, from, to),
            }
        });

        let (lunar_phases, new_year_tick) = match settings.moon_view {
            MoonView::None => (Vec::new(), None),
            MoonView::Simple | MoonView::Emoji => {
                let ring = radius + 30.0;
                let phases = lunar::lunar_phases(catalog.ephemeris(), year)
                    .into_iter()
                    .map(|occurrence| {
                        let angle = angle_of(&occurrence.instant);
                        WheelPhase {
                            occurrence,
                            angle,
                            position: polar_to_cartesian(ring, angle, 0.0, 0.0),
                        }
                    })
                    .collect();
                let jan1 = Date::from_gregorian(year, 1, 1).midnight_utc();
                (phases, Some(Tick::radial(angle_of(&jan1), ring - 7.0, ring + 7.0)))
            }
        };

        debug!(
            year,
            start_angle,
            festivals = festivals.len(),
            phases = lunar_phases.len(),
            "built wheel"
        );
        Self {
            settings: *settings,
            total_days,
            start_angle,
            festivals,
            today,
            closest,
            months,
            seasons,
            lunar_phases,
            new_year_tick,
            baselines: Baselines::new(radius),
        }
    }
}

/// The synthetic marker for the day of `now`, described by the
/// closest-festival text when there is one.
fn today_event(now: &DateTime<Utc>, closest: &Closest<'_>) -> Event {
    let rule = DateRule::Fixed {
        month: now.month() as u8,
        day: now.day() as u8,
    };
    let mut event = Event::new(keys::TODAY, Categories::new(Category::Today), rule);
    event.name_key = "festival-wheel.today".to_owned();
    if let Some(key) = closest.text_key() {
        event.short_description_key = key.to_owned();
    }
    event
}
