use std::path::PathBuf;

use chrono::{DateTime, Datelike, FixedOffset, Local};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use celtic_wheel::closest::closest_festival;
use celtic_wheel::config::Settings;
use celtic_wheel::content::{CancelToken, ContentCache, DirSource, long_description};
use celtic_wheel::error::{Error, Result};
use celtic_wheel::fmt::{self, Keys, Localizer, Table};
use celtic_wheel::wheel::{MoonView, SeasonScheme, Wheel, YearStart};
use celtic_wheel::{Catalog, export, lunar};

#[derive(Parser)]
#[command(name = "celtic-wheel")]
#[command(about = "Celtic festivals, solstices and lunar phases of a year")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "celtic-wheel.toml")]
    config: PathBuf,

    /// Year to show (overrides config file)
    #[arg(short, long)]
    year: Option<i32>,

    /// Leave out the equinoxes and solstices
    #[arg(long)]
    no_solar: bool,

    /// Leave out the fire festivals
    #[arg(long)]
    no_fire: bool,

    /// samhain, imbolc or jan-1
    #[arg(long)]
    year_start: Option<YearStart>,

    /// celtic, astronomical or meteorological
    #[arg(long)]
    seasons: Option<SeasonScheme>,

    /// none, simple or emoji
    #[arg(long)]
    moon: Option<MoonView>,

    /// Language of long descriptions
    #[arg(long)]
    language: Option<String>,

    /// JSON translation file; keys are printed when absent
    #[arg(long)]
    locale: Option<PathBuf>,

    /// Reference instant, RFC 3339 (defaults to the local clock)
    #[arg(long)]
    now: Option<DateTime<FixedOffset>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Festivals of the year as a table
    Table,
    /// Today's festival, or the next one
    Closest,
    /// Lunar phases of the year
    Phases,
    /// Wheel layout as JSON
    Wheel,
    /// Calendar entries as JSON
    Export,
    /// Long description of a festival
    Describe { key: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.config)?;

    // Apply CLI overrides
    if cli.year.is_some() {
        settings.year = cli.year;
    }
    if cli.no_solar {
        settings.include_solar = false;
    }
    if cli.no_fire {
        settings.include_fire = false;
    }
    if let Some(year_start) = cli.year_start {
        settings.year_start = year_start;
    }
    if let Some(seasons) = cli.seasons {
        settings.season_scheme = seasons;
    }
    if let Some(moon) = cli.moon {
        settings.moon_view = moon;
    }
    if let Some(language) = cli.language {
        settings.language = language;
    }

    let now = cli.now.unwrap_or_else(|| Local::now().fixed_offset());
    let wheel_settings = settings.wheel_settings(now.year());
    let year = wheel_settings.year;
    debug!(?wheel_settings, %now, "settings");

    let table = match &cli.locale {
        Some(path) => Some(Table::from_json(&std::fs::read_to_string(path)?)?),
        None => None,
    };
    let localizer: &dyn Localizer = match &table {
        Some(table) => table,
        None => &Keys,
    };
    let catalog = Catalog::default();
    let events = catalog.build_events(year, wheel_settings.include_fire, wheel_settings.include_solar);

    match cli.command {
        Command::Table => {
            for row in fmt::table_rows(&catalog, &events, year, localizer) {
                println!("{}\t{}\t{}\t{}", row.emoji, row.date, row.name, row.description);
            }
        }
        Command::Closest => {
            // The current year's events, whatever year is being shown.
            let events = catalog.build_events(now.year(), wheel_settings.include_fire, wheel_settings.include_solar);
            let closest = closest_festival(&catalog, &events, &now);
            println!("{}", fmt::closest_festival_text(&closest, localizer));
        }
        Command::Phases => {
            for phase in lunar::lunar_phases(catalog.ephemeris(), year) {
                println!(
                    "{} {}\t{}",
                    fmt::phase_emoji(phase.phase),
                    phase.instant.to_rfc3339(),
                    localizer.text(&phase.label_key, &[])
                );
            }
        }
        Command::Wheel => print_json(&Wheel::build(&catalog, &wheel_settings, &now))?,
        Command::Export => {
            #[derive(Serialize)]
            struct Calendar {
                name: String,
                file_name: String,
                entries: Vec<export::CalendarEntry>,
            }
            print_json(&Calendar {
                name: export::calendar_name(year),
                file_name: export::file_name(year),
                entries: export::calendar_entries(&catalog, year, wheel_settings.include_solar),
            })?
        }
        Command::Describe { key } => {
            let event = catalog.find(&key).ok_or(Error::UnknownName {
                kind: "festival",
                name: key.clone(),
            })?;
            let cache = ContentCache::new(DirSource::new(&settings.content_root));
            let text = long_description(&cache, event, &settings.language, localizer, &CancelToken::new());
            println!("{text}");
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
