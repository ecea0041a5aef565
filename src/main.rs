use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use sat_o_prop::config::Config;
use sat_o_prop::environment::{scaled_state, EopTable, SpaceWeatherTable};
use sat_o_prop::predict::{predict_passes, Pass, PassOptions, SampleOptions};
use sat_o_prop::propagation::{propagate_many, OrbitState, Prediction};
use sat_o_prop::tle::{load_file, parse_catalog_sets, TleRecord};

#[derive(Parser)]
#[command(name = "sat-o-prop")]
#[command(about = "SGP-4/SDP-4 propagation and pass prediction from TLEs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and initialize every element set in a catalogue file
    Validate { tle: PathBuf },
    /// Print TEME state vectors at minute offsets from each epoch
    Propagate {
        tle: PathBuf,
        /// Comma-separated minutes since epoch
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "0")]
        minutes: Vec<f64>,
        #[arg(long)]
        json: bool,
    },
    /// List passes over the configured ground station
    Passes {
        tle: PathBuf,
        #[arg(long)]
        config: PathBuf,
        /// RFC 3339 start time (default: now)
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        #[arg(long, value_parser = humantime::parse_duration, default_value = "24h")]
        duration: std::time::Duration,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { tle } => validate(&tle),
        Commands::Propagate { tle, minutes, json } => propagate(&tle, &minutes, json),
        Commands::Passes {
            tle,
            config,
            start,
            duration,
            json,
        } => passes(&tle, &config, start, duration, json),
    }
}

fn validate(path: &Path) -> ExitCode {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut failures = 0;
    let sets = parse_catalog_sets(&content);
    for (line, result) in &sets {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                println!("  line {}: {}", line, e);
                failures += 1;
                continue;
            }
        };
        match OrbitState::from_tle(record) {
            Ok(state) => println!(
                "  {:05} {}: {}, {}, period {:.2} min",
                record.catalog_number,
                record.display_name(),
                state.regime(),
                state.resonance_class(),
                state.period_minutes()
            ),
            Err(e) => {
                println!(
                    "  {:05} {}: {}",
                    record.catalog_number,
                    record.display_name(),
                    e
                );
                failures += 1;
            }
        }
    }

    println!("{} sets, {} invalid", sets.len(), failures);
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[derive(Serialize)]
struct PropagationRow {
    catalog_number: u32,
    minutes: f64,
    #[serde(flatten)]
    prediction: Option<Prediction>,
    error: Option<String>,
}

fn propagate(path: &Path, minutes: &[f64], json: bool) -> ExitCode {
    let records = match load_records(path) {
        Some(r) => r,
        None => return ExitCode::FAILURE,
    };

    let mut rows = Vec::new();
    for record in &records {
        let state = match OrbitState::from_tle(record) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}: {}", record.display_name(), e);
                continue;
            }
        };
        for (&t, result) in minutes.iter().zip(propagate_many(&state, minutes)) {
            let (prediction, error) = match result {
                Ok(p) => (Some(p), None),
                Err(e) => (None, Some(e.to_string())),
            };
            rows.push(PropagationRow {
                catalog_number: record.catalog_number,
                minutes: t,
                prediction,
                error,
            });
        }
    }

    if json {
        return print_json(&rows);
    }
    for row in &rows {
        match (&row.prediction, &row.error) {
            (Some(p), _) => println!(
                "{:05} {:>10.3}  r = {:>14.6} {:>14.6} {:>14.6} km  v = {:>11.8} {:>11.8} {:>11.8} km/s",
                row.catalog_number,
                row.minutes,
                p.position[0],
                p.position[1],
                p.position[2],
                p.velocity[0],
                p.velocity[1],
                p.velocity[2]
            ),
            (None, Some(e)) => println!("{:05} {:>10.3}  {}", row.catalog_number, row.minutes, e),
            (None, None) => {}
        }
    }
    ExitCode::SUCCESS
}

fn passes(
    tle: &Path,
    config_path: &Path,
    start: Option<DateTime<Utc>>,
    duration: std::time::Duration,
    json: bool,
) -> ExitCode {
    let config = match Config::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let station = match config.ground_station() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let Some(records) = load_records(tle) else {
        return ExitCode::FAILURE;
    };

    let eop = match &config.environment.eop_file {
        Some(path) => match EopTable::load(path) {
            Ok(t) => Some(t),
            Err(e) => {
                eprintln!("EOP error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };
    let weather = match (&config.environment.space_weather_file, config.environment.drag_scaling) {
        (Some(path), true) => match SpaceWeatherTable::load(path) {
            Ok(t) => Some(t),
            Err(e) => {
                eprintln!("Space weather error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        _ => None,
    };

    let start = start.unwrap_or_else(Utc::now);
    let end = match Duration::from_std(duration) {
        Ok(d) => start + d,
        Err(e) => {
            eprintln!("Invalid duration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let options = PassOptions {
        refine: config.prediction.refine,
        sampling: SampleOptions {
            eop: eop.as_ref(),
            refraction: config.prediction.refraction,
        },
    };

    let mut all: Vec<(String, Pass)> = Vec::new();
    for record in &records {
        let state = match OrbitState::from_tle(record) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}: {}", record.display_name(), e);
                continue;
            }
        };
        let state = match &weather {
            Some(table) => match scaled_state(&state, table) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("{}: {}", record.display_name(), e);
                    continue;
                }
            },
            None => state,
        };

        match predict_passes(
            &state,
            &station,
            start,
            end,
            config.prediction.step.as_secs_f64(),
            config.prediction.min_elevation_deg.to_radians(),
            &options,
        ) {
            Ok(found) => all.extend(found.into_iter().map(|p| (record.display_name(), p))),
            Err(e) => log::warn!(
                "Failed to predict passes for {}: {}",
                record.display_name(),
                e
            ),
        }
    }
    all.sort_by_key(|(_, p)| p.event.aos);

    if json {
        #[derive(Serialize)]
        struct Row<'a> {
            satellite: &'a str,
            #[serde(flatten)]
            pass: &'a Pass,
        }
        let rows: Vec<_> = all
            .iter()
            .map(|(name, pass)| Row {
                satellite: name,
                pass,
            })
            .collect();
        return print_json(&rows);
    }

    println!("Passes over {} from {} to {}", station.name, start, end);
    for (name, p) in &all {
        println!(
            "  {:<24} AOS {} ({:>5.1}°)  TCA {} ({:>4.1}°)  LOS {} ({:>5.1}°)  {:>4} s",
            name,
            p.event.aos.format("%Y-%m-%d %H:%M:%S"),
            p.aos_azimuth_deg,
            p.event.tca.format("%H:%M:%S"),
            p.max_elevation_deg,
            p.event.los.format("%H:%M:%S"),
            p.los_azimuth_deg,
            p.duration_seconds
        );
    }
    ExitCode::SUCCESS
}

fn load_records(path: &Path) -> Option<Vec<TleRecord>> {
    match load_file(path) {
        Ok(records) => Some(records),
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            None
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("JSON error: {}", e);
            ExitCode::FAILURE
        }
    }
}
