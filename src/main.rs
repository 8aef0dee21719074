/// Command-line runner for the home-info backend.
///
/// Usage:
///   webinfo [CONFIG]            print the main-page readings once
///   webinfo --verify [CONFIG]   probe every configured endpoint
///   webinfo --verify --json     same, as JSON
///
/// Without CONFIG the path comes from `$WEBINFO_CONFIG` (`.env` is read) or
/// the system-wide default. `$WEBINFO_LOG_FILE` adds file logging.

use std::error::Error;
use std::path::Path;

use webinfo_service::config::RestConfig;
use webinfo_service::dashboard::MainPageInfo;
use webinfo_service::ingest::HttpTransport;
use webinfo_service::logging::{self, LogLevel};
use webinfo_service::model::{Outcome, Tendency, TemperatureReading, ValueTendency};
use webinfo_service::verify;

const UNKNOWN: &str = "?";
const CELSIUS: &str = "\u{2103}";

fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let run_verify = args.iter().any(|a| a == "--verify");
    let as_json = args.iter().any(|a| a == "--json");
    let config_path = args.iter().find(|a| !a.starts_with("--"));

    let log_file = std::env::var("WEBINFO_LOG_FILE").ok();
    let _guard = logging::init_logging(LogLevel::Info, log_file.as_deref().map(Path::new));

    let config = match config_path {
        Some(path) => RestConfig::load(path)?,
        None => RestConfig::load_default()?,
    };
    let transport = HttpTransport::new(config.timeout())?;

    if run_verify {
        let report = verify::verify_all(&transport, &config);
        if as_json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            verify::print_summary(&report);
        }
        return Ok(());
    }

    print_main_page(&mut MainPageInfo::new(&config, transport));
    Ok(())
}

fn print_main_page(info: &mut MainPageInfo<'_, HttpTransport>) {
    let external = info.temperatures().external_best_available();
    let internal = info.temperatures().internal();
    let bunker = info.temperatures().bunker();

    println!("External   {}", temperature(&external));
    println!("Internal   {}", temperature(&internal));
    println!("Bunker     {}", temperature(&bunker));
    println!("Humidity   {}", tendency(&info.humidity_in(), 0));
    println!("Pressure   {}", tendency(&info.pressure(), 0));

    match info.cesspit_level() {
        Outcome::Reading(cesspit) => println!(
            "Cesspit    {:.2}% {:?}{}",
            cesspit.original_reading.fill,
            cesspit.state,
            if cesspit.failure_detected { " (sensor failure)" } else { "" }
        ),
        failure => println!("Cesspit    {} {}", UNKNOWN, failure.message().unwrap_or_default()),
    }

    match info.air_quality() {
        Outcome::Reading(air) => println!("PM10/PM2.5 {:.0}% / {:.0}%", air.pm_10, air.pm_2_5),
        failure => println!("PM10/PM2.5 {} {}", UNKNOWN, failure.message().unwrap_or_default()),
    }

    match info.daylight() {
        Outcome::Reading(daylight) => println!(
            "Daylight   {:?}, sunrise {}, sunset {}",
            daylight.time_of_day, daylight.sunrise, daylight.sunset
        ),
        failure => println!("Daylight   {} {}", UNKNOWN, failure.message().unwrap_or_default()),
    }

    match info.soil_moisture() {
        Outcome::Reading(sensors) => {
            let values: Vec<String> = sensors
                .iter()
                .map(|s| format!("{:.1}{}", s.current_value, arrow(s.tendency)))
                .collect();
            println!("Soil       {}", values.join("  "));
        }
        failure => println!("Soil       {} {}", UNKNOWN, failure.message().unwrap_or_default()),
    }

    match info.system_status() {
        Outcome::Reading(status) if status.all_active() => println!("Services   all active"),
        Outcome::Reading(status) => {
            println!("Services   inactive: {}", status.inactive_services().join(", "))
        }
        failure => println!("Services   {} {}", UNKNOWN, failure.message().unwrap_or_default()),
    }
}

fn temperature(outcome: &Outcome<TemperatureReading>) -> String {
    match outcome {
        Outcome::Reading(reading) => {
            let at = reading
                .timestamp
                .map(|t| t.format(" (%H:%M)").to_string())
                .unwrap_or_default();
            format!("{:.1} {} [{}]{}", reading.temperature, CELSIUS, reading.location, at)
        }
        _ => UNKNOWN.to_string(),
    }
}

fn tendency(outcome: &Outcome<ValueTendency>, precision: usize) -> String {
    match outcome {
        Outcome::Reading(reading) => format!(
            "{:.*}{}",
            precision,
            reading.current_value,
            arrow(reading.tendency)
        ),
        _ => UNKNOWN.to_string(),
    }
}

fn arrow(tendency: Tendency) -> &'static str {
    match tendency {
        Tendency::Rising => " \u{2197}",
        Tendency::Steady => " \u{2192}",
        Tendency::Falling => " \u{2198}",
    }
}
