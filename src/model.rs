/// Core data types for the home-info service.
///
/// This module defines the shared domain model imported by all other modules:
/// the typed readings decoded from the home REST services, the `Outcome`
/// wrapper every accessor returns, and the fetch error taxonomy.
/// It contains no I/O.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of asking the backend for one logical reading.
///
/// Every accessor returns one of these instead of an error or an empty value.
/// `Error` means the endpoint is broken (bad status, refused connection,
/// malformed payload); `NotAvailable` means it stayed silent (timeout, sensor
/// missing from a list). The presentation layer renders the two differently.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Reading(T),
    Error(String),
    NotAvailable,
}

pub const NOT_AVAILABLE_MESSAGE: &str = "Not available";

impl<T> Outcome<T> {
    /// The single success predicate callers should branch on.
    pub fn succeeded(&self) -> bool {
        matches!(self, Outcome::Reading(_))
    }

    pub fn reading(&self) -> Option<&T> {
        match self {
            Outcome::Reading(reading) => Some(reading),
            _ => None,
        }
    }

    pub fn into_reading(self) -> Option<T> {
        match self {
            Outcome::Reading(reading) => Some(reading),
            _ => None,
        }
    }

    /// Human-readable message of a placeholder; `None` for a reading.
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Reading(_) => None,
            Outcome::Error(message) => Some(message),
            Outcome::NotAvailable => Some(NOT_AVAILABLE_MESSAGE),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Reading(reading) => Outcome::Reading(f(reading)),
            Outcome::Error(message) => Outcome::Error(message),
            Outcome::NotAvailable => Outcome::NotAvailable,
        }
    }
}

impl<T> From<FetchError> for Outcome<T> {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout => Outcome::NotAvailable,
            other => Outcome::Error(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while fetching or decoding a REST resource.
///
/// Never handed to the presentation layer; `RestBackend::safe_get` turns
/// each one into an `Outcome` placeholder. The display strings double as
/// the placeholder messages.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Host or port missing from the configuration.
    #[error("Endpoint not configured: {0}")]
    Unconfigured(String),
    /// The service did not answer in time.
    #[error("Request timed out")]
    Timeout,
    /// Refused or unreachable.
    #[error("Connection issue: {0}")]
    Connection(String),
    /// Any status other than 200.
    #[error("Response code {0}")]
    Status(u16),
    /// The body was not the JSON shape the endpoint promises.
    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Unknown failure: {0}")]
    Transport(String),
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// Rising/steady/falling classification attached to a numeric reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tendency {
    #[serde(alias = "rising")]
    Rising,
    #[serde(alias = "steady")]
    Steady,
    #[serde(alias = "falling")]
    Falling,
}

/// One entry of the current-temperature list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemperatureReading {
    pub location: String,
    pub temperature: f64,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<NaiveDateTime>,
}

/// Current value plus its trend. Used by humidity, pressure and each entry
/// of the soil-moisture list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValueTendency {
    pub current_value: f64,
    pub tendency: Tendency,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CesspitState {
    #[serde(alias = "ok")]
    Ok,
    #[serde(alias = "warning")]
    Warning,
    #[serde(alias = "critical")]
    Critical,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CesspitReading {
    /// Fill level in percent.
    pub fill: f64,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CesspitLevel {
    pub state: CesspitState,
    #[serde(default)]
    pub failure_detected: bool,
    pub original_reading: CesspitReading,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AirQualityReading {
    pub pm_10: f64,
    pub pm_2_5: f64,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<NaiveDateTime>,
}

/// Air quality interpreted against the norm: `pm_10` and `pm_2_5` are
/// percentages of the allowed level, the raw sensor values live in
/// `original_reading`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AirQuality {
    pub pm_10: f64,
    pub pm_2_5: f64,
    pub original_reading: AirQualityReading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeOfDay {
    #[serde(alias = "morning")]
    Morning,
    #[serde(alias = "day")]
    Day,
    #[serde(alias = "evening")]
    Evening,
    #[serde(alias = "night")]
    Night,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DaylightReading {
    pub is_sunlight: bool,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Daylight {
    pub time_of_day: TimeOfDay,
    /// Local time, as formatted by the service (e.g. "06:12").
    pub sunrise: String,
    pub sunset: String,
    pub original_reading: DaylightReading,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SolarPlant {
    /// Instantaneous production, W.
    pub current_power: f64,
    /// Energy produced since midnight, kWh.
    pub today_production: f64,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Precipitation {
    pub is_raining: bool,
    /// mm/h
    #[serde(default)]
    pub intensity: f64,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wind {
    /// m/s
    pub speed: f64,
    #[serde(default)]
    pub gust: Option<f64>,
    /// Degrees, meteorological convention.
    #[serde(default)]
    pub direction: Option<f64>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WaterLevel {
    /// Fill level in percent.
    pub level: f64,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CesspitPrediction {
    pub days_to_full: f64,
    #[serde(default)]
    pub predicted_full_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemStatus {
    #[serde(default)]
    pub services: Vec<ServiceStatus>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<NaiveDateTime>,
}

impl SystemStatus {
    pub fn all_active(&self) -> bool {
        self.services.iter().all(|s| s.active)
    }

    pub fn inactive_services(&self) -> Vec<&str> {
        self.services
            .iter()
            .filter(|s| !s.active)
            .map(|s| s.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogEntry {
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceLog {
    #[serde(default)]
    pub entries: Vec<LogEntry>,
}

/// Min/max/mean temperature of one sensor over one day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemperatureDailyStatistics {
    pub location: String,
    pub date: NaiveDate,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// The services emit either RFC 3339 timestamps or naive local ones
/// (`2024-05-01T12:00:00`, `2024-05-01 12:00:00.123`). Both are kept as
/// local wall-clock time, which is what the dashboard shows.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, de::Error};

    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("unrecognized timestamp: {}", raw))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_only_reading_variant_succeeds() {
        assert!(Outcome::Reading(1).succeeded());
        assert!(!Outcome::<i32>::Error("boom".to_string()).succeeded());
        assert!(!Outcome::<i32>::NotAvailable.succeeded());
    }

    #[test]
    fn test_placeholders_carry_messages() {
        let error: Outcome<i32> = Outcome::Error("Response code 500".to_string());
        assert_eq!(error.message(), Some("Response code 500"));
        assert_eq!(Outcome::<i32>::NotAvailable.message(), Some(NOT_AVAILABLE_MESSAGE));
        assert_eq!(Outcome::Reading(3).message(), None);
    }

    #[test]
    fn test_timeout_becomes_not_available_everything_else_error() {
        let timeout: Outcome<()> = FetchError::Timeout.into();
        assert_eq!(timeout, Outcome::NotAvailable);

        let status: Outcome<()> = FetchError::Status(404).into();
        assert_eq!(status, Outcome::Error("Response code 404".to_string()));

        let refused: Outcome<()> = FetchError::Connection("refused".to_string()).into();
        assert_eq!(refused, Outcome::Error("Connection issue: refused".to_string()));
    }

    #[test]
    fn test_map_keeps_placeholders() {
        let failed: Outcome<i32> = Outcome::Error("x".to_string());
        assert_eq!(failed.map(|v| v * 2), Outcome::Error("x".to_string()));
        assert_eq!(Outcome::Reading(21).map(|v| v * 2), Outcome::Reading(42));
    }

    #[test]
    fn test_temperature_reading_decodes_rfc3339_and_naive_timestamps() {
        let with_offset: TemperatureReading = serde_json::from_str(
            r#"{"location":"External","temperature":5.2,"timestamp":"2024-05-01T12:30:00+02:00"}"#,
        )
        .expect("rfc3339 timestamp should decode");
        assert_eq!(with_offset.timestamp.map(|t| t.hour()), Some(12));

        let naive: TemperatureReading = serde_json::from_str(
            r#"{"location":"Office","temperature":21.0,"timestamp":"2024-05-01 08:15:00.250"}"#,
        )
        .expect("naive timestamp should decode");
        assert_eq!(naive.timestamp.map(|t| t.minute()), Some(15));
    }

    #[test]
    fn test_missing_timestamp_is_none_but_garbage_is_rejected() {
        let bare: TemperatureReading =
            serde_json::from_str(r#"{"location":"Attic","temperature":30.5}"#).unwrap();
        assert_eq!(bare.timestamp, None);

        let garbage = serde_json::from_str::<TemperatureReading>(
            r#"{"location":"Attic","temperature":30.5,"timestamp":"yesterday"}"#,
        );
        assert!(garbage.is_err(), "unparseable timestamp should fail decoding");
    }

    #[test]
    fn test_tendency_accepts_either_case() {
        let upper: ValueTendency =
            serde_json::from_str(r#"{"current_value":1013.0,"tendency":"RISING"}"#).unwrap();
        let lower: ValueTendency =
            serde_json::from_str(r#"{"current_value":1013.0,"tendency":"falling"}"#).unwrap();
        assert_eq!(upper.tendency, Tendency::Rising);
        assert_eq!(lower.tendency, Tendency::Falling);
    }

    #[test]
    fn test_nested_cesspit_level_decodes() {
        let level: CesspitLevel = serde_json::from_str(
            r#"{"state":"WARNING","failure_detected":false,
                "original_reading":{"fill":72.5,"timestamp":"2024-05-01T06:00:00"}}"#,
        )
        .unwrap();
        assert_eq!(level.state, CesspitState::Warning);
        assert_eq!(level.original_reading.fill, 72.5);
    }

    #[test]
    fn test_system_status_reports_inactive_services() {
        let status: SystemStatus = serde_json::from_str(
            r#"{"services":[{"name":"cesspit","active":true},{"name":"weather","active":false}]}"#,
        )
        .unwrap();
        assert!(!status.all_active());
        assert_eq!(status.inactive_services(), vec!["weather"]);
    }

    #[test]
    fn test_daily_statistics_date_decodes() {
        let stats: TemperatureDailyStatistics = serde_json::from_str(
            r#"{"location":"Office","date":"2024-05-01","min":19.5,"max":23.0,"mean":21.2}"#,
        )
        .unwrap();
        assert_eq!(stats.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }
}
