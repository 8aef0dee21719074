/// REST endpoint configuration.
///
/// The configuration is loaded once at startup from a TOML file and passed
/// by reference into every per-operation backend. It is never mutated after
/// loading.
///
/// ```toml
/// [rest]
/// host = "192.168.1.6"
/// port = 12999
/// timeout_secs = 10
///
/// [rest.endpoints]
/// current-temperature = "temperature/current"
/// graph-temperature = "/graph/temperature"
/// ```

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable (also read from `.env`) naming the config file.
pub const CONFIG_PATH_ENV: &str = "WEBINFO_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "/etc/bhs/web-info/web-info.toml";

// ---------------------------------------------------------------------------
// Option names
// ---------------------------------------------------------------------------

/// Fixed option names under `[rest.endpoints]`, one per logical endpoint.
pub mod options {
    pub const CURRENT_TEMPERATURE: &str = "current-temperature";
    pub const CURRENT_CESSPIT_LEVEL: &str = "current-cesspit-level";
    pub const CURRENT_HUMIDITY_IN: &str = "current-humidity-in";
    pub const CURRENT_PRESSURE: &str = "current-pressure";
    pub const CURRENT_AIR_QUALITY: &str = "current-air-quality";
    pub const CURRENT_DAYLIGHT: &str = "current-daylight";
    pub const CURRENT_SOIL_MOISTURE: &str = "current-soil-moisture";
    pub const CURRENT_SOLAR_PLANT: &str = "current-solar-plant";
    pub const CURRENT_PRECIPITATION: &str = "current-precipitation";
    pub const CURRENT_WIND: &str = "current-wind";
    pub const CURRENT_WATER_TANK: &str = "current-water-tank";
    pub const CURRENT_CESSPIT_PREDICTION: &str = "current-cesspit-prediction";
    pub const SYSTEM_STATUS: &str = "system-status";
    pub const CURRENT_CESSPIT_LOG: &str = "current-cesspit-log";
    pub const HISTORY_TEMPERATURE_DAILY: &str = "history-temperature-daily";

    pub const GRAPH_TEMPERATURE: &str = "graph-temperature";
    pub const GRAPH_CESSPIT_TODAY: &str = "graph-cesspit-today";
    pub const GRAPH_CESSPIT_WEEK: &str = "graph-cesspit-week";
    pub const GRAPH_CESSPIT_PREDICTION: &str = "graph-cesspit-prediction";
    pub const PROGRESS_BAR: &str = "progress-bar";

    /// Endpoints answering with JSON.
    pub const JSON_ENDPOINTS: &[&str] = &[
        CURRENT_TEMPERATURE,
        CURRENT_CESSPIT_LEVEL,
        CURRENT_HUMIDITY_IN,
        CURRENT_PRESSURE,
        CURRENT_AIR_QUALITY,
        CURRENT_DAYLIGHT,
        CURRENT_SOIL_MOISTURE,
        CURRENT_SOLAR_PLANT,
        CURRENT_PRECIPITATION,
        CURRENT_WIND,
        CURRENT_WATER_TANK,
        CURRENT_CESSPIT_PREDICTION,
        SYSTEM_STATUS,
        CURRENT_CESSPIT_LOG,
        HISTORY_TEMPERATURE_DAILY,
    ];

    /// Endpoints answering with SVG markup.
    pub const SVG_ENDPOINTS: &[&str] = &[
        GRAPH_TEMPERATURE,
        GRAPH_CESSPIT_TODAY,
        GRAPH_CESSPIT_WEEK,
        GRAPH_CESSPIT_PREDICTION,
        PROGRESS_BAR,
    ];
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// A remote resource identified by host, port and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    name: String,
    host: Option<String>,
    port: Option<String>,
    path: String,
}

impl Endpoint {
    pub fn new(host: Option<&str>, port: Option<&str>, path: Option<&str>) -> Self {
        let path = normalize_path(path.unwrap_or_default());
        Self {
            name: path.clone(),
            host: present(host),
            port: present(port),
            path,
        }
    }

    /// Label used in logs and in the "not configured" message.
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fully qualified URL, or `None` when host or port is missing.
    pub fn url(&self) -> Option<String> {
        match (&self.host, &self.port) {
            (Some(host), Some(port)) => Some(format!("http://{}:{}{}", host, port, self.path)),
            _ => None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.host.is_some() && self.port.is_some()
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.to_string())
}

/// Empty stays empty, a missing leading `/` gets exactly one, a trailing
/// `/` is neither added nor removed.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

// ---------------------------------------------------------------------------
// Configuration file
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    rest: RestConfig,
}

/// The `[rest]` section: shared host/port plus one path per endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default, deserialize_with = "port_as_string")]
    pub port: Option<String>,
    /// Per-request timeout; the HTTP client default applies when absent.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
}

impl RestConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(raw)?;
        Ok(file.rest)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            endpoints = config.endpoints.len(),
            "loaded REST configuration"
        );
        Ok(config)
    }

    /// Loads from `$WEBINFO_CONFIG` (after reading `.env`), falling back to
    /// the system-wide path.
    pub fn load_default() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    /// Resolves one of the `options::*` names. An option missing from the
    /// file yields an endpoint with an empty path, not an error.
    pub fn endpoint(&self, option: &str) -> Endpoint {
        Endpoint::new(
            self.host.as_deref(),
            self.port.as_deref(),
            self.endpoints.get(option).map(String::as_str),
        )
        .named(option)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPort {
    Number(u16),
    Text(String),
}

fn port_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawPort>::deserialize(deserializer)?.map(|port| match port {
        RawPort::Number(n) => n.to_string(),
        RawPort::Text(s) => s,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_without_leading_slash_gets_exactly_one() {
        for path in ["temperature", "a/b/c", "graph/", "x"] {
            let normalized = normalize_path(path);
            assert_eq!(normalized, format!("/{}", path));
            assert!(!normalized.starts_with("//"));
        }
    }

    #[test]
    fn test_path_with_leading_slash_is_unchanged() {
        for path in ["/temperature", "/a/b/", "/"] {
            assert_eq!(normalize_path(path), path);
        }
    }

    #[test]
    fn test_empty_path_stays_empty() {
        assert_eq!(normalize_path(""), "");
        assert_eq!(Endpoint::new(Some("h"), Some("1"), None).path(), "");
    }

    #[test]
    fn test_trailing_slash_is_never_added() {
        let endpoint = Endpoint::new(Some("localhost"), Some("8080"), Some("temperature"));
        assert_eq!(endpoint.url().as_deref(), Some("http://localhost:8080/temperature"));
    }

    #[test]
    fn test_url_requires_host_and_port_regardless_of_path() {
        let combos = [
            (None, Some("80")),
            (Some(""), Some("80")),
            (Some("host"), None),
            (Some("host"), Some("")),
            (None, None),
        ];
        for (host, port) in combos {
            for path in [None, Some(""), Some("x"), Some("/x")] {
                let endpoint = Endpoint::new(host, port, path);
                assert_eq!(
                    endpoint.url(),
                    None,
                    "host {:?} port {:?} path {:?} should be unconfigured",
                    host,
                    port,
                    path
                );
                assert!(!endpoint.is_configured());
            }
        }
    }

    #[test]
    fn test_config_resolves_named_endpoints() {
        let config = RestConfig::from_toml_str(
            r#"
            [rest]
            host = "192.168.1.6"
            port = 12999
            timeout_secs = 5

            [rest.endpoints]
            current-temperature = "temperature/current"
            graph-temperature = "/graph/temperature"
            "#,
        )
        .expect("valid config");

        let temperature = config.endpoint(options::CURRENT_TEMPERATURE);
        assert_eq!(temperature.name(), "current-temperature");
        assert_eq!(
            temperature.url().as_deref(),
            Some("http://192.168.1.6:12999/temperature/current")
        );
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_port_may_be_written_as_string() {
        let config = RestConfig::from_toml_str("[rest]\nhost = \"h\"\nport = \"8000\"\n").unwrap();
        assert_eq!(config.port.as_deref(), Some("8000"));
    }

    #[test]
    fn test_missing_option_gives_pathless_endpoint() {
        let config = RestConfig::from_toml_str("[rest]\nhost = \"h\"\nport = 1\n").unwrap();
        let endpoint = config.endpoint(options::CURRENT_WIND);
        assert_eq!(endpoint.url().as_deref(), Some("http://h:1"));
    }

    #[test]
    fn test_empty_file_is_fully_unconfigured() {
        let config = RestConfig::from_toml_str("").unwrap();
        assert!(!config.endpoint(options::CURRENT_TEMPERATURE).is_configured());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let result = RestConfig::from_toml_str("[rest\nhost=");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_option_lists_do_not_overlap() {
        for option in options::JSON_ENDPOINTS {
            assert!(!options::SVG_ENDPOINTS.contains(option), "{} listed twice", option);
        }
    }
}
