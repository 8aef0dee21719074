/// Safe fetch-and-decode against the home REST services.
///
/// `RestBackend` is the failure boundary of the crate: it resolves an
/// endpoint, fetches through the operation's cache, decodes the JSON and
/// folds every failure into an `Outcome` placeholder. Nothing above it ever
/// sees a `FetchError`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{Endpoint, RestConfig};
use crate::ingest::cache::{CachedFetch, Query};
use crate::ingest::transport::Transport;
use crate::logging;
use crate::model::{FetchError, Outcome};

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// A payload that may hold one reading or, for multi-sensor endpoints, a
/// list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<R> {
    One(R),
    Many(Vec<R>),
}

impl<R> Payload<R> {
    pub fn into_vec(self) -> Vec<R> {
        match self {
            Payload::One(reading) => vec![reading],
            Payload::Many(readings) => readings,
        }
    }
}

/// Decodes a body into the reading type the caller expects.
pub fn decode<R: DeserializeOwned>(body: &str) -> Result<R, FetchError> {
    Ok(serde_json::from_str(body)?)
}

/// Decodes a JSON array element by element, or a JSON object as one reading.
pub fn decode_payload<R: DeserializeOwned>(body: &str) -> Result<Payload<R>, FetchError> {
    match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => {
            let readings = items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<R>, _>>()?;
            Ok(Payload::Many(readings))
        }
        other => Ok(Payload::One(serde_json::from_value(other)?)),
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Per-operation REST client. Build one per page render and drop it after.
pub struct RestBackend<'a, T: Transport> {
    config: &'a RestConfig,
    fetch: CachedFetch<T>,
}

impl<'a, T: Transport> RestBackend<'a, T> {
    pub fn new(config: &'a RestConfig, transport: T) -> Self {
        Self {
            config,
            fetch: CachedFetch::new(transport),
        }
    }

    pub fn config(&self) -> &'a RestConfig {
        self.config
    }

    pub(crate) fn fetcher(&mut self) -> &mut CachedFetch<T> {
        &mut self.fetch
    }

    /// Fetches and decodes `endpoint`; never fails.
    pub fn safe_get<R: DeserializeOwned>(&mut self, endpoint: &Endpoint, query: &Query) -> Outcome<R> {
        self.guarded(endpoint, query, decode::<R>)
    }

    /// Like `safe_get`, accepting either a single object or a list.
    pub fn safe_get_payload<R: DeserializeOwned>(
        &mut self,
        endpoint: &Endpoint,
        query: &Query,
    ) -> Outcome<Payload<R>> {
        self.guarded(endpoint, query, decode_payload::<R>)
    }

    /// `safe_get` for one of the configured `options::*` endpoints.
    pub fn get<R: DeserializeOwned>(&mut self, option: &str, query: &Query) -> Outcome<R> {
        let endpoint = self.config.endpoint(option);
        self.safe_get(&endpoint, query)
    }

    pub fn get_payload<R: DeserializeOwned>(&mut self, option: &str, query: &Query) -> Outcome<Payload<R>> {
        let endpoint = self.config.endpoint(option);
        self.safe_get_payload(&endpoint, query)
    }

    fn guarded<R, D>(&mut self, endpoint: &Endpoint, query: &Query, decoder: D) -> Outcome<R>
    where
        D: FnOnce(&str) -> Result<R, FetchError>,
    {
        match self.fetch_and_decode(endpoint, query, decoder) {
            Ok(reading) => Outcome::Reading(reading),
            Err(err) => {
                logging::log_fetch_failure(endpoint.name(), &err);
                err.into()
            }
        }
    }

    fn fetch_and_decode<R, D>(&mut self, endpoint: &Endpoint, query: &Query, decoder: D) -> Result<R, FetchError>
    where
        D: FnOnce(&str) -> Result<R, FetchError>,
    {
        let url = endpoint
            .url()
            .ok_or_else(|| FetchError::Unconfigured(endpoint.name().to_string()))?;
        let response = self.fetch.fetch(&url, query)?;
        if !response.is_ok() {
            return Err(FetchError::Status(response.status));
        }
        decoder(&response.body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options;
    use crate::ingest::testing::{Scripted, ScriptedTransport};
    use crate::model::{TemperatureReading, ValueTendency};

    const PRESSURE_URL: &str = "http://h:1/pressure";

    fn config() -> RestConfig {
        RestConfig::from_toml_str(
            r#"
            [rest]
            host = "h"
            port = 1
            [rest.endpoints]
            current-pressure = "pressure"
            current-temperature = "temperature"
            "#,
        )
        .unwrap()
    }

    fn pressure_outcome(answer: Scripted) -> Outcome<ValueTendency> {
        let config = config();
        let transport = ScriptedTransport::new().route(PRESSURE_URL, answer);
        let mut backend = RestBackend::new(&config, &transport);
        backend.get(options::CURRENT_PRESSURE, &Query::new())
    }

    #[test]
    fn test_valid_json_decodes_into_reading() {
        let outcome = pressure_outcome(Scripted::json(r#"{"current_value":1012.5,"tendency":"STEADY"}"#));
        assert!(outcome.succeeded());
        assert_eq!(outcome.reading().map(|r| r.current_value), Some(1012.5));
    }

    #[test]
    fn test_malformed_json_becomes_error() {
        let outcome = pressure_outcome(Scripted::json("{not json"));
        assert!(!outcome.succeeded());
        assert!(matches!(&outcome, Outcome::Error(m) if m.starts_with("Malformed payload")));
    }

    #[test]
    fn test_wrong_shape_becomes_error() {
        let outcome = pressure_outcome(Scripted::json(r#"{"temperature":3.0}"#));
        assert!(matches!(outcome, Outcome::Error(_)));
    }

    #[test]
    fn test_non_200_becomes_error_with_status() {
        assert_eq!(
            pressure_outcome(Scripted::Status(404, "")),
            Outcome::Error("Response code 404".to_string())
        );
        assert_eq!(
            pressure_outcome(Scripted::Status(500, "{}")),
            Outcome::Error("Response code 500".to_string())
        );
    }

    #[test]
    fn test_timeout_becomes_not_available() {
        assert_eq!(pressure_outcome(Scripted::Timeout), Outcome::NotAvailable);
    }

    #[test]
    fn test_connection_failure_becomes_error() {
        let outcome = pressure_outcome(Scripted::Refused);
        assert!(matches!(&outcome, Outcome::Error(m) if m.starts_with("Connection issue")));
    }

    #[test]
    fn test_other_transport_failure_becomes_generic_error() {
        let outcome = pressure_outcome(Scripted::Broken);
        assert!(matches!(&outcome, Outcome::Error(m) if m.starts_with("Unknown failure")));
    }

    #[test]
    fn test_unconfigured_endpoint_becomes_error_without_network() {
        let config = RestConfig::from_toml_str("").unwrap();
        let transport = ScriptedTransport::new();
        let mut backend = RestBackend::new(&config, &transport);

        let outcome: Outcome<ValueTendency> = backend.get(options::CURRENT_PRESSURE, &Query::new());

        assert_eq!(
            outcome,
            Outcome::Error("Endpoint not configured: current-pressure".to_string())
        );
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_same_endpoint_twice_is_one_call() {
        let config = config();
        let transport = ScriptedTransport::new()
            .route(PRESSURE_URL, Scripted::json(r#"{"current_value":1000,"tendency":"RISING"}"#));
        let mut backend = RestBackend::new(&config, &transport);

        let first: Outcome<ValueTendency> = backend.get(options::CURRENT_PRESSURE, &Query::new());
        let second: Outcome<ValueTendency> = backend.get(options::CURRENT_PRESSURE, &Query::new());

        assert_eq!(first, second);
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_payload_array_decodes_each_element() {
        let payload: Payload<TemperatureReading> = decode_payload(
            r#"[{"location":"External","temperature":5.2},{"location":"Office","temperature":21.0}]"#,
        )
        .unwrap();
        let readings = payload.into_vec();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].location, "Office");
    }

    #[test]
    fn test_payload_object_is_single_reading() {
        let payload: Payload<TemperatureReading> =
            decode_payload(r#"{"location":"Roof","temperature":-1.5}"#).unwrap();
        assert!(matches!(payload, Payload::One(ref r) if r.location == "Roof"));
    }

    #[test]
    fn test_payload_with_one_bad_element_fails_whole_decode() {
        let result = decode_payload::<TemperatureReading>(
            r#"[{"location":"External","temperature":5.2},{"location":"Office"}]"#,
        );
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }
}
