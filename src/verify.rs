//! Endpoint Verification Module
//!
//! Probes every endpoint named in the configuration once and reports which
//! ones answer with something usable. Run it after editing the config file,
//! before trusting the dashboard.

use chrono::Utc;
use serde::Serialize;

use crate::config::{RestConfig, options};
use crate::ingest::cache::Query;
use crate::ingest::svg::extract_svg;
use crate::ingest::transport::Transport;
use crate::logging;
use crate::model::FetchError;

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub results: Vec<EndpointVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub working: usize,
    pub failed: usize,
    pub unconfigured: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointVerification {
    pub option: String,
    pub kind: EndpointKind,
    pub url: Option<String>,
    pub status: VerificationStatus,
    pub http_status: Option<u16>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EndpointKind {
    Json,
    Svg,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum VerificationStatus {
    Success,
    /// Answered, but not with the kind of document expected.
    PartialSuccess,
    /// Did not answer in time.
    Silent,
    Failed,
    Unconfigured,
}

// ============================================================================
// Single Endpoint
// ============================================================================

pub fn verify_endpoint<T: Transport>(
    transport: &T,
    config: &RestConfig,
    option: &str,
    kind: EndpointKind,
) -> EndpointVerification {
    let url = config.endpoint(option).url();
    let mut result = EndpointVerification {
        option: option.to_string(),
        kind,
        url: url.clone(),
        status: VerificationStatus::Unconfigured,
        http_status: None,
        error_message: None,
    };

    let Some(url) = url else {
        result.error_message = Some("host, port or path missing".to_string());
        return result;
    };
    if config.endpoints.get(option).is_none() {
        result.error_message = Some("no path configured".to_string());
        return result;
    }

    match transport.get(&url, &Query::new()) {
        Ok(response) => {
            result.http_status = Some(response.status);
            if !response.is_ok() {
                result.status = VerificationStatus::Failed;
                result.error_message = Some(FetchError::Status(response.status).to_string());
            } else if looks_valid(kind, &response.body) {
                result.status = VerificationStatus::Success;
            } else {
                result.status = VerificationStatus::PartialSuccess;
                result.error_message = Some(match kind {
                    EndpointKind::Json => "body is not JSON".to_string(),
                    EndpointKind::Svg => "body has no <svg> element".to_string(),
                });
            }
        }
        Err(FetchError::Timeout) => {
            result.status = VerificationStatus::Silent;
            result.error_message = Some(FetchError::Timeout.to_string());
        }
        Err(err) => {
            result.status = VerificationStatus::Failed;
            result.error_message = Some(err.to_string());
        }
    }

    result
}

fn looks_valid(kind: EndpointKind, body: &str) -> bool {
    match kind {
        EndpointKind::Json => serde_json::from_str::<serde_json::Value>(body).is_ok(),
        EndpointKind::Svg => !extract_svg(body).is_empty(),
    }
}

// ============================================================================
// Full Verification Runner
// ============================================================================

pub fn verify_all<T: Transport>(transport: &T, config: &RestConfig) -> VerificationReport {
    let endpoints = options::JSON_ENDPOINTS
        .iter()
        .map(|option| (*option, EndpointKind::Json))
        .chain(options::SVG_ENDPOINTS.iter().map(|option| (*option, EndpointKind::Svg)));

    let mut report = VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        results: Vec::new(),
        summary: VerificationSummary::default(),
    };

    for (option, kind) in endpoints {
        let result = verify_endpoint(transport, config, option, kind);
        report.summary.total += 1;
        match result.status {
            VerificationStatus::Success | VerificationStatus::PartialSuccess => report.summary.working += 1,
            VerificationStatus::Silent | VerificationStatus::Failed => report.summary.failed += 1,
            VerificationStatus::Unconfigured => report.summary.unconfigured += 1,
        }
        tracing::debug!(endpoint = option, status = ?result.status, "verified");
        report.results.push(result);
    }

    logging::log_verification_summary(
        report.summary.total,
        report.summary.working,
        report.summary.failed,
    );
    report
}

pub fn print_summary(report: &VerificationReport) {
    println!("Endpoint verification ({})", report.timestamp);
    println!();
    for result in &report.results {
        let mark = match result.status {
            VerificationStatus::Success => "OK     ",
            VerificationStatus::PartialSuccess => "PARTIAL",
            VerificationStatus::Silent => "SILENT ",
            VerificationStatus::Failed => "FAILED ",
            VerificationStatus::Unconfigured => "UNSET  ",
        };
        match &result.error_message {
            Some(message) => println!("  {} {:<28} {}", mark, result.option, message),
            None => println!("  {} {:<28} {}", mark, result.option, result.url.as_deref().unwrap_or("")),
        }
    }
    println!();
    println!(
        "{}/{} working, {} failed, {} unconfigured",
        report.summary.working, report.summary.total, report.summary.failed, report.summary.unconfigured
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::testing::{Scripted, ScriptedTransport};

    fn config() -> RestConfig {
        RestConfig::from_toml_str(
            r#"
            [rest]
            host = "h"
            port = 1
            [rest.endpoints]
            current-temperature = "temperature"
            current-pressure = "pressure"
            current-wind = "wind"
            current-daylight = "daylight"
            graph-cesspit-today = "graph/cesspit"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_verification_classifies_each_endpoint() {
        let config = config();
        let transport = ScriptedTransport::new()
            .route("http://h:1/temperature", Scripted::json("[]"))
            .route("http://h:1/pressure", Scripted::json("<html>"))
            .route("http://h:1/wind", Scripted::Timeout)
            .route("http://h:1/daylight", Scripted::Status(502, ""))
            .route("http://h:1/graph/cesspit", Scripted::json("<?xml?><svg></svg>"));

        let report = verify_all(&transport, &config);
        let status_of = |option: &str| {
            report
                .results
                .iter()
                .find(|r| r.option == option)
                .map(|r| r.status)
        };

        assert_eq!(status_of(options::CURRENT_TEMPERATURE), Some(VerificationStatus::Success));
        assert_eq!(status_of(options::CURRENT_PRESSURE), Some(VerificationStatus::PartialSuccess));
        assert_eq!(status_of(options::CURRENT_WIND), Some(VerificationStatus::Silent));
        assert_eq!(status_of(options::CURRENT_DAYLIGHT), Some(VerificationStatus::Failed));
        assert_eq!(status_of(options::GRAPH_CESSPIT_TODAY), Some(VerificationStatus::Success));
        assert_eq!(status_of(options::PROGRESS_BAR), Some(VerificationStatus::Unconfigured));

        assert_eq!(
            report.summary.total,
            options::JSON_ENDPOINTS.len() + options::SVG_ENDPOINTS.len()
        );
        assert_eq!(report.summary.working, 3);
        assert_eq!(report.summary.failed, 2);
        assert_eq!(transport.calls(), 5, "unset endpoints must not be probed");
    }

    #[test]
    fn test_report_serializes_to_json() {
        let config = RestConfig::from_toml_str("").unwrap();
        let report = verify_all(&ScriptedTransport::new(), &config);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["unconfigured"], report.summary.total);
    }
}
