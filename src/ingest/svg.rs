/// SVG graph passthrough.
///
/// Graph endpoints render server-side and answer with an XML document. The
/// page embeds the `<svg>` element inline, so the prolog and any leading
/// comments are dropped. A graph that cannot be fetched must not break the
/// page: it degrades to a 1x1 empty canvas.

use chrono::NaiveDate;

use crate::config::{RestConfig, options};
use crate::ingest::cache::Query;
use crate::ingest::rest::RestBackend;
use crate::ingest::transport::Transport;

pub const EMPTY_SVG: &str = r#"<svg width="1pt" height="1pt" viewBox="0 0 1 1" xmlns="http://www.w3.org/2000/svg" version="1.1"></svg>"#;

/// Everything from the first `<svg` on, or `""` when there is none.
pub fn extract_svg(document: &str) -> &str {
    match document.find("<svg") {
        Some(start) => &document[start..],
        None => "",
    }
}

impl<T: Transport> RestBackend<'_, T> {
    /// Fetches an SVG document through the operation cache; never fails.
    pub fn fetch_svg(&mut self, url: &str, query: &Query) -> String {
        match self.fetcher().fetch(url, query) {
            Ok(response) if response.is_ok() => extract_svg(&response.body).to_string(),
            Ok(response) => {
                tracing::warn!(url, status = response.status, "graph request rejected");
                EMPTY_SVG.to_string()
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "graph request failed");
                EMPTY_SVG.to_string()
            }
        }
    }

    /// `fetch_svg` for one of the configured graph endpoints.
    pub fn graph(&mut self, option: &str, query: &Query) -> String {
        match self.config().endpoint(option).url() {
            Some(url) => self.fetch_svg(&url, query),
            None => {
                tracing::warn!(endpoint = option, "graph endpoint not configured");
                EMPTY_SVG.to_string()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Graph accessors
// ---------------------------------------------------------------------------

/// Rendering style of the daily temperature graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphStyle {
    Line,
    FillBetween,
}

impl GraphStyle {
    fn as_param(self) -> &'static str {
        match self {
            GraphStyle::Line => "line",
            GraphStyle::FillBetween => "fill-between",
        }
    }
}

/// Options of the progress-bar endpoint; unset options are not sent.
#[derive(Debug, Clone, Default)]
pub struct ProgressBarOptions {
    pub size: Option<String>,
    pub show_border: bool,
    pub color: Option<String>,
    pub colormap: Option<String>,
}

/// Per-operation access to the graph endpoints.
pub struct Graphs<'a, T: Transport> {
    backend: RestBackend<'a, T>,
}

impl<'a, T: Transport> Graphs<'a, T> {
    pub fn new(config: &'a RestConfig, transport: T) -> Self {
        Self {
            backend: RestBackend::new(config, transport),
        }
    }

    /// Daily temperature graph of one sensor; `date` of `None` means today.
    pub fn temperature_daily(&mut self, sensor_location: &str, title: &str, date: Option<NaiveDate>) -> String {
        let query = Query::new()
            .with("sensor_location", sensor_location)
            .with_opt("date", date.map(|d| d.format("%Y-%m-%d")))
            .with("title", title)
            .with("style", GraphStyle::FillBetween.as_param());
        self.backend.graph(options::GRAPH_TEMPERATURE, &query)
    }

    pub fn cesspit_today(&mut self) -> String {
        self.backend.graph(options::GRAPH_CESSPIT_TODAY, &Query::new())
    }

    pub fn cesspit_last_week(&mut self) -> String {
        self.backend
            .graph(options::GRAPH_CESSPIT_WEEK, &Query::new().with("days_in_past", 7))
    }

    pub fn cesspit_prediction(&mut self) -> String {
        self.backend.graph(options::GRAPH_CESSPIT_PREDICTION, &Query::new())
    }

    pub fn progress_bar(&mut self, percentage: u8, bar: &ProgressBarOptions) -> String {
        let query = Query::new()
            .with("progress", percentage)
            .with_opt("size", bar.size.as_deref())
            .with("show_border", bar.show_border)
            .with_opt("color", bar.color.as_deref())
            .with_opt("colormap", bar.colormap.as_deref());
        self.backend.graph(options::PROGRESS_BAR, &query)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
