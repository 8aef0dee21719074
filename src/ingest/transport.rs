/// HTTP transport for the home REST services.
///
/// `Transport` is the seam between the response cache and the network: the
/// production implementation wraps a blocking `reqwest` client, tests swap
/// in a scripted fake that counts calls.

use std::time::Duration;

use crate::ingest::cache::Query;
use crate::model::FetchError;

/// Status code and body of one GET, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Performs one blocking GET.
///
/// Non-200 statuses are returned as responses, not errors; only transport
/// failures (timeout, refused connection, broken body) are `Err`.
pub trait Transport {
    fn get(&self, url: &str, query: &Query) -> Result<RawResponse, FetchError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, query: &Query) -> Result<RawResponse, FetchError> {
        (**self).get(url, query)
    }
}

// ---------------------------------------------------------------------------
// reqwest implementation
// ---------------------------------------------------------------------------

/// Blocking `reqwest` transport. Cloning shares the connection pool, so one
/// instance can back every operation while each operation keeps its own
/// cache.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// `timeout` of `None` keeps the client default.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &Query) -> Result<RawResponse, FetchError> {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query.pairs());
        }

        let response = request.send().map_err(classify_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(classify_reqwest_error)?;

        tracing::debug!(url, status, bytes = body.len(), "GET completed");
        Ok(RawResponse { status, body })
    }
}

/// Timeout is checked first: a connect timeout is "silent", not "broken".
pub fn classify_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_connect() {
        FetchError::Connection(err.to_string())
    } else {
        FetchError::Transport(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
