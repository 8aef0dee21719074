//! Scripted in-memory transport for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::ingest::cache::Query;
use crate::ingest::transport::{RawResponse, Transport};
use crate::model::FetchError;

#[derive(Debug, Clone)]
pub enum Scripted {
    Status(u16, &'static str),
    Timeout,
    Refused,
    Broken,
}

impl Scripted {
    pub fn json(body: &'static str) -> Self {
        Scripted::Status(200, body)
    }
}

/// Answers by full request URL (`url?query`); unknown URLs are refused.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: HashMap<String, Scripted>,
    requested: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, full_url: &str, answer: Scripted) -> Self {
        self.routes.insert(full_url.to_string(), answer);
        self
    }

    pub fn calls(&self) -> usize {
        self.requested.borrow().len()
    }

    pub fn calls_to(&self, full_url: &str) -> usize {
        self.requested.borrow().iter().filter(|u| *u == full_url).count()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str, query: &Query) -> Result<RawResponse, FetchError> {
        let full_url = if query.is_empty() {
            url.to_string()
        } else {
            format!("{}?{}", url, query.serialize())
        };
        self.requested.borrow_mut().push(full_url.clone());

        match self.routes.get(&full_url) {
            Some(Scripted::Status(status, body)) => Ok(RawResponse::new(*status, *body)),
            Some(Scripted::Timeout) => Err(FetchError::Timeout),
            Some(Scripted::Broken) => Err(FetchError::Transport("body stream reset".to_string())),
            Some(Scripted::Refused) | None => {
                Err(FetchError::Connection(format!("connection refused: {}", full_url)))
            }
        }
    }
}
