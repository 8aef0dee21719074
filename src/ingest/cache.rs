/// Operation-scoped response cache.
///
/// A page render asks for the same resource from several places (the
/// temperature list alone backs a dozen accessors). Within one operation
/// every distinct (URL, query) pair must hit the network exactly once, so
/// responses are memoized here regardless of status code. The cache is
/// created with the operation and dropped with it; it is never shared.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use url::form_urlencoded;

use crate::ingest::transport::{RawResponse, Transport};
use crate::model::FetchError;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Ordered query parameters of a GET.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds the parameter only when a value is present.
    pub fn with_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `application/x-www-form-urlencoded` form, in insertion order.
    pub fn serialize(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// URL plus serialized query. "No parameters" and an empty parameter set
/// produce the same request and therefore the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    url: String,
    query: String,
}

impl CacheKey {
    pub fn new(url: &str, query: &Query) -> Self {
        Self {
            url: url.to_string(),
            query: query.serialize(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Default)]
pub struct ResponseCache {
    responses: HashMap<CacheKey, RawResponse>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&RawResponse> {
        self.responses.get(key)
    }

    /// Returns the cached response, or runs `fetch` and stores its result.
    /// A failed `fetch` stores nothing.
    pub fn get_or_fetch<F>(&mut self, key: CacheKey, fetch: F) -> Result<&RawResponse, FetchError>
    where
        F: FnOnce() -> Result<RawResponse, FetchError>,
    {
        match self.responses.entry(key) {
            Entry::Occupied(entry) => {
                tracing::trace!(url = entry.key().url(), "response cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                tracing::debug!(url = entry.key().url(), "response cache miss");
                let response = fetch()?;
                Ok(entry.insert(response))
            }
        }
    }
}

/// A transport plus the cache of the operation it serves.
pub struct CachedFetch<T: Transport> {
    transport: T,
    cache: ResponseCache,
}

impl<T: Transport> CachedFetch<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: ResponseCache::new(),
        }
    }

    /// GET `url` with `query`, at most once per operation.
    ///
    /// Transport errors propagate unchanged and are not cached.
    pub fn fetch(&mut self, url: &str, query: &Query) -> Result<&RawResponse, FetchError> {
        let transport = &self.transport;
        self.cache
            .get_or_fetch(CacheKey::new(url, query), || transport.get(url, query))
    }

    pub fn cached_responses(&self) -> usize {
        self.cache.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
