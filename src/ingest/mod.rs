/// Fetching and decoding of the home REST services.
///
/// Submodules:
/// - `transport` — the blocking HTTP seam.
/// - `cache` — per-operation memoization of responses.
/// - `rest` — safe fetch-and-decode into `Outcome`s.
/// - `svg` — graph passthrough.

pub mod cache;
pub mod rest;
pub mod svg;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheKey, CachedFetch, Query, ResponseCache};
pub use rest::{Payload, RestBackend, decode, decode_payload};
pub use svg::{EMPTY_SVG, Graphs, ProgressBarOptions, extract_svg};
pub use transport::{HttpTransport, RawResponse, Transport};
