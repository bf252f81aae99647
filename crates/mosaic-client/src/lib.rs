//! HTTP client surface for retrieving message fragments from a remote service.
//!
//! Exposes the [`FragmentFetcher`] seam between search orchestration and
//! transport, plus the [`HttpFetcher`] implementation over `reqwest`.
mod fetch;
mod types;

pub use fetch::{FragmentFetcher, HttpFetcher};
pub use types::{ClientError, Fragment};
