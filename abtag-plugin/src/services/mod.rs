//! Service modules for AcousticBrainz enrichment
//!
//! - `acousticbrainz_fetcher`: per-track lookup and response handling
//! - `http_webservice`: reqwest-backed [`WebService`](crate::host::WebService)

pub mod acousticbrainz_fetcher;
pub mod http_webservice;

pub use acousticbrainz_fetcher::{AcousticBrainzFetcher, Endpoint};
pub use http_webservice::HttpWebService;
