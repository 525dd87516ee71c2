//! Remote data fetchers
//!
//! Three resources are read from the judge: the contest list (JSON feed),
//! a contest's task list and each problem's statement page (both HTML).
//! Each one goes through [`fetcher::fetch_cached`], which consults the
//! [`CacheStore`](crate::cache::CacheStore) before touching the network.

pub mod client;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod scrape;
pub mod transport;

pub use client::{AtCoderClient, FetchOptions};
pub use error::{FetchError, Fragment, ParseError};
pub use fetcher::{Fetcher, ProblemRef, fetch_cached};
pub use models::{Contest, Problem, ProblemInfo, ProblemRecord, SampleTest};
pub use transport::{HttpConfig, HttpTransport, Transport};
