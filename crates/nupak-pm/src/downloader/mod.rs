//! Resource fetching with a freshness-governed disk cache.

mod fetcher;

pub use fetcher::{ContentFetcher, FetchResult};
