//! HTTP transport for package source requests.

mod client;

pub use client::HttpClient;
