//! HTTP client for package source requests.
//!
//! Thin wrapper around `reqwest` that applies the source's basic-auth
//! credentials and proxy configuration. Deliberately performs a single
//! attempt per request: transport failures propagate to the caller
//! unretried.

use reqwest::{Client, Response};

use crate::config::{Credentials, SourceConfig};
use crate::error::{RestoreError, Result};

const DEFAULT_USER_AGENT: &str = concat!("nupak-pm/", env!("CARGO_PKG_VERSION"));

pub struct HttpClient {
    client: Client,
    credentials: Option<Credentials>,
}

impl HttpClient {
    /// Build a client for the given source configuration.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let mut builder = Client::builder().gzip(true).user_agent(DEFAULT_USER_AGENT);

        // Proxying is driven solely by the source configuration; the
        // transport's own environment sniffing stays off.
        match config.proxy() {
            Some(proxy) => {
                let mut transport_proxy = reqwest::Proxy::all(proxy.address.clone())?;
                if let Some(creds) = &proxy.credentials {
                    transport_proxy = transport_proxy.basic_auth(&creds.username, &creds.password);
                }
                builder = builder.proxy(transport_proxy);
            }
            None => {
                builder = builder.no_proxy();
            }
        }

        Ok(Self {
            client: builder.build()?,
            credentials: config.credentials().cloned(),
        })
    }

    /// Perform a GET request and verify the response status.
    ///
    /// Non-success statuses map to [`RestoreError::HttpStatus`].
    pub async fn get(&self, url: &str) -> Result<Response> {
        let mut request = self.client.get(url);

        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RestoreError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}
