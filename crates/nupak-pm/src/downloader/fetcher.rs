//! Cache-backed fetching of remote source resources.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::cache::{self, cache_file_path};
use crate::config::SourceConfig;
use crate::error::{RestoreError, Result};
use crate::http::HttpClient;
use crate::report::Report;

/// Outcome of a successful fetch: the file backing the content and an open
/// shared-read handle over it.
pub struct FetchResult {
    /// Path of the file holding the body. Inside the shared cache tree for a
    /// non-zero freshness window, an ephemeral temp location otherwise.
    pub cache_file: PathBuf,
    /// Open readable handle over the body.
    pub body: File,
}

/// Fetches remote resources, consulting and populating a disk cache.
pub struct ContentFetcher {
    client: HttpClient,
    source: SourceConfig,
    cache_root: PathBuf,
    report: Arc<dyn Report>,
}

impl ContentFetcher {
    pub fn new(
        source: SourceConfig,
        cache_root: impl Into<PathBuf>,
        report: Arc<dyn Report>,
    ) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(&source)?,
            source,
            cache_root: cache_root.into(),
            report,
        })
    }

    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Fetch a resource, serving it from the cache when the entry is younger
    /// than `max_age`.
    ///
    /// A zero `max_age` bypasses the cache entirely: the download lands in an
    /// ephemeral location outside the shared cache tree and nothing persists.
    ///
    /// The destination file is only ever replaced after a complete, flushed
    /// download, via a delete-then-rename of a uniquely-named temporary file
    /// created in the destination's own directory (keeping the rename on one
    /// filesystem; rename atomicity is the host filesystem's).
    pub async fn fetch(&self, url: &str, cache_key: &str, max_age: Duration) -> Result<FetchResult> {
        let cache_file = cache_file_path(
            &self.cache_root,
            self.source.base_address().as_str(),
            cache_key,
        );

        if !max_age.is_zero() {
            if let Some(folder) = cache_file.parent() {
                if !folder.exists() {
                    tokio::fs::create_dir_all(folder).await?;
                }
            }

            if let Some(age) = cache::file_age(&cache_file)? {
                if age < max_age {
                    log::debug!("Cache hit for {} (age {:?})", cache_key, age);
                    self.report.writeln(&format!("  CACHE {}", url));
                    let body = File::open(&cache_file).await?;
                    return Ok(FetchResult { cache_file, body });
                }
            }
        }

        let started = Instant::now();
        self.report.writeln(&format!("  GET {}", url));
        let response = self.client.get(url).await?;

        // With the cache bypassed, both the temporary file and the "final"
        // destination are throwaway temp files outside the cache tree.
        let destination = if max_age.is_zero() {
            ephemeral_destination()?
        } else {
            cache_file.clone()
        };

        let staging_dir = destination
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let staging = tempfile::Builder::new()
            .prefix(".fetch-")
            .suffix(".part")
            .tempfile_in(&staging_dir)?;
        let (staging_file, staging_path) = staging.into_parts();

        let mut writer = File::from_std(staging_file);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            writer.write_all(&chunk?).await?;
        }
        writer.flush().await?;
        writer.sync_all().await?;
        drop(writer);

        // The destructive replace is sequenced strictly after the flushed
        // write: a failure anywhere above leaves any previous entry intact.
        match tokio::fs::remove_file(&destination).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        staging_path
            .persist(&destination)
            .map_err(|e| RestoreError::Io(e.error))?;

        self.report.writeln(&format!(
            "  OK {} {}ms",
            url,
            started.elapsed().as_millis()
        ));

        let body = File::open(&destination).await?;
        Ok(FetchResult {
            cache_file: destination,
            body,
        })
    }
}

/// Unique throwaway destination in the platform temp location, used when the
/// freshness window is zero and the shared cache must not be touched.
fn ephemeral_destination() -> Result<PathBuf> {
    let placeholder = tempfile::Builder::new()
        .prefix("nupak-fetch-")
        .suffix(cache::CACHE_FILE_EXTENSION)
        .tempfile()?;
    let (file, path) = placeholder
        .keep()
        .map_err(|e| RestoreError::Io(e.error))?;
    drop(file);
    Ok(path)
}
