//! Remote package source backed by the content fetcher.

use std::time::Duration;

use async_trait::async_trait;

use crate::downloader::ContentFetcher;
use crate::error::Result;
use crate::package::{FileContent, PackageIdentity, PackageProvider, ResolvedPackage};

/// Package source resolving archives from a flat-container feed layout:
/// `<base>/<id>/<version>/<id>.<version>.nupkg`, identifiers lowercased.
pub struct RemotePackageSource {
    fetcher: ContentFetcher,
    max_age: Duration,
}

impl RemotePackageSource {
    pub fn new(fetcher: ContentFetcher, max_age: Duration) -> Self {
        Self { fetcher, max_age }
    }

    fn cache_key(id: &str, version: &str) -> String {
        format!("nupkg-{}.{}", id, version)
    }

    fn resource_path(id: &str, version: &str) -> String {
        format!("{}/{}/{}.{}.nupkg", id, version, id, version)
    }
}

#[async_trait]
impl PackageProvider for RemotePackageSource {
    async fn get(&self, name: &str, version: &str) -> Result<ResolvedPackage> {
        let id = name.to_lowercase();
        let ver = version.to_lowercase();

        let url = self
            .fetcher
            .source()
            .resolve(&Self::resource_path(&id, &ver))?;
        let result = self
            .fetcher
            .fetch(url.as_str(), &Self::cache_key(&id, &ver), self.max_age)
            .await?;

        Ok(ResolvedPackage {
            identity: PackageIdentity::new(name, version),
            content: Box::new(FileContent::new(result.cache_file)),
        })
    }
}
