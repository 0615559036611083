//! Installation orchestration: resolve content, then materialize it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::package::{PackageIdentity, PackageProvider};

use super::materializer::{MaterializeOutcome, PackageMaterializer};

/// Installs packages into a target store by asking a [`PackageProvider`] for
/// content and handing it to the materializer.
pub struct PackageInstaller {
    provider: Arc<dyn PackageProvider>,
    materializer: PackageMaterializer,
    target_root: PathBuf,
}

impl PackageInstaller {
    pub fn new(
        provider: Arc<dyn PackageProvider>,
        materializer: PackageMaterializer,
        target_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            provider,
            materializer,
            target_root: target_root.into(),
        }
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Check whether an identity is already materialized in the store.
    pub fn is_materialized(&self, identity: &PackageIdentity) -> bool {
        self.materializer
            .target_path(identity, &self.target_root)
            .exists()
    }

    /// Resolve and materialize a single package.
    ///
    /// Materialization itself is blocking for the duration of one package;
    /// distinct identities can be installed concurrently by separate callers.
    pub async fn install(
        &self,
        name: &str,
        version: &str,
        overwrite: bool,
    ) -> Result<MaterializeOutcome> {
        let resolved = self.provider.get(name, version).await?;
        self.materializer.materialize(
            &resolved.identity,
            resolved.content.as_ref(),
            &self.target_root,
            overwrite,
        )
    }
}
