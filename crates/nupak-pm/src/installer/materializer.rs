//! Laying a resolved package's contents onto disk.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::package::{PackageContent, PackageIdentity};
use crate::report::Report;

use super::checksum;
use super::extract::{ArchiveExtract, StdTreeDelete, TreeDelete, ZipExtractor};

/// Outcome of a materialize call.
#[derive(Debug)]
pub enum MaterializeOutcome {
    /// The package was expanded into the given directory.
    Materialized(PathBuf),
    /// An existing target was left untouched. A normal outcome, not an error.
    Skipped(PathBuf),
}

impl MaterializeOutcome {
    pub fn path(&self) -> &Path {
        match self {
            MaterializeOutcome::Materialized(path) | MaterializeOutcome::Skipped(path) => path,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, MaterializeOutcome::Skipped(_))
    }
}

/// Expands package archives into a target store and records an
/// integrity-verifiable raw copy alongside the extracted entries.
pub struct PackageMaterializer {
    extractor: Arc<dyn ArchiveExtract>,
    deleter: Arc<dyn TreeDelete>,
    report: Arc<dyn Report>,
}

impl PackageMaterializer {
    /// Materializer with the default zip extraction and delete collaborators.
    pub fn new(report: Arc<dyn Report>) -> Self {
        Self {
            extractor: Arc::new(ZipExtractor),
            deleter: Arc::new(StdTreeDelete),
            report,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn ArchiveExtract>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_deleter(mut self, deleter: Arc<dyn TreeDelete>) -> Self {
        self.deleter = deleter;
        self
    }

    /// Target directory for an identity under a store root.
    pub fn target_path(&self, identity: &PackageIdentity, target_root: &Path) -> PathBuf {
        target_root.join(identity.directory_name())
    }

    /// Materialize a package into `target_root`.
    ///
    /// An existing target is recursively deleted first when `overwrite` is
    /// allowed, and otherwise reported and returned as
    /// [`MaterializeOutcome::Skipped`].
    pub fn materialize(
        &self,
        identity: &PackageIdentity,
        content: &dyn PackageContent,
        target_root: &Path,
        overwrite: bool,
    ) -> Result<MaterializeOutcome> {
        let target = self.target_path(identity, target_root);

        if target.exists() {
            if !overwrite {
                log::debug!("Target {} exists, skipping", target.display());
                self.report
                    .writeln(&format!("Skipping {}, already materialized", identity));
                return Ok(MaterializeOutcome::Skipped(target));
            }
            self.deleter.delete(&target)?;
        }

        std::fs::create_dir_all(&target)?;

        self.extractor.extract(content.open()?, &target)?;

        let archive_path = target.join(identity.archive_file_name());
        let mut raw = content.open()?;
        let mut archive_file = File::create(&archive_path)?;
        std::io::copy(&mut raw, &mut archive_file)?;
        drop(archive_file);

        // The sidecar records the digest of the exact bytes at the raw-copy
        // path, so it is computed from the file as written.
        let digest = checksum::file_sha512(&archive_path)?;
        let sidecar_path = target.join(format!("{}.sha512", identity.archive_file_name()));
        std::fs::write(&sidecar_path, &digest)?;

        log::debug!("Materialized {} at {}", identity, target.display());
        self.report.writeln(&format!("Materialized {}", identity));

        Ok(MaterializeOutcome::Materialized(target))
    }
}
