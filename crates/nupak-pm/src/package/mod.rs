//! Package identity and raw-content access.

use std::fmt;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File extension of a package archive.
pub const PACKAGE_EXTENSION: &str = ".nupkg";

/// Immutable name/version pair identifying a resolved package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub name: String,
    pub version: String,
}

impl PackageIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Directory name of the materialized package: `<name>.<version>`.
    pub fn directory_name(&self) -> String {
        format!("{}.{}", self.name, self.version)
    }

    /// File name of the raw archive copy: `<name>.<version>.nupkg`.
    pub fn archive_file_name(&self) -> String {
        format!("{}{}", self.directory_name(), PACKAGE_EXTENSION)
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Re-openable access to a package's raw bytes.
///
/// Every call to [`open`](PackageContent::open) yields a fresh, independent
/// reader positioned at the start, so extraction, raw copying, and hashing
/// can each take their own pass over the same logical content.
pub trait PackageContent: Send + Sync {
    fn open(&self) -> io::Result<Box<dyn Read + Send>>;
}

/// Package content backed by a file on disk.
pub struct FileContent {
    path: PathBuf,
}

impl FileContent {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PackageContent for FileContent {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(std::fs::File::open(&self.path)?))
    }
}

/// Package content held in memory.
pub struct BytesContent {
    bytes: Arc<[u8]>,
}

impl BytesContent {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into().into(),
        }
    }
}

impl PackageContent for BytesContent {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(self.bytes.clone())))
    }
}

/// A resolved package: its canonical identity plus raw-content access.
pub struct ResolvedPackage {
    pub identity: PackageIdentity,
    pub content: Box<dyn PackageContent>,
}

/// Resolution boundary: maps a requested (name, version) to a resolved
/// package with re-openable content.
#[async_trait]
pub trait PackageProvider: Send + Sync {
    async fn get(&self, name: &str, version: &str) -> Result<ResolvedPackage>;
}
