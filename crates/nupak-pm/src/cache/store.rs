//! Cache store maintenance: sizing, age checks, clearing, and expiry.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use walkdir::WalkDir;

/// Age of a file derived from its last-modified time.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn file_age(path: &Path) -> io::Result<Option<Duration>> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let modified = metadata.modified()?;
    Ok(SystemTime::now().duration_since(modified).ok())
}

/// Maintenance handle over a cache root directory.
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Total size of all cached files in bytes.
    pub fn size(&self) -> io::Result<u64> {
        let mut total = 0u64;

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if let Ok(metadata) = entry.metadata() {
                if metadata.is_file() {
                    total += metadata.len();
                }
            }
        }

        Ok(total)
    }

    /// Remove everything under the cache root.
    pub fn clear(&self) -> io::Result<()> {
        if !self.root.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }

        Ok(())
    }

    /// Remove cached files older than the given TTL.
    ///
    /// Returns the number of bytes freed.
    pub fn gc(&self, ttl: Duration) -> io::Result<u64> {
        let now = SystemTime::now();
        let mut freed = 0u64;

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            if let Ok(metadata) = fs::metadata(path) {
                if let Ok(modified) = metadata.modified() {
                    if let Ok(age) = now.duration_since(modified) {
                        if age > ttl {
                            let size = metadata.len();
                            if fs::remove_file(path).is_ok() {
                                freed += size;
                            }
                        }
                    }
                }
            }
        }

        Ok(freed)
    }
}
