//! Archive extraction and recursive-delete collaborators.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::{RestoreError, Result};

/// Archive expansion boundary: writes an archive's structured entries into
/// a destination directory.
pub trait ArchiveExtract: Send + Sync {
    fn extract(&self, reader: Box<dyn Read + Send>, destination: &Path) -> Result<()>;
}

/// Recursive delete boundary.
pub trait TreeDelete: Send + Sync {
    fn delete(&self, path: &Path) -> Result<()>;
}

/// Recursive delete via the standard library.
pub struct StdTreeDelete;

impl TreeDelete for StdTreeDelete {
    fn delete(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path)?;
        Ok(())
    }
}

/// Extractor for zip-structured package archives.
pub struct ZipExtractor;

impl ArchiveExtract for ZipExtractor {
    fn extract(&self, mut reader: Box<dyn Read + Send>, destination: &Path) -> Result<()> {
        // Zip central directories need seeking; buffer the stream once.
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;

        let mut archive = zip::ZipArchive::new(Cursor::new(buffer))
            .map_err(|e| RestoreError::Extraction(format!("failed to open archive: {}", e)))?;

        std::fs::create_dir_all(destination)?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| RestoreError::Extraction(format!("failed to read entry: {}", e)))?;

            // enclosed_name rejects entries that would escape the destination
            let Some(relative) = entry.enclosed_name() else {
                return Err(RestoreError::Extraction(format!(
                    "path traversal detected in archive: {}",
                    entry.name()
                )));
            };
            let outpath = destination.join(relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&outpath)?;
                continue;
            }

            if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let mut outfile = File::create(&outpath)?;
            std::io::copy(&mut entry, &mut outfile)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
                }
            }
        }

        Ok(())
    }
}
