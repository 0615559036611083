//! Package materialization.
//!
//! Expands a resolved package's archive onto disk and records its raw form
//! with an integrity digest alongside the extracted entries.

mod checksum;
mod extract;
mod installer;
mod materializer;

pub use checksum::{file_sha512, sha512_base64, verify_file_sha512};
pub use extract::{ArchiveExtract, StdTreeDelete, TreeDelete, ZipExtractor};
pub use installer::PackageInstaller;
pub use materializer::{MaterializeOutcome, PackageMaterializer};
