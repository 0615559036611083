pub mod cache;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod installer;
pub mod package;
pub mod report;
pub mod repository;

pub use cache::{cache_file_path, default_cache_root, CacheStore};
pub use config::{Credentials, ProxyConfig, SourceConfig};
pub use downloader::{ContentFetcher, FetchResult};
pub use error::{RestoreError, Result};
pub use installer::{
    ArchiveExtract, MaterializeOutcome, PackageInstaller, PackageMaterializer, StdTreeDelete,
    TreeDelete, ZipExtractor,
};
pub use package::{
    BytesContent, FileContent, PackageContent, PackageIdentity, PackageProvider, ResolvedPackage,
    PACKAGE_EXTENSION,
};
pub use report::{ConsoleReport, MemoryReport, NullReport, Report};
pub use repository::RemotePackageSource;
