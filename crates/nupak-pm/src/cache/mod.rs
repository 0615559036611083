//! On-disk cache for downloaded source resources.
//!
//! Layout: `<cache_root>/<folder(source_origin)>/<sanitized(cache_key)>.dat`,
//! where the folder name is a digest of the source origin so entries from
//! different sources never collide.

mod path;
mod store;

pub use path::{cache_file_path, default_cache_root, sanitize_file_name, CACHE_FILE_EXTENSION};
pub use store::{file_age, CacheStore};
