//! Cache path derivation.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use sha1::{Digest, Sha1};

/// Extension given to every cache entry file.
pub const CACHE_FILE_EXTENSION: &str = ".dat";

/// Number of trailing origin characters kept as a legibility marker.
const ORIGIN_MARKER_LEN: usize = 32;

fn invalid_chars_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#"[\\/:*?"<>|\x00-\x1f]"#).unwrap())
}

fn underscore_runs_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new("_{2,}").unwrap())
}

/// Make a string safe for use as a file name on all supported platforms.
///
/// Characters invalid in file names are replaced with `_`; runs of
/// consecutive underscores are collapsed to a single one.
pub fn sanitize_file_name(value: &str) -> String {
    let replaced = invalid_chars_regex().replace_all(value, "_");
    underscore_runs_regex().replace_all(&replaced, "_").into_owned()
}

/// Folder name for a source origin: SHA-1 of the origin as lowercase hex,
/// suffixed with the origin's tail so the folder stays partially legible.
fn source_folder_name(source_origin: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(source_origin.as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    let char_count = source_origin.chars().count();
    let marker: String = source_origin
        .chars()
        .skip(char_count.saturating_sub(ORIGIN_MARKER_LEN))
        .collect();

    sanitize_file_name(&format!("{}${}", digest, marker))
}

/// Compute the on-disk cache file path for a (source origin, cache key) pair.
///
/// Pure and total over any input strings; identical inputs always map to an
/// identical path.
pub fn cache_file_path(cache_root: &Path, source_origin: &str, cache_key: &str) -> PathBuf {
    let file_name = format!("{}{}", sanitize_file_name(cache_key), CACHE_FILE_EXTENSION);
    cache_root.join(source_folder_name(source_origin)).join(file_name)
}

/// Default per-tool cache root in the platform's local data location.
pub fn default_cache_root() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "nupak")
        .map(|dirs| dirs.cache_dir().join("http-cache"))
}
