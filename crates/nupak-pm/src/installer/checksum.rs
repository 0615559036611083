//! SHA-512 digests for materialized package archives.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha512};

/// Compute a base64-encoded SHA-512 digest over a reader.
pub fn sha512_base64(reader: &mut dyn Read) -> io::Result<String> {
    let mut hasher = Sha512::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(STANDARD.encode(hasher.finalize()))
}

/// Compute a base64-encoded SHA-512 digest over a file's bytes.
pub fn file_sha512(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    sha512_base64(&mut file)
}

/// Check a file against an expected base64-encoded SHA-512 digest.
///
/// The materializer itself never calls this: it records digests without
/// comparing them. Downstream consumers use it to check a raw copy against
/// its sidecar.
pub fn verify_file_sha512(path: &Path, expected: &str) -> io::Result<bool> {
    Ok(file_sha512(path)? == expected.trim())
}
