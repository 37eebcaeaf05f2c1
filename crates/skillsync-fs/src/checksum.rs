//! SHA-256 checksum utilities
//!
//! Provides a single canonical checksum format (`sha256:<hex>`) used throughout
//! the workspace for content comparison and drift detection. The directory
//! checksum is the comparison primitive shared by dry-run classification and
//! post-sync verification: both must agree on whether two trees are identical.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::{Error, Result};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of string content.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
pub fn compute_content_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of a file's contents.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

/// Compute a canonical checksum of an entire directory tree.
///
/// Hashes the sorted list of `(relative path, file checksum)` pairs into a
/// single digest, so two trees compare equal iff they contain the same
/// relative paths with the same contents. Empty directories are ignored;
/// a missing directory hashes like an empty one, so "no catalog copy yet"
/// and "empty upstream artifact" compare equal.
///
/// # Errors
///
/// Returns an error if any file in the tree cannot be read.
pub fn compute_dir_checksum(dir: &Path) -> Result<String> {
    let mut entries = Vec::new();
    if dir.is_dir() {
        collect_files(dir, dir, &mut entries)?;
    }
    entries.sort();

    let mut hasher = Sha256::new();
    for (rel, checksum) in &entries {
        hasher.update(rel.as_bytes());
        hasher.update([0u8]);
        hasher.update(checksum.as_bytes());
        hasher.update([0u8]);
    }
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<(String, String)>) -> Result<()> {
    for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, &path, out)?;
        } else {
            let rel = path
                .strip_prefix(root)
                .expect("entry is under root")
                .to_string_lossy()
                .replace('\\', "/");
            out.push((rel, compute_file_checksum(&path)?));
        }
    }
    Ok(())
}
