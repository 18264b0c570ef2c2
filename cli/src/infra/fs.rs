//! Filesystem infrastructure: implements `LocalFs`, `FileHasher`, and
//! `SourcePatcher`.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::application::ports::{FileHasher, SourcePatcher};
use crate::domain::error::PatchError;

/// Production filesystem implementation.
pub struct LocalFs;

impl FileHasher for LocalFs {
    fn sha256_file(&self, path: &Path) -> Result<String> {
        sha256_file(path)
    }
}

impl SourcePatcher for LocalFs {
    fn prepend_line(&self, target: &Path, content: &str) -> Result<()> {
        prepend_line(target, content)
    }
}

impl crate::application::ports::LocalFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("removing directory {}", path.display()))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).with_context(|| format!("removing file {}", path.display()))
    }
}

/// Rewrite `target` with `content` as its first line.
///
/// Existing non-empty lines follow in their original order; every line,
/// including the last, ends with `\n`. Calling this twice stacks `content`.
///
/// # Errors
///
/// Returns [`PatchError::TargetNotFound`] if `target` does not exist, or an
/// I/O error if it cannot be read or written.
pub fn prepend_line(target: &Path, content: &str) -> Result<()> {
    let original = match std::fs::read_to_string(target) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PatchError::TargetNotFound(target.to_path_buf()).into());
        }
        Err(e) => {
            return Err(anyhow::Error::new(e).context(format!("reading {}", target.display())));
        }
    };
    let mut patched = String::with_capacity(content.len() + 1 + original.len());
    for line in std::iter::once(content).chain(original.lines().filter(|l| !l.is_empty())) {
        patched.push_str(line);
        patched.push('\n');
    }
    std::fs::write(target, patched).with_context(|| format!("writing {}", target.display()))
}

/// Compute the SHA256 hex digest of a file.
///
/// Reads the file in 64 KB chunks to avoid loading large files into memory.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 65536];
    loop {
        let n = file.read(&mut buf).context("reading file")?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex_encode(&hasher.finalize()))
}

fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}
