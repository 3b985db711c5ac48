//! # Arcsum Digest Computer (`common::digest`)
//!
//! File: cli/src/common/digest.rs
//!
//! ## Overview
//!
//! Computes SHA-256 digests of file contents as 64-character lowercase hex
//! strings. Files are streamed through the hasher in reads of at most
//! `CHUNK_SIZE` bytes so memory use stays bounded no matter how large the file
//! is. The read buffer is sized to the file, capped at `CHUNK_SIZE`, so small
//! files do not pay for a full chunk. Chunking does not affect the result: a
//! streamed digest is identical to hashing the whole content in one call.
//!
use crate::core::error::{ArcsumError, Result};
use anyhow::Context;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Size of each read while hashing (8 MiB).
pub const CHUNK_SIZE: usize = 8 * 1024 * 1024;
/// Floor for the read buffer, so a file that grows while hashing is not read a byte at a time.
const MIN_BUFFER_LEN: usize = 8 * 1024;

/// Read buffer for a file of `file_len` bytes: never more than `CHUNK_SIZE`,
/// and no bigger than the file so small files stay cheap.
fn buffer_len_for(file_len: u64) -> usize {
    usize::try_from(file_len)
        .unwrap_or(CHUNK_SIZE)
        .clamp(MIN_BUFFER_LEN, CHUNK_SIZE)
}

/// Hashes everything `reader` yields, at most `buffer_len` bytes at a time.
pub fn digest_reader<R: Read>(mut reader: R, buffer_len: usize) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; buffer_len];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Returns the hex SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// `ArcsumError::NotFound` if the file does not exist, otherwise an I/O error
/// naming the file that could not be opened or read.
pub fn digest_file(path: &Path) -> Result<String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            anyhow::bail!(ArcsumError::NotFound {
                path: path.to_path_buf()
            })
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open file for hashing: {:?}", path))
        }
    };
    let file_len = file
        .metadata()
        .with_context(|| format!("Failed to read metadata for hashing: {:?}", path))?
        .len();
    digest_reader(file, buffer_len_for(file_len))
        .with_context(|| format!("Failed to read file for hashing: {:?}", path))
}
