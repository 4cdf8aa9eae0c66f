//! Streaming per-file content hashing.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::Digest as _;

use hashwatch_core::{Digest, HashAlgorithm, ScanError};

/// Read size per chunk. Files are streamed through the digest so memory
/// stays bounded regardless of file size.
const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the content digest of a single file.
///
/// The digest depends only on the file's bytes, never on its name,
/// timestamps, or permissions. Failures (permission denied, file vanished
/// between enumeration and read) are returned to the caller; the scan
/// engine downgrades them to warnings rather than aborting.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<Digest, ScanError> {
    let file = File::open(path).map_err(|e| ScanError::io(path, e))?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let mut buffer = vec![0u8; CHUNK_SIZE];

    match algorithm {
        HashAlgorithm::Blake3 => {
            let mut hasher = blake3::Hasher::new();
            loop {
                let n = reader.read(&mut buffer).map_err(|e| ScanError::io(path, e))?;
                if n == 0 {
                    break;
                }
                hasher.update(&buffer[..n]);
            }
            Ok(Digest::from_bytes(hasher.finalize().as_bytes()))
        }
        HashAlgorithm::Sha256 => {
            let mut hasher = sha2::Sha256::new();
            loop {
                let n = reader.read(&mut buffer).map_err(|e| ScanError::io(path, e))?;
                if n == 0 {
                    break;
                }
                hasher.update(&buffer[..n]);
            }
            Ok(Digest::from_bytes(&hasher.finalize()))
        }
    }
}
