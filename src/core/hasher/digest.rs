//! SHA-256 fingerprints for files with no perceptual meaning.

use super::traits::{Fingerprint, HashProvider};
use crate::core::scanner::FingerprintStrategy;
use crate::error::HashError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Read size for streaming a file through the digest
pub const CHUNK_SIZE: usize = 8192;

/// Whole-file SHA-256 hasher
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl HashProvider for Sha256Hasher {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let io_error = |source: std::io::Error| HashError::IoError {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; CHUNK_SIZE];

        loop {
            let read = reader.read(&mut buffer).map_err(io_error)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(Fingerprint::from_bytes(&hasher.finalize()))
    }

    fn strategy(&self) -> FingerprintStrategy {
        FingerprintStrategy::Generic
    }
}
