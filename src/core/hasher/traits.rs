//! Trait definitions for fingerprint providers.

use crate::core::scanner::FingerprintStrategy;
use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Opaque content token. Two files with equal fingerprints are duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already-encoded fingerprint
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Encode raw hash bytes as lowercase hex
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes a fingerprint for one class of file.
///
/// Implementations are pure with respect to the run: they read the file and
/// nothing else.
pub trait HashProvider: Send + Sync {
    /// Fingerprint the file at `path`
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError>;

    /// The strategy this provider implements
    fn strategy(&self) -> FingerprintStrategy;
}
