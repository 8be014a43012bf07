//! # Registry Module
//!
//! Remembers the first file seen for every fingerprint during a run.
//!
//! The registry only grows: an entry is written once and never replaced or
//! removed, so the canonical file for a fingerprint is always the first one
//! offered. It lives for a single run and is owned by the engine.

use crate::core::hasher::Fingerprint;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Outcome of offering a file to the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// First file with this fingerprint; it is now canonical
    Registered,
    /// Fingerprint already taken by `of`
    Duplicate { of: PathBuf },
}

/// Fingerprint to canonical path mapping
#[derive(Debug, Default)]
pub struct FingerprintRegistry {
    entries: HashMap<Fingerprint, PathBuf>,
}

impl FingerprintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` under `fingerprint` unless the fingerprint is known.
    pub fn lookup_or_register(&mut self, fingerprint: Fingerprint, path: &Path) -> Lookup {
        match self.entries.entry(fingerprint) {
            Entry::Occupied(existing) => Lookup::Duplicate {
                of: existing.get().clone(),
            },
            Entry::Vacant(slot) => {
                slot.insert(path.to_path_buf());
                Lookup::Registered
            }
        }
    }

    /// Canonical path for a fingerprint, if any
    pub fn canonical(&self, fingerprint: &Fingerprint) -> Option<&Path> {
        self.entries.get(fingerprint).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
