//! # Core Module
//!
//! The fingerprinting and duplicate-resolution engine.
//!
//! ## Modules
//! - `scanner` - Walks the tree and picks a fingerprint strategy per file
//! - `hasher` - Perceptual and cryptographic fingerprint providers
//! - `registry` - First-seen fingerprint to canonical path mapping
//! - `relocator` - Collision-safe moves into the quarantine folder
//! - `engine` - Orchestrates a run

pub mod engine;
pub mod hasher;
pub mod registry;
pub mod relocator;
pub mod scanner;

// Re-export commonly used types
pub use engine::{Deduplicator, RunReport};
pub use hasher::Fingerprint;
pub use registry::{FingerprintRegistry, Lookup};
pub use scanner::{FileRecord, FingerprintStrategy};
