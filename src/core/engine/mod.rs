//! # Engine Module
//!
//! Runs the whole deduplication workflow over one directory tree.
//!
//! ## Stages
//! 1. **Prepare** - validate the root, create the quarantine folder
//! 2. **Scan** - walk the tree and classify every file
//! 3. **Resolve** - for each file in order: fingerprint it, offer it to the
//!    registry, and move it into quarantine if the fingerprint was seen
//!
//! ## Sequencing
//! Files are processed strictly one after another, in traversal order.
//! First-seen-wins in the registry and collision-free naming in quarantine
//! both depend on that order.

mod runner;

pub use runner::{
    DedupConfig, Deduplicator, DeduplicatorBuilder, Relocation, RunReport, SkippedFile,
    DEFAULT_QUARANTINE_NAME,
};
