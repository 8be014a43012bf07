//! Event type definitions for progress reporting.

use crate::error::SkipKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted during a deduplication run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Traversal events
    Scan(ScanEvent),
    /// Per-file processing events
    File(FileEvent),
    /// Run-level events
    Run(RunEvent),
}

/// Events while walking the scan root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Walking has started
    Started { root: PathBuf },
    /// A directory entry could not be visited
    Error { path: PathBuf, message: String },
    /// Walking completed
    Completed { total_files: usize },
}

/// Events while fingerprinting and resolving files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FileEvent {
    /// Progress update
    Progress(FileProgress),
    /// First file seen with its fingerprint
    Registered { path: PathBuf },
    /// A duplicate was moved into quarantine
    Relocated {
        source: PathBuf,
        destination: PathBuf,
        canonical: PathBuf,
    },
    /// A file was left in place because processing failed
    Skipped {
        path: PathBuf,
        kind: SkipKind,
        message: String,
    },
}

/// Progress information while processing files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProgress {
    /// Number of files processed so far
    pub completed: usize,
    /// Total number of files to process
    pub total: usize,
    /// File currently being processed
    pub current_path: PathBuf,
}

/// Run-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    /// Quarantine is ready and traversal is about to begin
    Started { quarantine_dir: PathBuf },
    /// Run completed
    Completed { summary: RunSummary },
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files visited
    pub total_files: usize,
    /// Files kept as canonical
    pub canonical_count: usize,
    /// Duplicates moved (or planned, on a dry run)
    pub relocated_count: usize,
    /// Files left untouched because of an error
    pub skipped_count: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}
