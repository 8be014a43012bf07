//! # Error Module
//!
//! Error types for the duplicate media mover.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-file vs. fatal** - only setup failures end a run; everything
//!   else becomes a skipped file on the report

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a run. Per-file failures never reach this type; they
/// are recorded as skipped files instead.
#[derive(Error, Debug)]
pub enum DedupError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Relocation error: {0}")]
    Relocate(#[from] RelocateError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while walking the scan root
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while fingerprinting a file
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Failed to extract first frame of {path}: {reason}")]
    FrameExtraction { path: PathBuf, reason: String },

    #[error("Failed to read file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while moving a duplicate into quarantine
#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("Failed to create quarantine directory {path}: {source}")]
    QuarantineSetup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File has no usable name: {path}")]
    InvalidName { path: PathBuf },

    #[error("No free name left in {dir}")]
    NoFreeName { dir: PathBuf },

    #[error("Failed to move {from} to {to}: {source}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Classification of a per-file failure, as reported on the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipKind {
    /// Image or video could not be decoded
    Decode,
    /// File could not be opened or read
    Read,
    /// Duplicate could not be moved into quarantine
    Move,
    /// Directory entry could not be visited
    Walk,
}

impl HashError {
    /// Which skip bucket this failure belongs to
    pub fn skip_kind(&self) -> SkipKind {
        match self {
            HashError::IoError { .. } => SkipKind::Read,
            HashError::DecodeError { .. }
            | HashError::EmptyImage { .. }
            | HashError::FrameExtraction { .. } => SkipKind::Decode,
        }
    }
}

impl std::fmt::Display for SkipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipKind::Decode => write!(f, "decode"),
            SkipKind::Read => write!(f, "read"),
            SkipKind::Move => write!(f, "move"),
            SkipKind::Walk => write!(f, "walk"),
        }
    }
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DedupError>;
