//! # Scanner Module
//!
//! Walks the scan root and classifies every regular file.
//!
//! ## Classification
//! - Images (.jpg, .jpeg, .png, .gif, .bmp) - perceptual hash
//! - Videos (.mp4, .avi, .mov, .mkv) - perceptual hash of the first frame
//! - Everything else - SHA-256 of the contents
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_media_mover::core::scanner::{ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(Path::new("/Users/me/Pictures"))?;
//! ```

mod selector;
mod walker;

pub use selector::{FingerprintStrategy, StrategySelector, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
pub use walker::{validate_root, ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file discovered under the scan root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// How the file will be fingerprinted
    pub strategy: FingerprintStrategy,
}

/// Result of walking the scan root
#[derive(Debug)]
pub struct ScanResult {
    /// Files to process, in traversal order
    pub files: Vec<FileRecord>,
    /// Entries that could not be visited (non-fatal)
    pub errors: Vec<ScanError>,
}
