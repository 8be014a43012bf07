//! Fingerprint strategy selection by file extension.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Default extensions fingerprinted as still images
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

/// Default extensions fingerprinted by their first frame
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv"];

/// How a file is fingerprinted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FingerprintStrategy {
    /// Perceptual hash of the decoded image
    Image,
    /// Perceptual hash of the first decoded video frame
    Video,
    /// SHA-256 of the whole file
    Generic,
}

impl std::fmt::Display for FingerprintStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FingerprintStrategy::Image => write!(f, "image"),
            FingerprintStrategy::Video => write!(f, "video"),
            FingerprintStrategy::Generic => write!(f, "file"),
        }
    }
}

/// Maps file names to a [`FingerprintStrategy`].
///
/// Image extensions are checked first, then video; everything else is
/// generic. Matching is case-insensitive and never fails.
#[derive(Debug, Clone)]
pub struct StrategySelector {
    image_extensions: HashSet<String>,
    video_extensions: HashSet<String>,
}

impl StrategySelector {
    /// Create a selector with the default extension sets
    pub fn new() -> Self {
        Self {
            image_extensions: to_set(IMAGE_EXTENSIONS.iter().copied()),
            video_extensions: to_set(VIDEO_EXTENSIONS.iter().copied()),
        }
    }

    /// Override the image extension set
    pub fn with_image_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.image_extensions = to_set(extensions);
        self
    }

    /// Override the video extension set
    pub fn with_video_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.video_extensions = to_set(extensions);
        self
    }

    /// Pick the strategy for a path
    pub fn select(&self, path: &Path) -> FingerprintStrategy {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_lowercase(),
            None => return FingerprintStrategy::Generic,
        };

        if self.image_extensions.contains(&ext) {
            FingerprintStrategy::Image
        } else if self.video_extensions.contains(&ext) {
            FingerprintStrategy::Video
        } else {
            FingerprintStrategy::Generic
        }
    }
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self::new()
    }
}

fn to_set<I, S>(extensions: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
        .collect()
}
