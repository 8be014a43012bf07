//! # Hasher Module
//!
//! Computes content fingerprints, one provider per strategy.
//!
//! ## Providers
//! - **Image** - DCT perceptual hash of the decoded picture
//! - **Video** - the same perceptual hash, taken from the first frame
//! - **Generic** - SHA-256 of the whole file
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_media_mover::core::hasher::Fingerprinter;
//!
//! let fingerprinter = Fingerprinter::new();
//! let fp = fingerprinter.fingerprint(&record)?;
//! ```

mod decode;
mod digest;
mod perceptual;
mod traits;
mod video;

pub use decode::ImageDecoder;
pub use digest::{Sha256Hasher, CHUNK_SIZE};
pub use perceptual::{PerceptualHasher, DEFAULT_HASH_SIZE};
pub use traits::{Fingerprint, HashProvider};
pub use video::FirstFrameHasher;

use crate::core::scanner::{FileRecord, FingerprintStrategy};
use crate::error::HashError;
use std::path::Path;

/// Routes each file to the provider for its strategy
pub struct Fingerprinter {
    image: Box<dyn HashProvider>,
    video: Box<dyn HashProvider>,
    generic: Box<dyn HashProvider>,
}

impl Fingerprinter {
    /// Default providers, with ffmpeg looked up on `PATH`
    pub fn new() -> Self {
        Self {
            image: Box::new(PerceptualHasher::default()),
            video: Box::new(FirstFrameHasher::default()),
            generic: Box::new(Sha256Hasher::new()),
        }
    }

    /// Use a specific ffmpeg executable for video frames
    pub fn with_ffmpeg(mut self, ffmpeg: impl AsRef<Path>) -> Self {
        self.video = Box::new(FirstFrameHasher::new(ffmpeg.as_ref()));
        self
    }

    /// Replace the provider for one strategy
    pub fn with_provider(
        mut self,
        strategy: FingerprintStrategy,
        provider: Box<dyn HashProvider>,
    ) -> Self {
        match strategy {
            FingerprintStrategy::Image => self.image = provider,
            FingerprintStrategy::Video => self.video = provider,
            FingerprintStrategy::Generic => self.generic = provider,
        }
        self
    }

    /// Fingerprint a classified file
    pub fn fingerprint(&self, record: &FileRecord) -> Result<Fingerprint, HashError> {
        self.provider(record.strategy).fingerprint(&record.path)
    }

    fn provider(&self, strategy: FingerprintStrategy) -> &dyn HashProvider {
        match strategy {
            FingerprintStrategy::Image => self.image.as_ref(),
            FingerprintStrategy::Video => self.video.as_ref(),
            FingerprintStrategy::Generic => self.generic.as_ref(),
        }
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}
