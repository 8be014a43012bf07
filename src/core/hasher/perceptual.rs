//! Perceptual Hash (pHash) for still images.
//!
//! The image is reduced to grayscale, run through a DCT, and each low
//! frequency coefficient is compared against their mean. Re-encoding and
//! format conversion leave the hash unchanged.
//!
//! Hashing itself is delegated to the image_hasher crate.

use super::decode::ImageDecoder;
use super::traits::{Fingerprint, HashProvider};
use crate::core::scanner::FingerprintStrategy;
use crate::error::HashError;
use image::DynamicImage;
use image_hasher::{HashAlg, Hasher, HasherConfig};
use std::path::Path;

/// Default hash edge length (8x8 = 64 bits)
pub const DEFAULT_HASH_SIZE: u32 = 8;

/// DCT perceptual hasher
pub struct PerceptualHasher {
    hasher: Hasher,
}

impl PerceptualHasher {
    /// Create a pHash hasher producing `hash_size * hash_size` bits
    pub fn new(hash_size: u32) -> Self {
        let hasher = HasherConfig::new()
            .hash_size(hash_size, hash_size)
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .to_hasher();

        Self { hasher }
    }

    /// Hash an already-decoded image
    pub fn hash_image(&self, image: &DynamicImage) -> Fingerprint {
        Fingerprint::from_bytes(self.hasher.hash_image(image).as_bytes())
    }
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_SIZE)
    }
}

impl HashProvider for PerceptualHasher {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let image = ImageDecoder::decode(path)?;
        Ok(self.hash_image(&image))
    }

    fn strategy(&self) -> FingerprintStrategy {
        FingerprintStrategy::Image
    }
}
