//! First-frame fingerprinting for videos.
//!
//! Frame extraction is delegated to the `ffmpeg` executable: it decodes
//! exactly one video frame and writes it to stdout as PNG, which is then
//! hashed like any still image.

use super::decode::ImageDecoder;
use super::perceptual::PerceptualHasher;
use super::traits::{Fingerprint, HashProvider};
use crate::core::scanner::FingerprintStrategy;
use crate::error::HashError;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Hashes the first decodable frame of a video
pub struct FirstFrameHasher {
    ffmpeg: PathBuf,
    image_hasher: PerceptualHasher,
}

impl FirstFrameHasher {
    /// Use the given ffmpeg executable (a bare name is looked up on `PATH`)
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            image_hasher: PerceptualHasher::default(),
        }
    }

    /// Extract the first frame of `path` as PNG bytes
    fn extract_first_frame(&self, path: &Path) -> Result<Vec<u8>, HashError> {
        let output = Command::new(&self.ffmpeg)
            .args(["-nostdin", "-v", "error", "-i"])
            .arg(path)
            .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "-"])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| HashError::FrameExtraction {
                path: path.to_path_buf(),
                reason: format!("Failed to run {}: {}", self.ffmpeg.display(), e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HashError::FrameExtraction {
                path: path.to_path_buf(),
                reason: format!("ffmpeg exited with {}: {}", output.status, stderr.trim()),
            });
        }

        if output.stdout.is_empty() {
            return Err(HashError::FrameExtraction {
                path: path.to_path_buf(),
                reason: "no decodable video frames".to_string(),
            });
        }

        Ok(output.stdout)
    }
}

impl Default for FirstFrameHasher {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl HashProvider for FirstFrameHasher {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError> {
        // Unreadable files are read failures, not decode failures
        if let Err(e) = std::fs::File::open(path) {
            return Err(HashError::IoError {
                path: path.to_path_buf(),
                source: e,
            });
        }

        let frame = self.extract_first_frame(path)?;
        let image = ImageDecoder::decode_bytes(&frame, path)?;
        Ok(self.image_hasher.hash_image(&image))
    }

    fn strategy(&self) -> FingerprintStrategy {
        FingerprintStrategy::Video
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_ffmpeg_is_frame_extraction_error() {
        let temp_dir = TempDir::new().unwrap();
        let clip = temp_dir.path().join("clip.mp4");
        std::fs::write(&clip, b"not really a video").unwrap();

        let hasher = FirstFrameHasher::new(temp_dir.path().join("no-such-ffmpeg"));
        let result = hasher.fingerprint(&clip);

        assert!(matches!(result, Err(HashError::FrameExtraction { .. })));
    }

    #[test]
    fn unreadable_container_is_reported_not_hashed() {
        let temp_dir = TempDir::new().unwrap();
        let clip = temp_dir.path().join("clip.mkv");
        std::fs::write(&clip, b"").unwrap();

        // Fails whether or not ffmpeg is installed
        let result = FirstFrameHasher::default().fingerprint(&clip);
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = FirstFrameHasher::default().fingerprint(Path::new("/nonexistent/clip.mov"));
        assert!(matches!(result, Err(HashError::IoError { .. })));
    }
}
