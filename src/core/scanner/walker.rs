//! Directory walking implementation using walkdir.

use super::{FileRecord, ScanResult, StrategySelector};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Directory to leave out of the walk entirely
    pub exclude_dir: Option<PathBuf>,
    /// Extension policy
    pub selector: StrategySelector,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: true,
            exclude_dir: None,
            selector: StrategySelector::new(),
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Walk `root` without progress reporting
    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        self.scan_with_events(root, &crate::events::null_sender())
    }

    /// Walk `root`, collecting every regular file in file-name order.
    ///
    /// Fails only if `root` itself is missing or not a directory.
    pub fn scan_with_events(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        validate_root(root)?;

        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let mut files = Vec::new();
        let mut errors = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.should_descend(entry, root));

        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    let error = if e.io_error().map(io::Error::kind)
                        == Some(io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: io::Error::new(io::ErrorKind::Other, e.to_string()),
                        }
                    };

                    tracing::warn!(path = %path.display(), "{}", error);
                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    errors.push(error);
                    continue;
                }
            };

            // Directories and unfollowed symlinks carry no content of their own
            if !entry.file_type().is_file() {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => {
                    let path = entry.into_path();
                    let strategy = self.config.selector.select(&path);
                    tracing::debug!(path = %path.display(), %strategy, "classified");
                    files.push(FileRecord {
                        path,
                        size: metadata.len(),
                        strategy,
                    });
                }
                Err(e) => {
                    let error = ScanError::ReadDirectory {
                        path: entry.path().to_path_buf(),
                        source: io::Error::new(io::ErrorKind::Other, e.to_string()),
                    };
                    events.send(Event::Scan(ScanEvent::Error {
                        path: entry.path().to_path_buf(),
                        message: error.to_string(),
                    }));
                    errors.push(error);
                }
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_files: files.len(),
        }));

        Ok(ScanResult { files, errors })
    }

    fn should_descend(&self, entry: &DirEntry, root: &Path) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        if let Some(ref excluded) = self.config.exclude_dir {
            if entry.path() == excluded.as_path() {
                return false;
            }
        }

        if !self.config.include_hidden && is_hidden(entry) && entry.path() != root {
            return false;
        }

        true
    }
}

/// Check that `root` exists and is a directory
pub fn validate_root(root: &Path) -> Result<(), ScanError> {
    match root.metadata() {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ScanError::DirectoryNotFound {
            path: root.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            Err(ScanError::PermissionDenied {
                path: root.to_path_buf(),
            })
        }
        Err(e) => Err(ScanError::ReadDirectory {
            path: root.to_path_buf(),
            source: e,
        }),
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::super::FingerprintStrategy;
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"content").unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::new(ScanConfig::default());

        let result = scanner.scan(temp_dir.path()).unwrap();

        assert!(result.files.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_classifies_every_file() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "photo.jpg");
        touch(temp_dir.path(), "clip.MOV");
        touch(temp_dir.path(), "notes.txt");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        let strategies: Vec<_> = result.files.iter().map(|f| f.strategy).collect();
        assert_eq!(
            strategies,
            vec![
                FingerprintStrategy::Video,
                FingerprintStrategy::Generic,
                FingerprintStrategy::Image,
            ]
        );
    }

    #[test]
    fn scan_traverses_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        touch(temp_dir.path(), "root.txt");
        touch(&nested, "deep.txt");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(result.files.len(), 2);
    }

    #[test]
    fn scan_skips_excluded_directory() {
        let temp_dir = TempDir::new().unwrap();
        let quarantine = temp_dir.path().join("Duplicates");
        fs::create_dir(&quarantine).unwrap();
        touch(&quarantine, "old.jpg");
        touch(temp_dir.path(), "new.jpg");

        let config = ScanConfig {
            exclude_dir: Some(quarantine),
            ..Default::default()
        };
        let result = WalkDirScanner::new(config).scan(temp_dir.path()).unwrap();

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].path.ends_with("new.jpg"));
    }

    #[test]
    fn scan_includes_hidden_files_by_default() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "visible.txt");
        touch(temp_dir.path(), ".hidden.txt");

        let result = WalkDirScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();

        assert_eq!(result.files.len(), 2);
    }

    #[test]
    fn scan_can_skip_hidden_entries() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "visible.txt");
        touch(temp_dir.path(), ".hidden.txt");
        let hidden_dir = temp_dir.path().join(".cache");
        fs::create_dir(&hidden_dir).unwrap();
        touch(&hidden_dir, "inside.txt");

        let config = ScanConfig {
            include_hidden: false,
            ..Default::default()
        };
        let result = WalkDirScanner::new(config).scan(temp_dir.path()).unwrap();

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].path.ends_with("visible.txt"));
    }

    #[test]
    fn scan_records_file_size() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "seven.txt");

        let result = WalkDirScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();

        assert_eq!(result.files[0].size, 7);
    }

    #[test]
    fn scan_nonexistent_directory_is_fatal() {
        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(Path::new("/nonexistent/path/12345"));

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }

    #[test]
    fn scan_of_a_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let file = touch(temp_dir.path(), "plain.txt");

        let result = WalkDirScanner::new(ScanConfig::default()).scan(&file);

        assert!(matches!(result, Err(ScanError::NotADirectory { .. })));
    }
}
