//! Deduplication run implementation.

use crate::core::hasher::Fingerprinter;
use crate::core::registry::{FingerprintRegistry, Lookup};
use crate::core::relocator::Relocator;
use crate::core::scanner::{
    validate_root, FileRecord, FingerprintStrategy, ScanConfig, StrategySelector, WalkDirScanner,
};
use crate::error::{DedupError, HashError, RelocateError, ScanError, SkipKind};
use crate::events::{
    null_sender, Event, EventSender, FileEvent, FileProgress, RunEvent, RunSummary,
};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

/// Name of the quarantine folder created under the scan root
pub const DEFAULT_QUARANTINE_NAME: &str = "Duplicates";

/// A duplicate that was moved (or, on a dry run, would be moved)
#[derive(Debug, Clone, Serialize)]
pub struct Relocation {
    /// Where the duplicate was found
    pub source: PathBuf,
    /// Where it was moved to
    pub destination: PathBuf,
    /// The first file seen with the same fingerprint
    pub canonical: PathBuf,
    pub size: u64,
    pub strategy: FingerprintStrategy,
}

/// A file left in place because it could not be processed
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub kind: SkipKind,
    pub reason: String,
}

/// Result of a deduplication run
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub quarantine_dir: PathBuf,
    /// Files visited, excluding anything already in quarantine
    pub total_files: usize,
    /// Distinct fingerprints seen
    pub canonical_count: usize,
    pub relocations: Vec<Relocation>,
    pub skipped: Vec<SkippedFile>,
    pub dry_run: bool,
    pub duration_ms: u64,
}

impl RunReport {
    /// True when every file was either kept or relocated
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Bytes moved out of the scanned tree
    pub fn relocated_bytes(&self) -> u64 {
        self.relocations.iter().map(|r| r.size).sum()
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            total_files: self.total_files,
            canonical_count: self.canonical_count,
            relocated_count: self.relocations.len(),
            skipped_count: self.skipped.len(),
            duration_ms: self.duration_ms,
        }
    }
}

/// Configuration for a run
#[derive(Debug, Clone)]
pub struct DedupConfig {
    /// Directory to deduplicate
    pub root: PathBuf,
    /// Folder name for duplicates, directly under `root`
    pub quarantine_name: String,
    /// Walker configuration
    pub scan_config: ScanConfig,
    /// Only plan relocations
    pub dry_run: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            quarantine_name: DEFAULT_QUARANTINE_NAME.to_string(),
            scan_config: ScanConfig::default(),
            dry_run: false,
        }
    }
}

/// Builder for [`Deduplicator`]
pub struct DeduplicatorBuilder {
    config: DedupConfig,
    fingerprinter: Option<Fingerprinter>,
    ffmpeg: Option<PathBuf>,
}

impl DeduplicatorBuilder {
    pub fn new() -> Self {
        Self {
            config: DedupConfig::default(),
            fingerprinter: None,
            ffmpeg: None,
        }
    }

    /// Directory to deduplicate
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Name of the quarantine folder under the root
    pub fn quarantine_name(mut self, name: impl Into<String>) -> Self {
        self.config.quarantine_name = name.into();
        self
    }

    /// Process hidden files and descend into hidden directories
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Follow symbolic links while walking
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.scan_config.follow_symlinks = follow;
        self
    }

    /// Override the extension policy
    pub fn selector(mut self, selector: StrategySelector) -> Self {
        self.config.scan_config.selector = selector;
        self
    }

    /// ffmpeg executable used for video frames
    pub fn ffmpeg(mut self, ffmpeg: impl Into<PathBuf>) -> Self {
        self.ffmpeg = Some(ffmpeg.into());
        self
    }

    /// Replace the fingerprint providers entirely
    pub fn fingerprinter(mut self, fingerprinter: Fingerprinter) -> Self {
        self.fingerprinter = Some(fingerprinter);
        self
    }

    /// Plan relocations without touching the filesystem
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    pub fn build(self) -> Deduplicator {
        let fingerprinter = match (self.fingerprinter, self.ffmpeg) {
            (Some(fingerprinter), _) => fingerprinter,
            (None, Some(ffmpeg)) => Fingerprinter::new().with_ffmpeg(ffmpeg),
            (None, None) => Fingerprinter::new(),
        };

        Deduplicator {
            config: self.config,
            fingerprinter,
        }
    }
}

impl Default for DeduplicatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened to a single file
enum FileOutcome {
    Registered,
    Relocated {
        destination: PathBuf,
        canonical: PathBuf,
    },
    HashFailed(HashError),
    MoveFailed {
        canonical: PathBuf,
        error: RelocateError,
    },
}

/// Sequential fingerprint-and-quarantine engine
pub struct Deduplicator {
    config: DedupConfig,
    fingerprinter: Fingerprinter,
}

impl Deduplicator {
    pub fn builder() -> DeduplicatorBuilder {
        DeduplicatorBuilder::new()
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Absolute location of the quarantine folder
    pub fn quarantine_dir(&self) -> PathBuf {
        self.config.root.join(&self.config.quarantine_name)
    }

    /// Run without events
    pub fn run(&self) -> Result<RunReport, DedupError> {
        self.run_with_events(&null_sender())
    }

    /// Run with event reporting.
    ///
    /// Returns an error only for setup failures: bad configuration, a
    /// missing root, or a quarantine folder that cannot be created. Every
    /// per-file failure ends up in [`RunReport::skipped`].
    pub fn run_with_events(&self, events: &EventSender) -> Result<RunReport, DedupError> {
        let start_time = Instant::now();

        validate_quarantine_name(&self.config.quarantine_name)?;
        validate_root(&self.config.root)?;

        let quarantine_dir = self.quarantine_dir();
        let mut relocator = if self.config.dry_run {
            Relocator::dry_run(&quarantine_dir)
        } else {
            Relocator::prepare(&quarantine_dir)?
        };

        tracing::info!(
            root = %self.config.root.display(),
            quarantine = %quarantine_dir.display(),
            dry_run = self.config.dry_run,
            "starting deduplication"
        );
        events.send(Event::Run(RunEvent::Started {
            quarantine_dir: quarantine_dir.clone(),
        }));

        let scan_config = ScanConfig {
            exclude_dir: Some(quarantine_dir.clone()),
            ..self.config.scan_config.clone()
        };
        let scan_result = WalkDirScanner::new(scan_config).scan_with_events(&self.config.root, events)?;

        let mut skipped: Vec<SkippedFile> = scan_result
            .errors
            .iter()
            .map(|error| SkippedFile {
                path: scan_error_path(error),
                kind: SkipKind::Walk,
                reason: error.to_string(),
            })
            .collect();

        let files = scan_result.files;
        let total_files = files.len();
        let mut registry = FingerprintRegistry::new();
        let mut relocations = Vec::new();

        for (index, record) in files.iter().enumerate() {
            events.send(Event::File(FileEvent::Progress(FileProgress {
                completed: index + 1,
                total: total_files,
                current_path: record.path.clone(),
            })));

            match self.process_file(record, &mut registry, &mut relocator) {
                FileOutcome::Registered => {
                    tracing::debug!(path = %record.path.display(), "registered as canonical");
                    events.send(Event::File(FileEvent::Registered {
                        path: record.path.clone(),
                    }));
                }
                FileOutcome::Relocated {
                    destination,
                    canonical,
                } => {
                    tracing::info!(
                        path = %record.path.display(),
                        destination = %destination.display(),
                        canonical = %canonical.display(),
                        "duplicate {} relocated",
                        record.strategy
                    );
                    events.send(Event::File(FileEvent::Relocated {
                        source: record.path.clone(),
                        destination: destination.clone(),
                        canonical: canonical.clone(),
                    }));
                    relocations.push(Relocation {
                        source: record.path.clone(),
                        destination,
                        canonical,
                        size: record.size,
                        strategy: record.strategy,
                    });
                }
                FileOutcome::HashFailed(error) => {
                    skipped.push(self.skip(record, error.skip_kind(), error.to_string(), events));
                }
                FileOutcome::MoveFailed { canonical, error } => {
                    let reason = format!("duplicate of {}: {}", canonical.display(), error);
                    skipped.push(self.skip(record, SkipKind::Move, reason, events));
                }
            }
        }

        let report = RunReport {
            root: self.config.root.clone(),
            quarantine_dir,
            total_files,
            canonical_count: registry.len(),
            relocations,
            skipped,
            dry_run: self.config.dry_run,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        tracing::info!(
            files = report.total_files,
            relocated = report.relocations.len(),
            skipped = report.skipped.len(),
            "deduplication complete"
        );
        events.send(Event::Run(RunEvent::Completed {
            summary: report.summary(),
        }));

        Ok(report)
    }

    /// Classify, hash, look up and, for duplicates, relocate one file.
    ///
    /// A failed move leaves the registry untouched: the canonical file
    /// stays canonical and later files with the same fingerprint are
    /// still treated as its duplicates.
    fn process_file(
        &self,
        record: &FileRecord,
        registry: &mut FingerprintRegistry,
        relocator: &mut Relocator,
    ) -> FileOutcome {
        let fingerprint = match self.fingerprinter.fingerprint(record) {
            Ok(fingerprint) => fingerprint,
            Err(error) => return FileOutcome::HashFailed(error),
        };

        match registry.lookup_or_register(fingerprint, &record.path) {
            Lookup::Registered => FileOutcome::Registered,
            Lookup::Duplicate { of } => match relocator.relocate(&record.path) {
                Ok(destination) => FileOutcome::Relocated {
                    destination,
                    canonical: of,
                },
                Err(error) => FileOutcome::MoveFailed {
                    canonical: of,
                    error,
                },
            },
        }
    }

    fn skip(
        &self,
        record: &FileRecord,
        kind: SkipKind,
        reason: String,
        events: &EventSender,
    ) -> SkippedFile {
        tracing::warn!(path = %record.path.display(), %kind, "skipped: {}", reason);
        events.send(Event::File(FileEvent::Skipped {
            path: record.path.clone(),
            kind,
            message: reason.clone(),
        }));

        SkippedFile {
            path: record.path.clone(),
            kind,
            reason,
        }
    }
}

fn validate_quarantine_name(name: &str) -> Result<(), DedupError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(DedupError::Config(format!(
            "quarantine folder name must be a single directory name, got {:?}",
            name
        ))),
    }
}

fn scan_error_path(error: &ScanError) -> PathBuf {
    match error {
        ScanError::DirectoryNotFound { path }
        | ScanError::NotADirectory { path }
        | ScanError::PermissionDenied { path }
        | ScanError::ReadDirectory { path, .. } => path.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::{Fingerprint, HashProvider};
    use std::fs;
    use tempfile::TempDir;

    /// Fingerprints a file by its first line, so tests can pick collisions
    struct FirstLine;

    impl HashProvider for FirstLine {
        fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError> {
            let content = fs::read_to_string(path).map_err(|e| HashError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(Fingerprint::new(content.lines().next().unwrap_or_default()))
        }

        fn strategy(&self) -> FingerprintStrategy {
            FingerprintStrategy::Generic
        }
    }

    /// Like [`FirstLine`], but `locked.*` cannot be opened
    struct LockedFiles;

    impl HashProvider for LockedFiles {
        fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError> {
            let locked = path
                .file_stem()
                .map(|stem| stem == "locked")
                .unwrap_or(false);
            if locked {
                return Err(HashError::IoError {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "permission denied",
                    ),
                });
            }
            FirstLine.fingerprint(path)
        }

        fn strategy(&self) -> FingerprintStrategy {
            FingerprintStrategy::Generic
        }
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn first_line_dedup(root: &Path) -> Deduplicator {
        Deduplicator::builder()
            .root(root)
            .fingerprinter(
                Fingerprinter::new()
                    .with_provider(FingerprintStrategy::Generic, Box::new(FirstLine)),
            )
            .build()
    }

    #[test]
    fn builder_defaults() {
        let dedup = Deduplicator::builder().root("/photos").build();

        assert_eq!(dedup.config().quarantine_name, "Duplicates");
        assert_eq!(dedup.quarantine_dir(), PathBuf::from("/photos/Duplicates"));
        assert!(!dedup.config().dry_run);
        assert!(dedup.config().scan_config.include_hidden);
    }

    #[test]
    fn first_seen_wins_across_the_run() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a.txt", "f1\nfirst");
        write(root, "b.txt", "f1\nsecond");
        write(root, "c.txt", "f2");
        write(root, "d.txt", "f1\nfourth");

        let report = first_line_dedup(root).run().unwrap();

        assert_eq!(report.total_files, 4);
        assert_eq!(report.canonical_count, 2);
        assert!(report.is_clean());
        let moved: Vec<_> = report.relocations.iter().map(|r| r.source.clone()).collect();
        assert_eq!(moved, vec![root.join("b.txt"), root.join("d.txt")]);
        for relocation in &report.relocations {
            assert_eq!(relocation.canonical, root.join("a.txt"));
        }
        assert!(root.join("a.txt").exists());
        assert!(root.join("c.txt").exists());
        assert!(root.join("Duplicates").join("b.txt").exists());
        assert!(root.join("Duplicates").join("d.txt").exists());
    }

    #[test]
    fn failed_move_keeps_original_canonical() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = write(root, "a.txt", "same");
        let b = write(root, "b.txt", "same");
        let c = write(root, "c.txt", "same");

        let dedup = first_line_dedup(root);
        let quarantine = root.join("Duplicates");
        let mut relocator = Relocator::prepare(&quarantine).unwrap();
        let mut registry = FingerprintRegistry::new();
        let record = |path: &Path| FileRecord {
            path: path.to_path_buf(),
            size: 4,
            strategy: FingerprintStrategy::Generic,
        };

        assert!(matches!(
            dedup.process_file(&record(&a), &mut registry, &mut relocator),
            FileOutcome::Registered
        ));

        fs::remove_dir(&quarantine).unwrap();
        match dedup.process_file(&record(&b), &mut registry, &mut relocator) {
            FileOutcome::MoveFailed { canonical, .. } => assert_eq!(canonical, a),
            _ => panic!("expected the move to fail"),
        }
        assert!(b.exists());

        fs::create_dir(&quarantine).unwrap();
        match dedup.process_file(&record(&c), &mut registry, &mut relocator) {
            FileOutcome::Relocated { canonical, destination } => {
                assert_eq!(canonical, a);
                assert_eq!(destination, quarantine.join("c.txt"));
            }
            _ => panic!("expected a relocation"),
        }
    }

    #[test]
    fn failed_read_is_skipped_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a.txt", "dup");
        let locked = write(root, "locked.txt", "dup");
        write(root, "z.txt", "dup");

        let report = Deduplicator::builder()
            .root(root)
            .fingerprinter(
                Fingerprinter::new()
                    .with_provider(FingerprintStrategy::Generic, Box::new(LockedFiles)),
            )
            .build()
            .run()
            .unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, locked);
        assert_eq!(report.skipped[0].kind, SkipKind::Read);
        assert!(locked.exists());
        assert_eq!(report.relocations.len(), 1);
        assert_eq!(report.relocations[0].source, root.join("z.txt"));
        assert_eq!(report.canonical_count, 1);
    }

    #[test]
    fn existing_quarantine_is_not_rescanned() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let quarantine = root.join("Duplicates");
        fs::create_dir(&quarantine).unwrap();
        write(&quarantine, "x.txt", "dup");
        write(root, "x.txt", "dup");
        write(root, "y.txt", "dup");

        let report = first_line_dedup(root).run().unwrap();

        assert_eq!(report.total_files, 2);
        assert_eq!(report.relocations.len(), 1);
        assert_eq!(report.relocations[0].destination, quarantine.join("y.txt"));
        assert_eq!(fs::read_to_string(quarantine.join("x.txt")).unwrap(), "dup");
    }

    #[test]
    fn dry_run_moves_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a.txt", "dup");
        write(root, "b.txt", "dup");

        let dedup = Deduplicator::builder().root(root).dry_run(true).build();
        let report = dedup.run().unwrap();

        assert!(report.dry_run);
        assert_eq!(report.relocations.len(), 1);
        assert_eq!(report.relocations[0].destination, root.join("Duplicates").join("b.txt"));
        assert!(root.join("b.txt").exists());
        assert!(!root.join("Duplicates").exists());
    }

    #[test]
    fn quarantine_name_must_be_a_single_component() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["", "..", "a/b", "/abs"] {
            let result = Deduplicator::builder()
                .root(temp_dir.path())
                .quarantine_name(name)
                .build()
                .run();
            assert!(matches!(result, Err(DedupError::Config(_))), "{:?}", name);
        }
    }

    #[test]
    fn missing_root_is_fatal_and_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("missing");

        let result = Deduplicator::builder().root(&root).build().run();

        assert!(matches!(result, Err(DedupError::Scan(_))));
        assert!(!root.exists());
    }

    #[test]
    fn run_reports_relocated_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a.bin", "12345");
        write(root, "b.bin", "12345");

        let report = Deduplicator::builder().root(root).build().run().unwrap();

        assert_eq!(report.relocated_bytes(), 5);
    }
}
