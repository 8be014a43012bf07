//! # Relocator Module
//!
//! Moves duplicates into the quarantine directory without ever overwriting
//! anything already there.
//!
//! ## Naming
//! `photo.jpg` is tried first, then `photo (1).jpg`, `photo (2).jpg`, ...
//! The stem/extension split happens at the last dot. Leading dots are part
//! of the stem, so `.bashrc` and `..foo` have no extension.
//!
//! ## Claiming a name
//! Each candidate is claimed with an operation that fails if the name
//! exists, so a name taken between the check and the move is skipped
//! rather than clobbered:
//! 1. `hard_link(source, candidate)` then unlink the source
//! 2. if linking is impossible (another device, no link support), create
//!    the candidate with `create_new`, copy, verify the size, carry over
//!    permissions and modification time, then unlink the source

use crate::error::RelocateError;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Moves duplicates into a single quarantine directory
#[derive(Debug)]
pub struct Relocator {
    quarantine_dir: PathBuf,
    dry_run: bool,
    /// Names handed out on a dry run, since nothing lands on disk
    planned: HashSet<PathBuf>,
}

/// Result of trying to claim one candidate name
enum Claim {
    Moved,
    Taken,
}

impl Relocator {
    /// Create the quarantine directory (if needed) and return a relocator for it.
    pub fn prepare(quarantine_dir: impl Into<PathBuf>) -> Result<Self, RelocateError> {
        let quarantine_dir = quarantine_dir.into();
        fs::create_dir_all(&quarantine_dir).map_err(|e| RelocateError::QuarantineSetup {
            path: quarantine_dir.clone(),
            source: e,
        })?;

        Ok(Self {
            quarantine_dir,
            dry_run: false,
            planned: HashSet::new(),
        })
    }

    /// A relocator that only plans destinations and never touches the filesystem
    pub fn dry_run(quarantine_dir: impl Into<PathBuf>) -> Self {
        Self {
            quarantine_dir: quarantine_dir.into(),
            dry_run: true,
            planned: HashSet::new(),
        }
    }

    /// Move `source` into quarantine under the first free name.
    ///
    /// On error the source is left where it was.
    pub fn relocate(&mut self, source: &Path) -> Result<PathBuf, RelocateError> {
        let file_name = source.file_name().ok_or_else(|| RelocateError::InvalidName {
            path: source.to_path_buf(),
        })?;

        for candidate in candidate_names(file_name) {
            let destination = self.quarantine_dir.join(candidate);

            if self.dry_run {
                if !exists(&destination) && self.planned.insert(destination.clone()) {
                    return Ok(destination);
                }
                continue;
            }

            match claim(source, &destination) {
                Ok(Claim::Moved) => {
                    tracing::debug!(
                        from = %source.display(),
                        to = %destination.display(),
                        "moved into quarantine"
                    );
                    return Ok(destination);
                }
                Ok(Claim::Taken) => continue,
                Err(e) => {
                    return Err(RelocateError::MoveFailed {
                        from: source.to_path_buf(),
                        to: destination,
                        source: e,
                    })
                }
            }
        }

        Err(RelocateError::NoFreeName {
            dir: self.quarantine_dir.clone(),
        })
    }
}

/// Destination names for a file, in the order they are tried
pub fn candidate_names(file_name: &OsStr) -> impl Iterator<Item = OsString> {
    let (stem, extension) = split_name(file_name);

    std::iter::once(file_name.to_os_string()).chain((1u64..).map(move |n| {
        let mut name = stem.clone();
        name.push(format!(" ({})", n));
        if let Some(ref ext) = extension {
            name.push(".");
            name.push(ext);
        }
        name
    }))
}

/// Split a file name into stem and extension at the last dot that follows
/// a non-dot character.
fn split_name(file_name: &OsStr) -> (OsString, Option<OsString>) {
    let Some(name) = file_name.to_str() else {
        let as_path = Path::new(file_name);
        return (
            as_path.file_stem().unwrap_or(file_name).to_os_string(),
            as_path.extension().map(OsStr::to_os_string),
        );
    };

    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name.rfind('.') {
        Some(dot) if dot > leading_dots => (
            OsString::from(&name[..dot]),
            Some(OsString::from(&name[dot + 1..])),
        ),
        _ => (file_name.to_os_string(), None),
    }
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn claim(source: &Path, destination: &Path) -> io::Result<Claim> {
    match fs::hard_link(source, destination) {
        Ok(()) => {
            if let Err(e) = fs::remove_file(source) {
                let _ = fs::remove_file(destination);
                return Err(e);
            }
            Ok(Claim::Moved)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(Claim::Taken),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(e),
        Err(_) => copy_then_remove(source, destination),
    }
}

fn copy_then_remove(source: &Path, destination: &Path) -> io::Result<Claim> {
    let reader = File::open(source)?;

    let mut writer = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
    {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(Claim::Taken),
        Err(e) => return Err(e),
    };

    match copy_verified(reader, &mut writer, source) {
        Ok(()) => Ok(Claim::Moved),
        Err(e) => {
            drop(writer);
            let _ = fs::remove_file(destination);
            Err(e)
        }
    }
}

fn copy_verified(mut reader: File, writer: &mut File, source: &Path) -> io::Result<()> {
    let source_meta = reader.metadata()?;
    let source_size = source_meta.len();
    let copied = io::copy(&mut reader, writer)?;

    if copied != source_size {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!(
                "Copy verification failed: source {} bytes, copied {} bytes",
                source_size, copied
            ),
        ));
    }

    writer.set_permissions(source_meta.permissions())?;
    writer.set_modified(source_meta.modified()?)?;
    writer.sync_all()?;

    drop(reader);
    fs::remove_file(source)
}
