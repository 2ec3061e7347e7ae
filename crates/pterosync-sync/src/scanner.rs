//! Local tree scanner
//!
//! Walks the local root and yields every regular file as a [`LocalFile`]
//! whose relative path uses forward-slash segments on every host OS.
//!
//! ## Rules
//!
//! - Hidden directories are pruned before descent; their contents are never
//!   read. Hidden files are dropped after listing.
//! - Entries are visited in name order so the output is deterministic.
//! - Symbolic links to directories are not followed. Symbolic links to files
//!   are reported as the file they point at.
//! - An unreadable subdirectory is logged, recorded in
//!   [`ScanOutcome::errors`] and skipped. Only a missing root is fatal.

use std::fs::Metadata;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use pterosync_core::domain::{LocalFile, RemotePath, SyncError};
use tracing::{debug, info, warn};

/// Result of a scan: the files found plus the non-fatal errors hit on the way
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Files to upload, in walk order
    pub files: Vec<LocalFile>,
    /// Subdirectories or entries that could not be read
    pub errors: Vec<SyncError>,
}

/// Scans `root` recursively
///
/// # Errors
/// [`SyncError::LocalIo`] if `root` does not exist or is not a directory
#[tracing::instrument(skip_all, fields(root = %root.display()))]
pub async fn scan(root: &Path) -> Result<ScanOutcome, SyncError> {
    let metadata = tokio::fs::metadata(root)
        .await
        .map_err(|e| SyncError::local_io(root, e))?;
    if !metadata.is_dir() {
        return Err(SyncError::local_io(
            root,
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    let mut outcome = ScanOutcome::default();
    walk_directory(root.to_path_buf(), RemotePath::root(), &mut outcome).await;

    info!(
        files = outcome.files.len(),
        errors = outcome.errors.len(),
        "Local scan complete"
    );
    Ok(outcome)
}

/// Returns whether an entry is hidden
///
/// Unix convention is a leading dot. On Windows the hidden attribute also
/// counts.
pub fn is_hidden(name: &str, metadata: &Metadata) -> bool {
    name.starts_with('.') || has_hidden_attribute(metadata)
}

#[cfg(windows)]
fn has_hidden_attribute(metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn has_hidden_attribute(_metadata: &Metadata) -> bool {
    false
}

/// What a directory entry turned out to be
enum EntryKind {
    Directory,
    File,
    Skip,
}

/// Recursively walks `dir`, whose path relative to the root is `relative`
fn walk_directory<'a>(
    dir: PathBuf,
    relative: RemotePath,
    outcome: &'a mut ScanOutcome,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
    Box::pin(async move {
        let entries = match read_sorted(&dir).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "Skipping unreadable directory");
                outcome.errors.push(SyncError::local_io(&dir, err));
                return;
            }
        };

        for (name, path) in entries {
            let Some(name) = name else {
                warn!(path = %path.display(), "Skipping entry with non UTF-8 name");
                continue;
            };

            let kind = match classify(&name, &path).await {
                Ok(kind) => kind,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Skipping unreadable entry");
                    outcome.errors.push(SyncError::local_io(&path, err));
                    continue;
                }
            };
            if matches!(kind, EntryKind::Skip) {
                continue;
            }

            let child = match relative.join(&name) {
                Ok(child) => child,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Skipping entry with unsupported name");
                    continue;
                }
            };

            match kind {
                EntryKind::Directory => walk_directory(path, child, outcome).await,
                EntryKind::File => match LocalFile::new(path, child) {
                    Ok(file) => outcome.files.push(file),
                    Err(err) => warn!(error = %err, "Skipping file"),
                },
                EntryKind::Skip => {}
            }
        }
    })
}

/// Lists `dir`, sorted by file name
///
/// Names that are not valid UTF-8 come back as `None`.
async fn read_sorted(dir: &Path) -> io::Result<Vec<(Option<String>, PathBuf)>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        entries.push((entry.file_name(), entry.path()));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries
        .into_iter()
        .map(|(name, path)| (name.into_string().ok(), path))
        .collect())
}

/// Decides whether an entry is walked, uploaded or skipped
async fn classify(name: &str, path: &Path) -> io::Result<EntryKind> {
    let metadata = tokio::fs::symlink_metadata(path).await?;

    if is_hidden(name, &metadata) {
        debug!(path = %path.display(), "Skipping hidden entry");
        return Ok(EntryKind::Skip);
    }

    if metadata.is_dir() {
        return Ok(EntryKind::Directory);
    }
    if metadata.is_file() {
        return Ok(EntryKind::File);
    }

    if metadata.file_type().is_symlink() {
        let resolved = tokio::fs::metadata(path).await?;
        if resolved.is_file() {
            return Ok(EntryKind::File);
        }
        debug!(path = %path.display(), "Not following directory symlink");
        return Ok(EntryKind::Skip);
    }

    debug!(path = %path.display(), "Skipping special file");
    Ok(EntryKind::Skip)
}
