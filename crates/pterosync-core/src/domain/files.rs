//! Local files and the upload tasks derived from them

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::errors::DomainError;
use super::newtypes::RemotePath;

/// A file found under the scan root
///
/// `relative_path` doubles as the file's remote path: the local tree is
/// mirrored onto the remote server root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalFile {
    local_path: PathBuf,
    relative_path: RemotePath,
}

impl LocalFile {
    /// Creates a new `LocalFile`
    ///
    /// # Errors
    /// Returns error if `relative_path` is the root (a file needs a name)
    pub fn new(local_path: PathBuf, relative_path: RemotePath) -> Result<Self, DomainError> {
        if relative_path.is_root() {
            return Err(DomainError::ValidationFailed(format!(
                "relative path of {} must name a file",
                local_path.display()
            )));
        }

        Ok(Self {
            local_path,
            relative_path,
        })
    }

    /// Path of the file on the local machine
    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Path of the file relative to the scan root
    #[must_use]
    pub fn relative_path(&self) -> &RemotePath {
        &self.relative_path
    }

    /// Base file name used for the multipart upload
    #[must_use]
    pub fn file_name(&self) -> &str {
        // `new` rejects the root, so there is always a last segment
        self.relative_path.file_name().unwrap_or_default()
    }

    /// Remote directory the file is uploaded into
    #[must_use]
    pub fn remote_directory(&self) -> RemotePath {
        self.relative_path.parent().unwrap_or_else(RemotePath::root)
    }
}

/// A single file upload: which file, and which remote directory it lands in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    pub file: LocalFile,
    pub remote_directory: RemotePath,
}

impl From<LocalFile> for UploadTask {
    fn from(file: LocalFile) -> Self {
        let remote_directory = file.remote_directory();
        Self {
            file,
            remote_directory,
        }
    }
}
