//! Folder set planner
//!
//! Turns the scanned file list into the minimal set of remote directories
//! that must exist before uploading, ordered so that every directory comes
//! after all of its ancestors.

use std::collections::BTreeSet;

use pterosync_core::domain::{LocalFile, RemotePath, UploadTask};
use serde::Serialize;

/// Ordered, duplicate-free list of remote directories to materialize
///
/// Every proper ancestor of the directory at index `i` sits at an index
/// below `i`. The root directory is never included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DirectoryPlan {
    directories: Vec<RemotePath>,
}

impl DirectoryPlan {
    pub fn directories(&self) -> &[RemotePath] {
        &self.directories
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RemotePath> {
        self.directories.iter()
    }

    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }
}

impl<'a> IntoIterator for &'a DirectoryPlan {
    type Item = &'a RemotePath;
    type IntoIter = std::slice::Iter<'a, RemotePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Computes the directory plan for `files`
///
/// Each file contributes every prefix of its remote parent directory.
/// Directories are ordered by depth, ties broken lexicographically.
pub fn plan(files: &[LocalFile]) -> DirectoryPlan {
    let mut set = BTreeSet::new();
    for file in files {
        set.extend(file.remote_directory().prefixes());
    }

    let mut directories: Vec<RemotePath> = set.into_iter().collect();
    // Stable sort keeps the set's lexicographic order within a depth
    directories.sort_by_key(RemotePath::depth);

    DirectoryPlan { directories }
}

/// Derives one upload task per file
pub fn tasks(files: &[LocalFile]) -> Vec<UploadTask> {
    files.iter().cloned().map(UploadTask::from).collect()
}
