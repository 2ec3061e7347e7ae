//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain values.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// RemotePath
// ============================================================================

/// A path on a remote server, stored as an ordered list of segments
///
/// The root directory has no segments. The wire form (`/a/b`, or `/` for the
/// root) is produced only by [`RemotePath::to_wire`] and [`Display`], so
/// joining never produces doubled or trailing separators.
///
/// Segments are never empty and never `.` or `..`, so a `RemotePath` cannot
/// escape the server's root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemotePath {
    segments: Vec<String>,
}

impl RemotePath {
    /// Parse a slash-separated path
    ///
    /// A single leading and a single trailing `/` are accepted, so `"/a/b"`,
    /// `"a/b"` and `"a/b/"` are equal. `""` and `"/"` are the root.
    ///
    /// # Errors
    /// Returns error on empty inner segments (`a//b`), `.`/`..` segments or
    /// backslashes.
    pub fn new(path: &str) -> Result<Self, DomainError> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        Self::from_segments(trimmed.split('/'))
    }

    /// Build a path from individual segments
    ///
    /// # Errors
    /// Returns error if any segment is invalid
    pub fn from_segments<I, S>(segments: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments
            .into_iter()
            .map(|s| {
                let s = s.into();
                validate_segment(&s)?;
                Ok(s)
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(Self { segments })
    }

    /// The root directory `/`
    #[must_use]
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Returns true for the root directory
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments; the root has depth 0
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The individual path segments
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Append a single component
    ///
    /// # Errors
    /// Returns error if the component is not a valid segment
    pub fn join(&self, component: &str) -> Result<Self, DomainError> {
        validate_segment(component)?;
        let mut segments = self.segments.clone();
        segments.push(component.to_string());
        Ok(Self { segments })
    }

    /// Get the parent path, `None` for the root
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }

        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Get the last component, `None` for the root
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Every non-root prefix of this path, shortest first
    ///
    /// `a/b/c` yields `a`, `a/b`, `a/b/c`. The root yields nothing.
    pub fn prefixes(&self) -> impl Iterator<Item = RemotePath> + '_ {
        (1..=self.segments.len()).map(move |n| Self {
            segments: self.segments[..n].to_vec(),
        })
    }

    /// Returns true if `self` is a proper ancestor of `other`
    #[must_use]
    pub fn is_ancestor_of(&self, other: &RemotePath) -> bool {
        self.depth() < other.depth() && other.segments.starts_with(&self.segments)
    }

    /// The absolute wire form used by the panel API (`/a/b`, or `/`)
    #[must_use]
    pub fn to_wire(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// The relative form without a leading slash (`a/b`, or empty for root)
    #[must_use]
    pub fn to_relative(&self) -> String {
        self.segments.join("/")
    }
}

fn validate_segment(segment: &str) -> Result<(), DomainError> {
    if segment.is_empty() {
        return Err(DomainError::InvalidRemotePath(
            "Remote path contains an empty segment".to_string(),
        ));
    }

    if segment == "." || segment == ".." {
        return Err(DomainError::InvalidRemotePath(format!(
            "Remote path contains invalid traversal: {segment}"
        )));
    }

    if segment.contains(['/', '\\', '\0']) {
        return Err(DomainError::InvalidRemotePath(format!(
            "Invalid path component: {segment}"
        )));
    }

    Ok(())
}

impl Display for RemotePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

impl FromStr for RemotePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RemotePath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<RemotePath> for String {
    fn from(path: RemotePath) -> Self {
        path.to_wire()
    }
}

// ============================================================================
// Tests
// ============================================================================
