//! Validated name types.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Errors produced when validating a [`SkillName`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum NameError {
    /// The name is empty after trimming.
    #[error("skill name is empty")]
    Empty,

    /// The name would not map to a single directory under the skills root.
    #[error("invalid skill name '{0}': must be a single path segment")]
    NotASegment(String),
}

/// Name of an installed skill, which is also its directory name.
///
/// Unlike registry lookups, local names are case-preserving: the directory is
/// created exactly as named.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillName(String);

impl SkillName {
    /// Validate and wrap a local skill name.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Empty`] for blank input and
    /// [`NameError::NotASegment`] for names containing separators, `.` or `..`.
    pub fn new(name: &str) -> Result<Self, NameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
            return Err(NameError::NotASegment(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SkillName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for SkillName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for SkillName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for SkillName {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl Borrow<str> for SkillName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for SkillName {
    type Error = NameError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}
