//! Domain-specific errors for skill operations

use std::path::PathBuf;

use sk_schema::NameError;
use thiserror::Error;

use crate::io::extract::ExtractError;
use crate::io::fetch::FetchError;
use crate::resolver::ResolveError;
use crate::store::StoreError;

/// Failure of an install, uninstall or update operation.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The identifier could not be resolved, including catalog failures.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The snapshot could not be downloaded.
    #[error("Download failed: {0}")]
    Fetch(#[from] FetchError),

    /// No strategy produced a valid skill, or extraction aborted.
    #[error("Install failed: {0}")]
    Extract(#[from] ExtractError),

    /// Receipt or skills directory failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The local name is not a single safe path segment.
    #[error("Invalid identifier: {0}")]
    InvalidName(#[from] NameError),

    /// A skill of that name is already installed.
    #[error("Skill '{name}' already exists at {}; use --force to overwrite", path.display())]
    AlreadyExists {
        /// Local skill name.
        name: String,
        /// Existing directory.
        path: PathBuf,
    },

    /// In-place updates are not offered.
    #[error("Updating skills is not supported; reinstall with `sk install <source> --force`")]
    UpdateUnsupported,

    /// The blocking extraction task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Replacing an existing skill failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
