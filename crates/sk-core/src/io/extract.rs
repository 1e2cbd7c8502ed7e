//! Subtree extraction from repository snapshots.
//!
//! A snapshot zip holds one top-level directory (usually `<repo>-<branch>/`)
//! and the skill lives somewhere below it. Only entries under
//! `<root>/<sub_path>/` are copied, each resolved lexically against the
//! target so nothing can be written outside it.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use sk_schema::{MANIFEST_FILE, SourceDescriptor};
use thiserror::Error;
use zip::ZipArchive;

/// Why a subtree could not be installed.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// An entry would resolve outside the target directory.
    #[error("Archive entry escapes the install directory: {entry}")]
    PathTraversal {
        /// Offending entry name as stored in the archive.
        entry: String,
    },

    /// No entries live under the requested sub-path.
    #[error("Path '{sub_path}' not found in archive")]
    PathNotFound {
        /// Sub-path that was looked for.
        sub_path: String,
    },

    /// Files were copied but none of them is the manifest.
    #[error("No {MANIFEST_FILE} at the root of the extracted directory")]
    NotASkill,

    /// The zip could not be read.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Writing the target failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ExtractError {
    /// Whether another sub-path guess might succeed where this one failed.
    pub fn is_layout_miss(&self) -> bool {
        matches!(self, Self::PathNotFound { .. } | Self::NotASkill)
    }
}

/// Information about an extracted file
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    /// Path relative to the install directory
    pub relative_path: PathBuf,
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Any execute bit was set in the archive
    pub is_executable: bool,
}

/// Result of a successful [`ArchiveInstaller::install`].
#[derive(Debug, Clone)]
pub struct ExtractReport {
    /// Archive prefix that was copied, e.g. `skills-main/skills/docx/`.
    pub prefix: String,
    /// The installed skill directory.
    pub target: PathBuf,
    /// Files written, in archive order.
    pub files: Vec<ExtractedFile>,
}

/// Removes a directory on drop unless disarmed.
struct CleanupGuard<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> CleanupGuard<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = fs::remove_dir_all(self.path) {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::debug!("Failed to clean up {}: {e}", self.path.display());
                }
            }
        }
    }
}

/// Installs one subtree of a snapshot archive as a skill directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveInstaller;

impl ArchiveInstaller {
    /// Copy the subtree named by `desc` from `archive_path` into `target_dir`.
    ///
    /// The target must end up with a `SKILL.md` at its root. On any error
    /// the target directory is removed.
    pub fn install(
        &self,
        archive_path: &Path,
        desc: &SourceDescriptor,
        target_dir: &Path,
    ) -> Result<ExtractReport, ExtractError> {
        let mut archive = ZipArchive::new(File::open(archive_path)?)?;

        let root = root_prefix(&archive)
            .unwrap_or_else(|| format!("{}-{}/", desc.repo(), desc.branch()));
        let prefix = if desc.sub_path().is_empty() {
            root
        } else {
            format!("{root}{}/", desc.sub_path())
        };
        tracing::debug!("Extracting '{prefix}' into {}", target_dir.display());

        fs::create_dir_all(target_dir)?;
        let guard = CleanupGuard::new(target_dir);

        let mut files = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let Some(relative) = entry.name().strip_prefix(prefix.as_str()) else {
                continue;
            };

            let relative_path =
                resolve_within(relative).ok_or_else(|| ExtractError::PathTraversal {
                    entry: entry.name().to_string(),
                })?;
            if relative_path.as_os_str().is_empty() {
                continue;
            }

            if entry.is_symlink() {
                tracing::warn!("Skipping symbolic link {}", entry.name());
                continue;
            }

            let absolute_path = target_dir.join(&relative_path);
            if entry.is_dir() {
                fs::create_dir_all(&absolute_path)?;
                continue;
            }

            if let Some(parent) = absolute_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&absolute_path)?;
            io::copy(&mut entry, &mut outfile)?;

            #[cfg(unix)]
            let is_executable = if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&absolute_path, fs::Permissions::from_mode(mode & 0o777))?;
                mode & 0o111 != 0
            } else {
                false
            };
            #[cfg(not(unix))]
            let is_executable = false;

            files.push(ExtractedFile {
                relative_path,
                absolute_path,
                is_executable,
            });
        }

        if files.is_empty() {
            return Err(ExtractError::PathNotFound {
                sub_path: desc.sub_path().to_string(),
            });
        }
        if !target_dir.join(MANIFEST_FILE).is_file() {
            return Err(ExtractError::NotASkill);
        }

        guard.disarm();
        Ok(ExtractReport {
            prefix,
            target: target_dir.to_path_buf(),
            files,
        })
    }
}

/// First entry of the form `<dir>/`.
fn root_prefix<R>(archive: &ZipArchive<R>) -> Option<String>
where
    R: io::Read + io::Seek,
{
    archive
        .file_names()
        .find(|name| name.ends_with('/') && name.matches('/').count() == 1)
        .map(str::to_string)
}

/// Normalize `relative` without touching the filesystem. `None` if it would
/// leave its base directory.
fn resolve_within(relative: &str) -> Option<PathBuf> {
    let mut resolved = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}
