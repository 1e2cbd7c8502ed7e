//! Install pipeline: resolve → fetch → extract → record.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sk_schema::{SkillName, SourceDescriptor};

use super::context::Context;
use super::error::InstallError;
use crate::Reporter;
use crate::catalog::Provenance;
use crate::io::extract::{ArchiveInstaller, ExtractError, ExtractReport};
use crate::io::fetch::FetchedArchive;
use crate::resolver;
use crate::store::{LocalEntry, Receipt};

/// Where inside the snapshot to look for the skill, in the order tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubPathStrategy {
    /// The path exactly as given.
    Direct,
    /// `skills/<path>`
    SkillsDir,
    /// `skill/<path>`
    SkillDir,
}

impl SubPathStrategy {
    /// Strategies in the order they are attempted.
    pub const ORDER: [SubPathStrategy; 3] = [Self::Direct, Self::SkillsDir, Self::SkillDir];

    /// Sub-path to try for `sub_path`, or `None` if this strategy does not
    /// apply. Alternates only apply to a non-empty path.
    pub fn apply(self, sub_path: &str) -> Option<String> {
        match self {
            Self::Direct => Some(sub_path.to_string()),
            _ if sub_path.is_empty() => None,
            Self::SkillsDir => Some(format!("skills/{sub_path}")),
            Self::SkillDir => Some(format!("skill/{sub_path}")),
        }
    }
}

/// What to install and how.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallRequest<'a> {
    /// Name, `owner/repo[/path]`, or repository URL.
    pub source: &'a str,
    /// Local name override.
    pub name: Option<&'a str>,
    /// Replace an existing skill of the same name.
    pub force: bool,
}

/// A completed install.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// Local name the skill was installed under.
    pub name: SkillName,
    /// Descriptor that actually matched, with any branch or sub-path correction.
    pub descriptor: SourceDescriptor,
    /// Layout that produced the skill.
    pub strategy: SubPathStrategy,
    /// Installed skill directory.
    pub target: PathBuf,
    /// Number of files written.
    pub files: usize,
    /// Size of the downloaded snapshot in bytes.
    pub archive_size: u64,
    /// Catalog provenance when the source was a bare name.
    pub provenance: Option<Provenance>,
    /// Receipt written to the state database.
    pub receipt: Receipt,
}

/// Install a skill.
pub async fn install(
    ctx: &Context,
    req: InstallRequest<'_>,
) -> Result<InstallOutcome, InstallError> {
    ctx.reporter.section("Resolving");
    let resolution = resolver::resolve(req.source, &ctx.catalog).await?;
    if let Some(provenance) = resolution.provenance {
        tracing::debug!("Catalog lookup served from {provenance}");
    }

    let name = match req.name {
        Some(name) => SkillName::new(name)?,
        None => SkillName::new(resolution.descriptor.skill_name())?,
    };
    let target = ctx.store.path_for(&name);

    if ctx.store.exists(&name) && !req.force {
        return Err(InstallError::AlreadyExists {
            name: name.to_string(),
            path: target,
        });
    }

    ctx.reporter.section("Downloading");
    let archive = match ctx
        .fetcher
        .fetch(&resolution.descriptor, &name, ctx.reporter.as_ref())
        .await
    {
        Ok(archive) => archive,
        Err(e) => {
            ctx.reporter.failed(&name, &e.to_string());
            return Err(e.into());
        }
    };
    let archive_size = archive.size();

    if ctx.store.exists(&name) {
        tracing::debug!("Replacing {}", target.display());
        remove_path(&target).await?;
    }

    ctx.reporter.section("Installing");
    let reporter = Arc::clone(&ctx.reporter);
    let task_name = name.clone();
    let task_target = target.clone();
    let extracted = tokio::task::spawn_blocking(move || {
        extract_with_alternates(&archive, &task_name, &task_target, reporter.as_ref())
    })
    .await?;

    let (report, descriptor, strategy) = match extracted {
        Ok(done) => done,
        Err(e) => {
            ctx.reporter.failed(&name, &e.to_string());
            return Err(e.into());
        }
    };

    // Without a receipt the install is rolled back, so a retry starts clean.
    let receipt = match ctx.store.record(&name, &descriptor.to_string()) {
        Ok(receipt) => receipt,
        Err(e) => {
            ctx.reporter.failed(&name, &e.to_string());
            if let Err(cleanup) = remove_path(&report.target).await {
                tracing::warn!(
                    "Failed to remove {} after receipt error: {cleanup}",
                    report.target.display()
                );
            }
            return Err(e.into());
        }
    };
    ctx.reporter.done(
        &name,
        &format!("{} files from {}", report.files.len(), descriptor),
    );

    Ok(InstallOutcome {
        name,
        descriptor,
        strategy,
        target: report.target,
        files: report.files.len(),
        archive_size,
        provenance: resolution.provenance,
        receipt,
    })
}

/// Try each [`SubPathStrategy`] until one yields a valid skill.
///
/// Layout misses move on to the next strategy; anything else aborts. When
/// every strategy misses, the last miss is returned.
fn extract_with_alternates(
    archive: &FetchedArchive,
    name: &SkillName,
    target: &Path,
    reporter: &dyn Reporter,
) -> Result<(ExtractReport, SourceDescriptor, SubPathStrategy), ExtractError> {
    let fetched = archive.descriptor();
    let mut last_miss = None;

    for strategy in SubPathStrategy::ORDER {
        let Some(sub_path) = strategy.apply(fetched.sub_path()) else {
            continue;
        };
        let desc = fetched.with_sub_path(&sub_path);
        reporter.extracting(name, if sub_path.is_empty() { "/" } else { sub_path.as_str() });

        match ArchiveInstaller.install(archive.path(), &desc, target) {
            Ok(report) => return Ok((report, desc, strategy)),
            Err(e) if e.is_layout_miss() => {
                tracing::debug!("{strategy:?} layout '{sub_path}' missed: {e}");
                last_miss = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_miss.unwrap_or(ExtractError::NotASkill))
}

async fn remove_path(path: &Path) -> std::io::Result<()> {
    if tokio::fs::symlink_metadata(path).await?.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    }
}

/// Remove an installed skill and its receipt.
pub fn uninstall(ctx: &Context, name: &str) -> Result<LocalEntry, InstallError> {
    let entry = ctx.store.remove(name)?;
    ctx.reporter.info(&format!("Removed {}", entry.root.display()));
    Ok(entry)
}

/// In-place updates are not offered; reinstalling with `force` is the way to
/// refresh a skill.
pub fn update(_name: Option<&str>) -> Result<(), InstallError> {
    Err(InstallError::UpdateUnsupported)
}
