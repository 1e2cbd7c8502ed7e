//! Local content store.
//!
//! One directory per skill under the skills directory; a directory counts as
//! installed when it contains `SKILL.md`. Receipts in the state database add
//! the install source and time.

pub mod db;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sk_schema::{MANIFEST_FILE, SkillName};
use thiserror::Error;

pub use db::{DbError, Receipt, StateDb};

use crate::config::Config;
use crate::paths;

/// Errors from reading or changing installed skills.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No skill directory matches the name.
    #[error("Skill '{0}' is not installed")]
    NotInstalled(String),

    /// The receipt database could not be opened or queried.
    #[error("State database error: {0}")]
    Db(#[from] DbError),

    /// Filesystem failure under the skills directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Metadata declared in the `---` block at the top of `SKILL.md`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    /// `name:` value.
    pub name: Option<String>,
    /// `description:` value.
    pub description: Option<String>,
}

impl FrontMatter {
    /// Extract `name:` and `description:` lines between `---` delimiters.
    pub fn parse(content: &str) -> Self {
        let mut front = Self::default();
        let mut lines = content.trim_start().lines();
        if lines.next().map(str::trim_end) != Some("---") {
            return front;
        }

        for line in lines {
            let line = line.trim();
            if line == "---" {
                break;
            }
            if let Some(value) = line.strip_prefix("name:") {
                front.name = unquote(value);
            } else if let Some(value) = line.strip_prefix("description:") {
                front.description = unquote(value);
            }
        }
        front
    }
}

fn unquote(value: &str) -> Option<String> {
    let value = value.trim().trim_matches('"').trim_matches('\'').trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// An installed skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEntry {
    /// Directory name.
    pub name: String,
    /// Skill directory.
    pub root: PathBuf,
    /// Install source from the receipt, if one was recorded.
    pub source: Option<String>,
    /// Receipt time, or the directory's modification time without a receipt.
    pub installed_at: DateTime<Utc>,
    /// Description from the front matter, or empty.
    pub description: String,
    /// Name declared in the front matter, when it differs from the directory.
    pub declared_name: Option<String>,
}

/// Skills directory plus receipt database.
#[derive(Debug, Clone)]
pub struct LocalStore {
    skills_dir: PathBuf,
    db_path: PathBuf,
}

impl LocalStore {
    /// Store rooted at `skills_dir` with receipts kept in `db_path`.
    pub fn new(skills_dir: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            skills_dir: skills_dir.into(),
            db_path: db_path.into(),
        }
    }

    /// Store for the configured skills directory and `~/.sk/state.db`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.skills_dir.clone(), paths::db_path())
    }

    /// Root holding one directory per skill.
    pub fn skills_dir(&self) -> &Path {
        &self.skills_dir
    }

    /// Directory a skill named `name` is installed into.
    pub fn path_for(&self, name: &SkillName) -> PathBuf {
        self.skills_dir.join(name)
    }

    /// Whether anything occupies the install directory for `name`.
    pub fn exists(&self, name: &SkillName) -> bool {
        self.path_for(name).exists()
    }

    fn db(&self) -> Result<StateDb, StoreError> {
        Ok(StateDb::open_at(&self.db_path)?)
    }

    /// Record an install receipt.
    pub fn record(&self, name: &SkillName, source: &str) -> Result<Receipt, StoreError> {
        Ok(self.db()?.record(name, source)?)
    }

    /// Installed skills, sorted by directory name.
    pub fn list(&self) -> Result<Vec<LocalEntry>, StoreError> {
        let read_dir = match fs::read_dir(&self.skills_dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let receipts: HashMap<String, Receipt> = self
            .db()?
            .list()?
            .into_iter()
            .map(|r| (r.name.clone(), r))
            .collect();

        let mut entries = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry?;
            let Ok(name) = dir_entry.file_name().into_string() else {
                continue;
            };
            if let Some(entry) = self.load_entry(&name, &dir_entry.path(), receipts.get(&name))? {
                entries.push(entry);
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Look up an installed skill by directory name, then by declared name.
    pub fn get(&self, name: &str) -> Result<Option<LocalEntry>, StoreError> {
        if let Ok(skill) = SkillName::new(name) {
            let root = self.path_for(&skill);
            let receipt = self.db()?.get(&skill)?;
            if let Some(entry) = self.load_entry(&skill, &root, receipt.as_ref())? {
                return Ok(Some(entry));
            }
        }

        Ok(self.list()?.into_iter().find(|entry| {
            entry
                .declared_name
                .as_deref()
                .is_some_and(|declared| declared.to_lowercase() == name.to_lowercase())
        }))
    }

    /// Delete an installed skill and its receipt.
    pub fn remove(&self, name: &str) -> Result<LocalEntry, StoreError> {
        let entry = self
            .get(name)?
            .ok_or_else(|| StoreError::NotInstalled(name.to_string()))?;

        fs::remove_dir_all(&entry.root)?;
        if !self.db()?.remove(&entry.name)? {
            tracing::debug!("No receipt recorded for '{}'", entry.name);
        }
        Ok(entry)
    }

    fn load_entry(
        &self,
        name: &str,
        root: &Path,
        receipt: Option<&Receipt>,
    ) -> Result<Option<LocalEntry>, StoreError> {
        let manifest = root.join(MANIFEST_FILE);
        if !root.is_dir() || !manifest.is_file() {
            return Ok(None);
        }

        let front = FrontMatter::parse(&fs::read_to_string(&manifest)?);
        let installed_at = match receipt {
            Some(r) => r.installed_at,
            None => fs::metadata(root)?.modified()?.into(),
        };

        Ok(Some(LocalEntry {
            name: name.to_string(),
            root: root.to_path_buf(),
            source: receipt.map(|r| r.source.clone()),
            installed_at,
            description: front.description.unwrap_or_default(),
            declared_name: front.name.filter(|declared| declared != name),
        }))
    }
}
