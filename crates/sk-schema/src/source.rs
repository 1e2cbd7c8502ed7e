//! Canonical location of a skill inside a hosted repository.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a skill lives: repository coordinates plus the directory inside the
/// repository that forms the skill root.
///
/// Values are immutable. Operations that "change" a descriptor (branch
/// fallback, alternate sub-paths) return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    host: String,
    owner: String,
    repo: String,
    sub_path: String,
    branch: String,
    canonical_url: String,
}

impl SourceDescriptor {
    /// Build a descriptor. `sub_path` is normalized to have no leading or
    /// trailing slashes; an empty string means the whole repository.
    pub fn new(
        host: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        sub_path: impl AsRef<str>,
        branch: impl Into<String>,
    ) -> Self {
        let host = host.into();
        let owner = owner.into();
        let repo = repo.into();
        let canonical_url = format!("https://{host}/{owner}/{repo}");
        Self {
            sub_path: normalize_sub_path(sub_path.as_ref()),
            branch: branch.into(),
            host,
            owner,
            repo,
            canonical_url,
        }
    }

    /// Host serving the repository (e.g. `github.com`).
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Directory inside the repository, empty for the repository root.
    pub fn sub_path(&self) -> &str {
        &self.sub_path
    }

    /// Branch whose snapshot is downloaded.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// `https://<host>/<owner>/<repo>`
    pub fn canonical_url(&self) -> &str {
        &self.canonical_url
    }

    /// Same location on a different branch.
    pub fn with_branch(&self, branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            ..self.clone()
        }
    }

    /// Same repository and branch, different directory.
    pub fn with_sub_path(&self, sub_path: impl AsRef<str>) -> Self {
        Self {
            sub_path: normalize_sub_path(sub_path.as_ref()),
            ..self.clone()
        }
    }

    /// Default local name: last `sub_path` segment, or the repository name.
    pub fn skill_name(&self) -> &str {
        self.sub_path
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.repo)
    }

    /// Short `owner/repo[/sub_path]` form, the inverse of short-form parsing.
    pub fn short_form(&self) -> String {
        if self.sub_path.is_empty() {
            format!("{}/{}", self.owner, self.repo)
        } else {
            format!("{}/{}/{}", self.owner, self.repo, self.sub_path)
        }
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sub_path.is_empty() {
            write!(f, "{}@{}", self.canonical_url, self.branch)
        } else {
            write!(f, "{}/{}@{}", self.canonical_url, self.sub_path, self.branch)
        }
    }
}

fn normalize_sub_path(raw: &str) -> String {
    raw.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
