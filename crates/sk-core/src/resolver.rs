//! Identifier resolution.
//!
//! Turns what the user typed into a [`SourceDescriptor`]. Three shapes are
//! accepted, tried in this order:
//!
//! 1. `https://<host>/<owner>/<repo>[/tree/<branch>[/<path>]]`
//! 2. `<owner>/<repo>[/<path>...]`
//! 3. a bare catalog name, looked up through a [`CatalogLookup`]
//!
//! Parsing is pure; only bare names touch the catalog.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use sk_schema::{Catalog, DEFAULT_BRANCH, DEFAULT_HOST, SourceDescriptor};
use thiserror::Error;

use crate::catalog::{CatalogError, CatalogStore, Fetched, Provenance};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://([^/]+)/([^/]+)/([^/]+)(?:/tree/([^/]+)(?:/(.+))?|/.*)?$")
        .expect("URL pattern is a valid regex")
});

/// Why an identifier could not be turned into a [`SourceDescriptor`].
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Input matched none of the accepted shapes.
    #[error("Invalid identifier '{input}': {reason}")]
    InvalidIdentifier {
        /// The identifier as given.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Bare name with no catalog entry.
    #[error("Skill '{0}' not found in registry")]
    NotFoundInCatalog(String),

    /// The catalog could not be consulted.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ResolveError {
    fn invalid(input: &str, reason: &'static str) -> Self {
        Self::InvalidIdentifier {
            input: input.to_string(),
            reason,
        }
    }
}

/// Classified user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// URL or short form, already a full location.
    Source(SourceDescriptor),
    /// Bare name that must be looked up in the catalog.
    Name(String),
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Where the skill lives.
    pub descriptor: SourceDescriptor,
    /// Set when a catalog lookup was needed, recording where its data came from.
    pub provenance: Option<Provenance>,
}

/// Source of name-to-install-spec mappings.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Install spec of the first entry named `name` (case-insensitive).
    async fn install_spec(&self, name: &str) -> Result<Option<(String, Provenance)>, CatalogError>;
}

#[async_trait]
impl CatalogLookup for CatalogStore {
    async fn install_spec(&self, name: &str) -> Result<Option<(String, Provenance)>, CatalogError> {
        self.resolve_install(name).await
    }
}

#[async_trait]
impl CatalogLookup for Fetched {
    async fn install_spec(&self, name: &str) -> Result<Option<(String, Provenance)>, CatalogError> {
        Ok(lookup_in(&self.catalog, name).map(|spec| (spec, self.provenance)))
    }
}

fn lookup_in(catalog: &Catalog, name: &str) -> Option<String> {
    catalog.find(name).map(|entry| entry.install_spec.clone())
}

/// Strip surrounding whitespace, trailing slashes and a trailing `.git`.
fn clean(identifier: &str) -> &str {
    let trimmed = identifier.trim().trim_end_matches('/');
    trimmed
        .strip_suffix(".git")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
}

/// Classify `identifier` without consulting the catalog.
pub fn classify(identifier: &str) -> Result<Identifier, ResolveError> {
    let input = clean(identifier);
    if input.is_empty() {
        return Err(ResolveError::invalid(identifier, "empty identifier"));
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        return parse_url(input).map(Identifier::Source);
    }

    if input.contains('/') {
        return parse_short(input).map(Identifier::Source);
    }

    Ok(Identifier::Name(input.to_string()))
}

/// Parse a URL or short-form identifier. Bare names are rejected.
pub fn parse(identifier: &str) -> Result<SourceDescriptor, ResolveError> {
    match classify(identifier)? {
        Identifier::Source(desc) => Ok(desc),
        Identifier::Name(_) => Err(ResolveError::invalid(
            identifier,
            "expected a URL or owner/repo[/path]",
        )),
    }
}

/// Resolve any identifier shape, consulting `catalog` for bare names.
///
/// The catalog's install spec is parsed once; a spec that is itself a bare
/// name is rejected.
pub async fn resolve(
    identifier: &str,
    catalog: &dyn CatalogLookup,
) -> Result<Resolution, ResolveError> {
    match classify(identifier)? {
        Identifier::Source(descriptor) => Ok(Resolution {
            descriptor,
            provenance: None,
        }),
        Identifier::Name(name) => {
            let (spec, provenance) = catalog
                .install_spec(&name)
                .await?
                .ok_or_else(|| ResolveError::NotFoundInCatalog(name.clone()))?;
            tracing::debug!("Resolved '{name}' to '{spec}' via {provenance} catalog");
            Ok(Resolution {
                descriptor: parse(&spec)?,
                provenance: Some(provenance),
            })
        }
    }
}

fn parse_url(input: &str) -> Result<SourceDescriptor, ResolveError> {
    let caps = URL_PATTERN
        .captures(input)
        .ok_or_else(|| ResolveError::invalid(input, "expected https://<host>/<owner>/<repo>"))?;

    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    let branch = caps.get(4).map_or(DEFAULT_BRANCH, |m| m.as_str());

    Ok(SourceDescriptor::new(
        group(1),
        group(2),
        group(3),
        group(5),
        branch,
    ))
}

fn parse_short(input: &str) -> Result<SourceDescriptor, ResolveError> {
    let mut parts = input.splitn(3, '/');
    let owner = parts.next().unwrap_or_default();
    let repo = parts.next().unwrap_or_default();
    let sub_path = parts.next().unwrap_or_default();

    if owner.is_empty() || repo.is_empty() {
        return Err(ResolveError::invalid(
            input,
            "owner and repository must not be empty",
        ));
    }

    Ok(SourceDescriptor::new(
        DEFAULT_HOST,
        owner,
        repo,
        sub_path,
        DEFAULT_BRANCH,
    ))
}
