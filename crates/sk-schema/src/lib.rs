//! Shared types for the sk skill manager.
//!
//! The registry wire format ([`Catalog`], [`CatalogEntry`], [`CategoryIndex`]),
//! the canonical location of a skill ([`SourceDescriptor`]) and the validated
//! [`SkillName`] newtype live here so the core library and the CLI agree on them.

pub mod catalog;
pub mod source;
pub mod types;

// Re-exports
pub use catalog::{Catalog, CatalogEntry, CategoryIndex};
pub use source::SourceDescriptor;
pub use types::{NameError, SkillName};

/// File that marks a directory as an installable skill.
pub const MANIFEST_FILE: &str = "SKILL.md";

/// Branch assumed when an identifier does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Default archive host.
pub const DEFAULT_HOST: &str = "github.com";
