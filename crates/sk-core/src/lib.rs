//! Core library for sk: identifier resolution, the registry catalog,
//! snapshot download and subtree installation.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod catalog;
pub mod config;
pub mod github;
pub mod io;
pub mod ops;
pub mod paths;
pub mod reporter;
pub mod resolver;
pub mod store;

pub use catalog::{CatalogError, CatalogSource, CatalogStore, Fetched, Provenance};
pub use config::Config;
pub use github::{GithubError, GithubSearch, Repository};
pub use ops::{Context, InstallError};
pub use paths::*;
pub use reporter::{NullReporter, Reporter};
pub use resolver::{CatalogLookup, Resolution, ResolveError};
pub use store::{LocalEntry, LocalStore, StoreError};

/// User Agent string for outgoing requests
pub const USER_AGENT: &str = concat!("sk/", env!("CARGO_PKG_VERSION"));
