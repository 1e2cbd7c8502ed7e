//! Shared operation context.
//!
//! Everything an operation needs is built once from [`Config`] and passed
//! around explicitly.

use std::fmt;
use std::sync::Arc;

use reqwest::Client;

use crate::Reporter;
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::github::GithubSearch;
use crate::io::fetch::ArchiveFetcher;
use crate::store::LocalStore;

/// Groups the components used by install, browse and removal operations.
#[derive(Clone)]
pub struct Context {
    /// Effective configuration.
    pub config: Config,
    /// Registry catalog with cache fallback.
    pub catalog: CatalogStore,
    /// Snapshot downloader.
    pub fetcher: ArchiveFetcher,
    /// GitHub repository search.
    pub github: GithubSearch,
    /// Installed skills and receipts.
    pub store: LocalStore,
    /// Progress sink.
    pub reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .field("github", &self.github)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Build the default components for `config`.
    ///
    /// Registry and search requests use the configured timeout end to end. Archive
    /// downloads apply it to connecting only, since snapshots can be large.
    pub fn new(config: Config, reporter: Arc<dyn Reporter>) -> Result<Self, reqwest::Error> {
        let catalog_client = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(crate::USER_AGENT)
            .build()?;
        let archive_client = Client::builder()
            .connect_timeout(config.http_timeout())
            .user_agent(crate::USER_AGENT)
            .build()?;

        Ok(Self {
            github: GithubSearch::from_config(&config, catalog_client.clone()),
            catalog: CatalogStore::from_config(&config, catalog_client),
            fetcher: ArchiveFetcher::new(archive_client),
            store: LocalStore::from_config(&config),
            config,
            reporter,
        })
    }

    /// Assemble a context from prebuilt components.
    pub fn from_parts(
        config: Config,
        catalog: CatalogStore,
        fetcher: ArchiveFetcher,
        github: GithubSearch,
        store: LocalStore,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            config,
            catalog,
            fetcher,
            github,
            store,
            reporter,
        }
    }
}
