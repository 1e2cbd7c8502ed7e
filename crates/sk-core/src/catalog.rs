//! Registry catalog with offline-tolerant caching.
//!
//! The remote `registry.json` is the source of truth. Every successful fetch
//! is mirrored to a local cache file; when the registry is unreachable or
//! returns garbage, a cache younger than the TTL stands in for it. Browsing
//! can additionally fall back to the catalog compiled into the binary.
//!
//! The fallback order is data ([`CatalogSource::CHAIN`]), not nested retries.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use reqwest::{Client, StatusCode, Url};
use sk_schema::{Catalog, CatalogEntry, CategoryIndex};
use thiserror::Error;

use crate::config::Config;

/// Failure to obtain catalog data from any source.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport failure or timeout.
    #[error("Network unavailable: {0}")]
    Network(#[from] reqwest::Error),

    /// Registry answered with a non-200 status.
    #[error("Registry returned HTTP {0}")]
    Status(u16),

    /// Payload was not valid catalog JSON.
    #[error("Failed to parse registry: {0}")]
    Parse(#[from] serde_json::Error),

    /// No cache file, or one older than the TTL.
    #[error("Registry cache expired or missing")]
    CacheExpiredOrMissing,

    /// Registry base URL cannot have path segments appended.
    #[error("Invalid registry URL: {0}")]
    InvalidUrl(String),

    /// Reading or writing the cache file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where catalog data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Fetched from the registry just now.
    Remote,
    /// Read from the local cache file.
    Cache,
    /// The minimal catalog compiled into the binary.
    Builtin,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Remote => "remote",
            Self::Cache => "cache",
            Self::Builtin => "builtin",
        })
    }
}

/// One step of the catalog fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// `GET <base>/registry.json`
    Remote,
    /// The cache file, if younger than the TTL.
    Cache,
    /// The catalog compiled into the binary.
    Builtin,
}

impl CatalogSource {
    /// Sources tried by [`CatalogStore::fetch`], in order.
    pub const CHAIN: [CatalogSource; 2] = [Self::Remote, Self::Cache];

    /// Sources tried by [`CatalogStore::fetch_or_builtin`], in order.
    pub const BROWSE_CHAIN: [CatalogSource; 3] = [Self::Remote, Self::Cache, Self::Builtin];

    fn provenance(self) -> Provenance {
        match self {
            Self::Remote => Provenance::Remote,
            Self::Cache => Provenance::Cache,
            Self::Builtin => Provenance::Builtin,
        }
    }
}

/// A catalog together with where it came from.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// The catalog itself.
    pub catalog: Catalog,
    /// Which source served it.
    pub provenance: Provenance,
}

/// Fetches, caches, and queries the registry catalog.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    client: Client,
    base_url: String,
    cache_path: PathBuf,
    ttl: Duration,
}

impl CatalogStore {
    /// Create a store. `ttl` is the maximum age of a usable cache file.
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        cache_path: impl Into<PathBuf>,
        ttl: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache_path: cache_path.into(),
            ttl,
        }
    }

    /// Create a store from the user's configuration.
    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new(
            client,
            config.registry_base_url(),
            config.cache_path(),
            config.registry_ttl(),
        )
    }

    /// Registry base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Location of the cache file.
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Fetch the catalog, falling back to the cache.
    ///
    /// On success from the registry the cache is refreshed (best-effort).
    /// If every source fails, the registry's error is returned, not the
    /// cache's.
    pub async fn fetch(&self) -> Result<Fetched, CatalogError> {
        match self.walk(&CatalogSource::CHAIN).await {
            (Some(fetched), _) => Ok(fetched),
            (None, error) => Err(error.unwrap_or(CatalogError::CacheExpiredOrMissing)),
        }
    }

    /// Like [`fetch`](Self::fetch), but never fails: the built-in catalog is
    /// served as a last resort, along with the error that forced it.
    pub async fn fetch_or_builtin(&self) -> (Fetched, Option<CatalogError>) {
        let (result, first_error) = self.walk(&CatalogSource::BROWSE_CHAIN).await;
        let fetched = result.unwrap_or_else(|| Fetched {
            catalog: Catalog::builtin(),
            provenance: Provenance::Builtin,
        });
        let error = (fetched.provenance == Provenance::Builtin)
            .then_some(first_error)
            .flatten();
        (fetched, error)
    }

    /// Try `chain` in order. Returns the first success, if any, and the
    /// first error encountered.
    async fn walk(&self, chain: &[CatalogSource]) -> (Option<Fetched>, Option<CatalogError>) {
        let mut first_error = None;

        for &source in chain {
            let attempt = match source {
                CatalogSource::Remote => self.fetch_remote().await,
                CatalogSource::Cache => self.load_cache(),
                CatalogSource::Builtin => Ok(Catalog::builtin()),
            };

            match attempt {
                Ok(catalog) => {
                    match source {
                        CatalogSource::Remote => {
                            if let Err(e) = self.save_cache(&catalog) {
                                tracing::debug!(
                                    "Failed to write registry cache {}: {e}",
                                    self.cache_path.display()
                                );
                            }
                        }
                        CatalogSource::Cache => {
                            tracing::debug!("Using cached registry {}", self.cache_path.display());
                        }
                        CatalogSource::Builtin => tracing::debug!("Serving built-in catalog"),
                    }
                    let fetched = Fetched {
                        catalog,
                        provenance: source.provenance(),
                    };
                    return (Some(fetched), first_error);
                }
                Err(e) => {
                    tracing::debug!("Registry source {source:?} failed: {e}");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        (None, first_error)
    }

    /// Case-insensitive keyword search over name, description, and tags.
    pub async fn search(
        &self,
        keyword: &str,
    ) -> Result<(Vec<CatalogEntry>, Provenance), CatalogError> {
        let fetched = self.fetch().await?;
        let results = fetched
            .catalog
            .search(keyword)
            .into_iter()
            .cloned()
            .collect();
        Ok((results, fetched.provenance))
    }

    /// Entries in `category`.
    ///
    /// Tries the dedicated `categories/<category>.json` document first and
    /// falls back to filtering the full catalog.
    pub async fn by_category(
        &self,
        category: &str,
    ) -> Result<(Vec<CatalogEntry>, Provenance), CatalogError> {
        match self.fetch_category(category).await {
            Ok(index) => Ok((index.skills, Provenance::Remote)),
            Err(e) => {
                tracing::debug!("Category document for '{category}' unavailable: {e}");
                let fetched = self.fetch().await?;
                let results = fetched
                    .catalog
                    .by_category(category)
                    .into_iter()
                    .cloned()
                    .collect();
                Ok((results, fetched.provenance))
            }
        }
    }

    /// Install spec of the first entry named `name` (case-insensitive).
    pub async fn resolve_install(
        &self,
        name: &str,
    ) -> Result<Option<(String, Provenance)>, CatalogError> {
        let fetched = self.fetch().await?;
        Ok(fetched
            .catalog
            .find(name)
            .map(|entry| (entry.install_spec.clone(), fetched.provenance)))
    }

    async fn get_json(&self, url: &str) -> Result<bytes::Bytes, CatalogError> {
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(CatalogError::Status(response.status().as_u16()));
        }
        Ok(response.bytes().await?)
    }

    async fn fetch_remote(&self) -> Result<Catalog, CatalogError> {
        let url = format!("{}/registry.json", self.base_url);
        tracing::debug!("Fetching registry {url}");

        let body = self.get_json(&url).await?;
        let catalog = Catalog::from_slice(&body)?;

        if !catalog.count_is_consistent() {
            tracing::warn!(
                "Registry advertises {} skills but lists {}",
                catalog.total_count,
                catalog.skills.len()
            );
        }
        Ok(catalog)
    }

    /// `<base>/categories/<category>.json`, with `category` encoded as a
    /// single path segment.
    fn category_url(&self, category: &str) -> Result<Url, CatalogError> {
        let invalid = || CatalogError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .push("categories")
            .push(&format!("{category}.json"));
        Ok(url)
    }

    async fn fetch_category(&self, category: &str) -> Result<CategoryIndex, CatalogError> {
        let url = self.category_url(category)?;
        let body = self.get_json(url.as_str()).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Read the cache file if it exists and is younger than the TTL.
    pub fn load_cache(&self) -> Result<Catalog, CatalogError> {
        let metadata = match std::fs::metadata(&self.cache_path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::CacheExpiredOrMissing);
            }
            Err(e) => return Err(e.into()),
        };

        // A modification time in the future counts as brand new.
        let age = SystemTime::now()
            .duration_since(metadata.modified()?)
            .unwrap_or_default();
        if age > self.ttl {
            return Err(CatalogError::CacheExpiredOrMissing);
        }

        let data = std::fs::read(&self.cache_path)?;
        Ok(Catalog::from_slice(&data)?)
    }

    /// Atomically replace the cache file.
    fn save_cache(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let parent = self
            .cache_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(catalog.to_json_pretty()?.as_bytes())?;
        tmp.persist(&self.cache_path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::fs::File;

    const REGISTRY: &str = r#"{
        "version": "1.0",
        "updated_at": "2025-06-01T00:00:00Z",
        "total_count": 2,
        "skills": [
            {"name": "pdf", "description": "PDF toolkit", "install": "anthropics/skills/pdf", "category": "documents", "tags": ["pdf"]},
            {"name": "brainstorm", "description": "Ideas", "install": "obra/superpowers/brainstorm", "category": "workflow", "tags": []}
        ]
    }"#;

    // Nothing listens on the discard port, so connections are refused quickly.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn store(base_url: &str, cache_path: &Path, ttl: Duration) -> CatalogStore {
        CatalogStore::new(Client::new(), base_url, cache_path, ttl)
    }

    fn write_cache(path: &Path, age: Duration) {
        let catalog = Catalog::from_slice(REGISTRY.as_bytes()).unwrap();
        std::fs::write(path, catalog.to_json_pretty().unwrap()).unwrap();
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[tokio::test]
    async fn test_remote_fetch_writes_cache() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/registry.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(REGISTRY)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache").join("registry.json");
        let store = store(&server.url(), &cache, Duration::from_secs(3600));

        let fetched = store.fetch().await.unwrap();
        assert_eq!(fetched.provenance, Provenance::Remote);
        assert_eq!(fetched.catalog.skills.len(), 2);

        let cached = store.load_cache().unwrap();
        assert_eq!(cached, fetched.catalog);
    }

    #[tokio::test]
    async fn test_unreachable_registry_uses_fresh_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("registry.json");
        write_cache(&cache, Duration::from_secs(60));

        let store = store(UNREACHABLE, &cache, Duration::from_secs(3600));
        let fetched = store.fetch().await.unwrap();
        assert_eq!(fetched.provenance, Provenance::Cache);
        assert_eq!(fetched.catalog.skills[0].name, "pdf");
    }

    #[tokio::test]
    async fn test_stale_cache_propagates_network_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("registry.json");
        write_cache(&cache, Duration::from_secs(48 * 3600));

        let store = store(UNREACHABLE, &cache, Duration::from_secs(24 * 3600));
        let err = store.fetch().await.unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_cache() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/registry.json")
            .with_status(503)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("registry.json");
        write_cache(&cache, Duration::ZERO);

        let store = store(&server.url(), &cache, Duration::from_secs(3600));
        let fetched = store.fetch().await.unwrap();
        assert_eq!(fetched.provenance, Provenance::Cache);
    }

    #[tokio::test]
    async fn test_garbage_payload_without_cache_is_parse_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/registry.json")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = store(
            &server.url(),
            &dir.path().join("registry.json"),
            Duration::from_secs(3600),
        );
        let err = store.fetch().await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)), "got {err:?}");
        assert!(!dir.path().join("registry.json").exists());
    }

    #[tokio::test]
    async fn test_builtin_is_last_resort() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(
            UNREACHABLE,
            &dir.path().join("registry.json"),
            Duration::from_secs(3600),
        );
        let (fetched, err) = store.fetch_or_builtin().await;
        assert_eq!(fetched.provenance, Provenance::Builtin);
        assert!(fetched.catalog.find("docx").is_some());
        assert!(matches!(err, Some(CatalogError::Network(_))));
    }

    #[tokio::test]
    async fn test_category_document_preferred() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/categories/documents.json")
            .with_status(200)
            .with_body(
                r#"{"category": "documents", "updated_at": "", "count": 1,
                    "skills": [{"name": "xlsx", "install": "anthropics/skills/xlsx"}]}"#,
            )
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = store(
            &server.url(),
            &dir.path().join("registry.json"),
            Duration::from_secs(3600),
        );
        let (entries, provenance) = store.by_category("documents").await.unwrap();
        assert_eq!(provenance, Provenance::Remote);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "xlsx");
    }

    #[tokio::test]
    async fn test_category_falls_back_to_filtering() {
        let mut server = Server::new_async().await;
        let _missing = server
            .mock("GET", "/categories/Workflow.json")
            .with_status(404)
            .create_async()
            .await;
        let _registry = server
            .mock("GET", "/registry.json")
            .with_status(200)
            .with_body(REGISTRY)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = store(
            &server.url(),
            &dir.path().join("registry.json"),
            Duration::from_secs(3600),
        );
        let (entries, _) = store.by_category("Workflow").await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["brainstorm"]);
    }

    #[test]
    fn test_category_url_is_one_segment() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(
            "https://raw.example.com/acme/registry/main/",
            &dir.path().join("registry.json"),
            Duration::from_secs(3600),
        );
        assert_eq!(
            store.category_url("documents").unwrap().as_str(),
            "https://raw.example.com/acme/registry/main/categories/documents.json"
        );
        assert_eq!(
            store.category_url("../registry").unwrap().as_str(),
            "https://raw.example.com/acme/registry/main/categories/..%2Fregistry.json"
        );
    }

    #[tokio::test]
    async fn test_category_cannot_reach_registry_document() {
        let mut server = Server::new_async().await;
        let _registry = server
            .mock("GET", "/registry.json")
            .with_status(200)
            .with_body(REGISTRY)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = store(
            &server.url(),
            &dir.path().join("registry.json"),
            Duration::from_secs(3600),
        );
        let (entries, provenance) = store.by_category("../registry").await.unwrap();
        assert!(entries.is_empty(), "got {entries:?}");
        assert_eq!(provenance, Provenance::Remote);
    }

    #[tokio::test]
    async fn test_resolve_install_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("registry.json");
        write_cache(&cache, Duration::ZERO);
        let store = store(UNREACHABLE, &cache, Duration::from_secs(3600));

        let (spec, provenance) = store.resolve_install("PDF").await.unwrap().unwrap();
        assert_eq!(spec, "anthropics/skills/pdf");
        assert_eq!(provenance, Provenance::Cache);
        assert!(store.resolve_install("nope").await.unwrap().is_none());
    }
}
