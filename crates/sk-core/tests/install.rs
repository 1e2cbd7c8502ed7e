//! End-to-end install pipeline against a mocked registry and archive host.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use mockito::{Server, ServerGuard};
use reqwest::Client;
use sk_core::io::extract::ExtractError;
use sk_core::io::fetch::ArchiveFetcher;
use sk_core::ops::{self, InstallRequest, SubPathStrategy};
use sk_core::{
    CatalogStore, Config, Context, GithubSearch, InstallError, LocalStore, NullReporter,
    Provenance, ResolveError,
};
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const REGISTRY: &str = r#"{
    "version": "1.0",
    "updated_at": "2025-06-01T00:00:00Z",
    "total_count": 2,
    "skills": [
        {"name": "docx", "description": "Word documents", "install": "anthropics/skills/docx", "category": "documents"},
        {"name": "Word", "description": "Duplicate name", "install": "someone/else", "category": "documents"}
    ]
}"#;

fn snapshot(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default();
    for (name, body) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, opts).unwrap();
        } else {
            zip.start_file(*name, opts).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
    }
    zip.finish().unwrap().into_inner()
}

fn docx_snapshot() -> Vec<u8> {
    snapshot(&[
        ("skills-main/", ""),
        ("skills-main/README.md", "repo readme"),
        ("skills-main/skills/", ""),
        ("skills-main/skills/docx/", ""),
        (
            "skills-main/skills/docx/SKILL.md",
            "---\nname: docx\ndescription: Create and edit Word documents\n---\n",
        ),
        ("skills-main/skills/docx/ooxml/schema.xsd", "<xs:schema/>"),
    ])
}

struct Harness {
    server: ServerGuard,
    dir: TempDir,
    ctx: Context,
}

impl Harness {
    async fn new() -> Self {
        let server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();

        let config = Config {
            skills_dir: dir.path().join("skills"),
            registry: server.url(),
            cache_path: Some(dir.path().join("cache").join("registry.json")),
            ..Config::default()
        };
        let catalog = CatalogStore::new(
            Client::new(),
            server.url(),
            config.cache_path(),
            Duration::from_secs(3600),
        );
        let fetcher = ArchiveFetcher::new(Client::new()).with_base_url(server.url());
        let github = GithubSearch::new(Client::new()).with_api_url(server.url());
        let store = LocalStore::new(config.skills_dir.clone(), dir.path().join("state.db"));
        let ctx = Context::from_parts(
            config,
            catalog,
            fetcher,
            github,
            store,
            Arc::new(NullReporter),
        );

        Self { server, dir, ctx }
    }

    async fn serve_archive(&mut self, path: &str, body: Vec<u8>) -> mockito::Mock {
        self.server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/zip")
            .with_body(body)
            .create_async()
            .await
    }

    fn skills_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("skills")
    }
}

#[tokio::test]
async fn test_short_form_installs_via_alternate_sub_path() {
    let mut h = Harness::new().await;
    let archive = h
        .serve_archive("/anthropics/skills/archive/refs/heads/main.zip", docx_snapshot())
        .await;

    let outcome = ops::install(
        &h.ctx,
        InstallRequest {
            source: "anthropics/skills/docx",
            ..InstallRequest::default()
        },
    )
    .await
    .unwrap();

    archive.assert_async().await;
    assert_eq!(outcome.name.as_str(), "docx");
    assert_eq!(outcome.strategy, SubPathStrategy::SkillsDir);
    assert_eq!(outcome.descriptor.sub_path(), "skills/docx");
    assert_eq!(outcome.files, 2);
    assert!(outcome.provenance.is_none());

    let root = h.skills_dir().join("docx");
    assert!(root.join("SKILL.md").is_file());
    assert!(root.join("ooxml").join("schema.xsd").is_file());
    assert!(!root.join("README.md").exists());

    let entry = h.ctx.store.get("docx").unwrap().unwrap();
    assert_eq!(entry.description, "Create and edit Word documents");
    assert_eq!(
        entry.source.as_deref(),
        Some("https://github.com/anthropics/skills/skills/docx@main")
    );
}

#[tokio::test]
async fn test_traversal_in_direct_layout_stops_alternates() {
    let mut h = Harness::new().await;
    let _archive = h
        .serve_archive(
            "/anthropics/skills/archive/refs/heads/main.zip",
            snapshot(&[
                ("skills-main/", ""),
                ("skills-main/docx/../../../evil.txt", "pwned"),
                ("skills-main/skills/docx/SKILL.md", "---\nname: docx\n---\n"),
            ]),
        )
        .await;

    let err = ops::install(
        &h.ctx,
        InstallRequest {
            source: "anthropics/skills/docx",
            ..InstallRequest::default()
        },
    )
    .await
    .unwrap_err();

    assert!(
        matches!(err, InstallError::Extract(ExtractError::PathTraversal { .. })),
        "got {err:?}"
    );
    assert!(!h.skills_dir().join("docx").exists());
    assert!(!h.dir.path().join("evil.txt").exists());
    assert!(h.ctx.store.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_direct_layout_without_manifest_falls_through() {
    let mut h = Harness::new().await;
    let _archive = h
        .serve_archive(
            "/anthropics/skills/archive/refs/heads/main.zip",
            snapshot(&[
                ("skills-main/", ""),
                ("skills-main/docx/", ""),
                ("skills-main/docx/notes.md", "not a skill"),
                ("skills-main/skills/docx/SKILL.md", "---\nname: docx\n---\n"),
            ]),
        )
        .await;

    let outcome = ops::install(
        &h.ctx,
        InstallRequest {
            source: "anthropics/skills/docx",
            ..InstallRequest::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(outcome.strategy, SubPathStrategy::SkillsDir);
    let root = h.skills_dir().join("docx");
    assert!(root.join("SKILL.md").is_file());
    assert!(!root.join("notes.md").exists());
}

#[tokio::test]
async fn test_receipt_failure_rolls_back_install() {
    let mut h = Harness::new().await;
    let _archive = h
        .serve_archive(
            "/acme/tools/archive/refs/heads/main.zip",
            snapshot(&[("tools-main/", ""), ("tools-main/SKILL.md", "tools")]),
        )
        .await;

    // A directory where the database file should be cannot be opened.
    let db_path = h.dir.path().join("state.db");
    std::fs::create_dir_all(&db_path).unwrap();

    let err = ops::install(
        &h.ctx,
        InstallRequest {
            source: "acme/tools",
            ..InstallRequest::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, InstallError::Store(_)), "got {err:?}");
    assert!(!h.skills_dir().join("tools").exists());

    std::fs::remove_dir(&db_path).unwrap();
    let outcome = ops::install(
        &h.ctx,
        InstallRequest {
            source: "acme/tools",
            ..InstallRequest::default()
        },
    )
    .await
    .unwrap();
    assert!(outcome.target.join("SKILL.md").is_file());
}

#[tokio::test]
async fn test_bare_name_resolves_through_registry() {
    let mut h = Harness::new().await;
    let _registry = h
        .server
        .mock("GET", "/registry.json")
        .with_status(200)
        .with_body(REGISTRY)
        .create_async()
        .await;
    let _archive = h
        .serve_archive("/anthropics/skills/archive/refs/heads/main.zip", docx_snapshot())
        .await;

    let outcome = ops::install(
        &h.ctx,
        InstallRequest {
            source: "DOCX",
            ..InstallRequest::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(outcome.provenance, Some(Provenance::Remote));
    assert_eq!(outcome.name.as_str(), "docx");
    assert!(h.ctx.config.cache_path().is_file());
}

#[tokio::test]
async fn test_unknown_bare_name() {
    let mut h = Harness::new().await;
    let _registry = h
        .server
        .mock("GET", "/registry.json")
        .with_status(200)
        .with_body(REGISTRY)
        .create_async()
        .await;

    let err = ops::install(
        &h.ctx,
        InstallRequest {
            source: "nonexistent",
            ..InstallRequest::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        InstallError::Resolve(ResolveError::NotFoundInCatalog(_))
    ));
}

#[tokio::test]
async fn test_master_branch_fallback() {
    let mut h = Harness::new().await;
    let _main = h
        .server
        .mock("GET", "/acme/tools/archive/refs/heads/main.zip")
        .with_status(404)
        .create_async()
        .await;
    let _master = h
        .serve_archive(
            "/acme/tools/archive/refs/heads/master.zip",
            snapshot(&[("tools-master/", ""), ("tools-master/SKILL.md", "tools")]),
        )
        .await;

    let outcome = ops::install(
        &h.ctx,
        InstallRequest {
            source: "https://github.com/acme/tools",
            ..InstallRequest::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(outcome.name.as_str(), "tools");
    assert_eq!(outcome.descriptor.branch(), "master");
    assert_eq!(outcome.strategy, SubPathStrategy::Direct);
}

#[tokio::test]
async fn test_exhausted_alternates_leave_no_directory() {
    let mut h = Harness::new().await;
    let _archive = h
        .serve_archive("/anthropics/skills/archive/refs/heads/main.zip", docx_snapshot())
        .await;

    let err = ops::install(
        &h.ctx,
        InstallRequest {
            source: "anthropics/skills/missing",
            ..InstallRequest::default()
        },
    )
    .await
    .unwrap_err();

    assert!(
        matches!(
            &err,
            InstallError::Extract(ExtractError::PathNotFound { sub_path }) if sub_path == "skill/missing"
        ),
        "got {err:?}"
    );
    assert!(!h.skills_dir().join("missing").exists());
    assert!(h.ctx.store.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_existing_skill_requires_force() {
    let mut h = Harness::new().await;
    let _archive = h
        .serve_archive("/anthropics/skills/archive/refs/heads/main.zip", docx_snapshot())
        .await;

    let stale = h.skills_dir().join("docx");
    std::fs::create_dir_all(&stale).unwrap();
    std::fs::write(stale.join("stale.txt"), "old").unwrap();

    let err = ops::install(
        &h.ctx,
        InstallRequest {
            source: "anthropics/skills/docx",
            ..InstallRequest::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, InstallError::AlreadyExists { .. }));
    assert!(stale.join("stale.txt").exists());

    ops::install(
        &h.ctx,
        InstallRequest {
            source: "anthropics/skills/docx",
            force: true,
            ..InstallRequest::default()
        },
    )
    .await
    .unwrap();
    assert!(!stale.join("stale.txt").exists());
    assert!(stale.join("SKILL.md").is_file());
}

#[tokio::test]
async fn test_name_override() {
    let mut h = Harness::new().await;
    let _archive = h
        .serve_archive("/anthropics/skills/archive/refs/heads/main.zip", docx_snapshot())
        .await;

    let outcome = ops::install(
        &h.ctx,
        InstallRequest {
            source: "anthropics/skills/docx",
            name: Some("word"),
            force: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(outcome.target, h.skills_dir().join("word"));

    let err = ops::install(
        &h.ctx,
        InstallRequest {
            source: "anthropics/skills/docx",
            name: Some("../escape"),
            force: false,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, InstallError::InvalidName(_)));
}

#[tokio::test]
async fn test_uninstall_removes_directory_and_receipt() {
    let mut h = Harness::new().await;
    let _archive = h
        .serve_archive("/anthropics/skills/archive/refs/heads/main.zip", docx_snapshot())
        .await;

    ops::install(
        &h.ctx,
        InstallRequest {
            source: "anthropics/skills/docx",
            ..InstallRequest::default()
        },
    )
    .await
    .unwrap();

    let removed = ops::uninstall(&h.ctx, "docx").unwrap();
    assert!(!removed.root.exists());
    assert!(matches!(
        ops::uninstall(&h.ctx, "docx"),
        Err(InstallError::Store(sk_core::StoreError::NotInstalled(_)))
    ));
}
