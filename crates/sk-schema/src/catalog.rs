//! Registry catalog wire format.
//!
//! The remote registry publishes `registry.json` (a [`Catalog`]) plus one
//! `categories/<name>.json` document per category (a [`CategoryIndex`]).
//! The same [`Catalog`] JSON is written to the local cache file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single installable skill known to the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    /// Lookup key for bare-name installs (matched case-insensitively).
    pub name: String,
    /// One-line summary.
    pub description: String,
    /// Identifier to resolve when installing by name (`owner/repo[/path]` or URL).
    #[serde(rename = "install")]
    pub install_spec: String,
    /// `owner/repo` the skill is published from.
    pub repo: String,
    /// Directory inside `repo`.
    #[serde(rename = "path")]
    pub sub_path: String,
    /// Browse category.
    pub category: String,
    /// Free-form keywords.
    pub tags: Vec<String>,
    /// Publisher grouping (e.g. "Anthropic Official").
    #[serde(rename = "source")]
    pub source_group: String,
    /// Popularity score (repository stars).
    #[serde(rename = "stars")]
    pub popularity: i64,
    /// Highlighted in the popular listing.
    pub featured: bool,
}

impl CatalogEntry {
    /// Case-insensitive substring match against name, description, or any tag.
    ///
    /// `needle` must already be lowercased.
    fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// The full registry index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Registry schema version.
    #[serde(rename = "version")]
    pub schema_version: String,
    /// Last regeneration time as published (RFC 3339 expected, not enforced).
    pub updated_at: String,
    /// Advertised entry count. Not verified against `skills`.
    pub total_count: usize,
    /// Entries in registry order.
    pub skills: Vec<CatalogEntry>,
}

impl Catalog {
    /// Parse a catalog from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error for malformed payloads.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Serialize as pretty-printed JSON (the cache file format).
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// `updated_at` parsed as RFC 3339, if it is well-formed.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.updated_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Whether `total_count` agrees with the number of entries.
    pub fn count_is_consistent(&self) -> bool {
        self.total_count == self.skills.len()
    }

    /// First entry whose name equals `name`, ignoring case.
    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        let name = name.to_lowercase();
        self.skills
            .iter()
            .find(|entry| entry.name.to_lowercase() == name)
    }

    /// Entries whose name, description, or any tag contains `keyword`
    /// (case-insensitive). Catalog order is preserved and each entry appears
    /// at most once.
    pub fn search(&self, keyword: &str) -> Vec<&CatalogEntry> {
        let needle = keyword.to_lowercase();
        self.skills
            .iter()
            .filter(|entry| entry.matches_lowercase(&needle))
            .collect()
    }

    /// Entries whose category equals `category`, ignoring case.
    pub fn by_category(&self, category: &str) -> Vec<&CatalogEntry> {
        let category = category.to_lowercase();
        self.skills
            .iter()
            .filter(|entry| entry.category.to_lowercase() == category)
            .collect()
    }

    /// Featured entries, most popular first.
    pub fn featured(&self) -> Vec<&CatalogEntry> {
        let mut featured: Vec<_> = self.skills.iter().filter(|e| e.featured).collect();
        featured.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        featured
    }

    /// Minimal catalog compiled into the binary, served when neither the
    /// registry nor the cache is available.
    pub fn builtin() -> Self {
        const ANTHROPIC_SKILLS: &[&str] = &[
            "docx",
            "pdf",
            "pptx",
            "xlsx",
            "frontend-design",
            "canvas-design",
            "mcp-builder",
            "webapp-testing",
            "web-artifacts-builder",
            "brand-guidelines",
            "internal-comms",
            "algorithmic-art",
            "slack-gif-creator",
            "theme-factory",
            "skill-creator",
            "doc-coauthoring",
        ];

        let mut skills: Vec<CatalogEntry> = ANTHROPIC_SKILLS
            .iter()
            .map(|name| CatalogEntry {
                name: (*name).to_string(),
                description: format!("Official {name} skill from Anthropic"),
                install_spec: format!("anthropics/skills/{name}"),
                repo: "anthropics/skills".to_string(),
                sub_path: format!("skills/{name}"),
                category: "official".to_string(),
                tags: vec!["official".to_string()],
                source_group: "Anthropic Official".to_string(),
                popularity: 0,
                featured: true,
            })
            .collect();

        skills.push(CatalogEntry {
            name: "superpowers".to_string(),
            description: "20+ battle-tested skills for Claude Code".to_string(),
            install_spec: "obra/superpowers".to_string(),
            repo: "obra/superpowers".to_string(),
            sub_path: String::new(),
            category: "community".to_string(),
            tags: vec!["workflow".to_string(), "collection".to_string()],
            source_group: "Obra Superpowers".to_string(),
            popularity: 0,
            featured: true,
        });

        Self {
            schema_version: "builtin".to_string(),
            updated_at: String::new(),
            total_count: skills.len(),
            skills,
        }
    }
}

/// Per-category registry document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryIndex {
    /// Category name.
    pub category: String,
    /// Last regeneration time as published.
    pub updated_at: String,
    /// Advertised entry count.
    pub count: usize,
    /// Entries in this category.
    pub skills: Vec<CatalogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, description: &str, tags: &[&str], category: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            description: description.to_string(),
            install_spec: format!("acme/skills/{name}"),
            category: category.to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            ..CatalogEntry::default()
        }
    }

    fn sample() -> Catalog {
        let skills = vec![
            entry("pdf", "Read and write PDF files", &["pdf", "documents"], "documents"),
            entry("docx", "Word documents", &["office"], "Documents"),
            entry("report", "Build reports", &["PDF-export"], "writing"),
            entry("slides", "Presentation decks", &["office"], "documents"),
            entry("notes", "Export notes to pdf", &[], "writing"),
        ];
        Catalog {
            schema_version: "1.0".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
            total_count: skills.len(),
            skills,
        }
    }

    #[test]
    fn test_search_matches_each_entry_once_in_order() {
        let catalog = sample();
        let names: Vec<_> = catalog
            .search("PDF")
            .into_iter()
            .map(|e| e.name.as_str())
            .collect();
        // "pdf" matches on name, description and tag but appears once.
        assert_eq!(names, vec!["pdf", "report", "notes"]);
    }

    #[test]
    fn test_search_no_match() {
        assert!(sample().search("kubernetes").is_empty());
    }

    #[test]
    fn test_find_is_case_insensitive_first_match() {
        let mut catalog = sample();
        let mut dup = entry("PDF", "duplicate", &[], "other");
        dup.install_spec = "other/repo".to_string();
        catalog.skills.push(dup);

        let found = catalog.find("Pdf").unwrap();
        assert_eq!(found.install_spec, "acme/skills/pdf");
        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn test_by_category_ignores_case() {
        let catalog = sample();
        let names: Vec<_> = catalog
            .by_category("documents")
            .into_iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["pdf", "docx", "slides"]);
    }

    #[test]
    fn test_lookups_fold_non_ascii_case() {
        let mut catalog = sample();
        catalog
            .skills
            .push(entry("Übersetzer", "Translate text", &[], "Sprache"));

        assert_eq!(
            catalog.find("übersetzer").map(|e| e.description.as_str()),
            Some("Translate text")
        );
        assert_eq!(catalog.by_category("SPRACHE").len(), 1);
        assert_eq!(catalog.search("ÜBERSETZ").len(), 1);
    }

    #[test]
    fn test_parse_registry_json_with_missing_fields() {
        let json = br#"{
            "version": "1.0",
            "updated_at": "2025-06-01T12:00:00Z",
            "total_count": 3,
            "skills": [
                {"name": "pdf", "install": "anthropics/skills/pdf", "tags": ["pdf"], "stars": 42, "featured": true}
            ]
        }"#;
        let catalog = Catalog::from_slice(json).unwrap();
        assert_eq!(catalog.skills.len(), 1);
        assert_eq!(catalog.skills[0].install_spec, "anthropics/skills/pdf");
        assert_eq!(catalog.skills[0].popularity, 42);
        assert!(catalog.skills[0].description.is_empty());
        assert!(!catalog.count_is_consistent());
        assert!(catalog.updated_at().is_some());
    }

    #[test]
    fn test_builtin_catalog_is_self_consistent() {
        let builtin = Catalog::builtin();
        assert!(builtin.count_is_consistent());
        assert_eq!(
            builtin.find("docx").map(|e| e.install_spec.as_str()),
            Some("anthropics/skills/docx")
        );
        assert_eq!(builtin.featured().len(), builtin.skills.len());
    }
}
