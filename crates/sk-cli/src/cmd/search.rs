//! Search command

use anyhow::Result;
use crossterm::style::Stylize;
use sk_core::{Context, Provenance, Reporter};
use sk_schema::{Catalog, CatalogEntry};

use crate::ui::Output;
use crate::ui::list::{
    print_catalog_footer, print_catalog_header, print_catalog_row, print_repository_row,
};

/// Keyword search over the registry and GitHub, or the featured list when
/// no keyword is given or `popular` is set.
pub async fn search(keyword: &str, limit: usize, popular: bool) -> Result<()> {
    let ctx = super::context()?;
    let keyword = keyword.trim();

    if popular || keyword.is_empty() {
        return show_popular(&ctx).await;
    }

    let output = Output::new();
    let (results, provenance) = match ctx.catalog.search(keyword).await {
        Ok(found) => found,
        Err(err) => {
            output.warning(&format!("Registry unavailable ({err}); searching built-in list"));
            let builtin = Catalog::builtin();
            let results: Vec<CatalogEntry> = builtin.search(keyword).into_iter().cloned().collect();
            (results, Provenance::Builtin)
        }
    };

    if !results.is_empty() {
        print_entries(&results);
        print_catalog_footer(results.len(), provenance);
    }

    // GitHub is a bonus source; its failure never fails the command.
    let repositories = match ctx.github.search(keyword, limit).await {
        Ok(found) => found.items,
        Err(err) => {
            output.warning(&format!("GitHub search unavailable: {err}"));
            Vec::new()
        }
    };

    if !repositories.is_empty() {
        println!();
        println!(
            "{}",
            format!("  {} repositories on GitHub", repositories.len()).dark_grey()
        );
        for (i, repo) in repositories.iter().enumerate() {
            print_repository_row(i + 1, repo);
        }
    }

    if results.is_empty() && repositories.is_empty() {
        println!();
        println!("  No skills found matching '{}'", keyword.white());
        println!("{}", "  Try: sk search --popular".dark_grey());
    }
    Ok(())
}

async fn show_popular(ctx: &Context) -> Result<()> {
    let (fetched, err) = ctx.catalog.fetch_or_builtin().await;
    if let Some(err) = err {
        Output::new().warning(&format!("Registry unavailable ({err}); showing built-in list"));
    }

    let mut featured: Vec<CatalogEntry> = fetched.catalog.featured().into_iter().cloned().collect();
    if featured.is_empty() {
        featured = fetched.catalog.skills.iter().take(20).cloned().collect();
    }

    print_entries(&featured);
    print_catalog_footer(featured.len(), fetched.provenance);
    Ok(())
}

pub(crate) fn print_entries(entries: &[CatalogEntry]) {
    println!();
    print_catalog_header();
    for entry in entries {
        print_catalog_row(entry);
    }
}
