//! Category command

use anyhow::{Context, Result};
use crossterm::style::Stylize;

use crate::ui::list::print_catalog_footer;

/// List registry skills in one category
pub async fn category(name: &str) -> Result<()> {
    let ctx = super::context()?;
    let (entries, provenance) = ctx
        .catalog
        .by_category(name)
        .await
        .with_context(|| format!("Failed to load category '{name}'"))?;

    if entries.is_empty() {
        println!();
        println!("  No skills in category '{}'", name.white());
        return Ok(());
    }

    super::search::print_entries(&entries);
    print_catalog_footer(entries.len(), provenance);
    Ok(())
}
