//! List command

use anyhow::{Context, Result};
use sk_core::{Config, LocalStore};

use crate::ui::list::{print_installed_header, print_installed_row};

/// List installed skills
pub fn list() -> Result<()> {
    let config = Config::load();
    let store = LocalStore::from_config(&config);
    let entries = store.list().context("Failed to read installed skills")?;

    if entries.is_empty() {
        println!();
        println!("  No skills installed in {}.", store.skills_dir().display());
        println!("  Run 'sk search' to browse and 'sk install <name>' to get started.");
        return Ok(());
    }

    println!();
    print_installed_header();
    for entry in &entries {
        print_installed_row(entry);
    }
    println!();
    println!("  {} skills", entries.len());
    Ok(())
}
