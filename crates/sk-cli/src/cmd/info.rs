//! Info command

use anyhow::{Result, bail};
use crossterm::style::Stylize;
use sk_core::{Config, LocalStore};

/// Show info about an installed skill
pub fn info(name: &str) -> Result<()> {
    let store = LocalStore::from_config(&Config::load());
    let Some(entry) = store.get(name)? else {
        bail!("Skill '{name}' is not installed");
    };

    let lw = 12;
    println!();
    println!("  {}", entry.name.as_str().white().bold());
    if !entry.description.is_empty() {
        println!("  {}", entry.description);
    }
    println!();
    if let Some(declared) = &entry.declared_name {
        println!("  {:<lw$}{}", "declared", declared);
    }
    println!("  {:<lw$}{}", "path", entry.root.display());
    println!(
        "  {:<lw$}{}",
        "source",
        entry.source.as_deref().unwrap_or("unknown")
    );
    println!(
        "  {:<lw$}{}",
        "installed",
        entry.installed_at.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}
