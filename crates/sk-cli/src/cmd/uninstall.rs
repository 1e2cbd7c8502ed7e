//! Uninstall command

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use crossterm::style::Stylize;
use sk_core::{Config, Context, LocalStore, Reporter};

use crate::ui::Output;

/// Remove an installed skill, asking first unless `yes`
pub fn uninstall(name: &str, yes: bool) -> Result<()> {
    let config = Config::load();
    let store = LocalStore::from_config(&config);
    let output = Output::new();

    let Some(entry) = store.get(name)? else {
        anyhow::bail!("Skill '{name}' is not installed");
    };

    if !yes {
        print!(
            "  Remove {} from {}? (y/N) ",
            entry.name.as_str().bold(),
            entry.root.display()
        );
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            output.info("Operation cancelled");
            return Ok(());
        }
    }

    let ctx = Context::new(config, Arc::new(output.clone()))?;
    sk_core::ops::uninstall(&ctx, &entry.name)?;
    output.success(&format!("Uninstalled {}", entry.name));
    Ok(())
}
