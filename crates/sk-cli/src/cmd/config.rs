//! Config command

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use sk_core::{Config, paths};

use crate::ui::Output;

/// Print the effective configuration as TOML, or write it out with `init`.
pub fn config(init: bool) -> Result<()> {
    if init {
        return write_config();
    }

    let config = Config::load();
    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;

    println!("{}", format!("# {}", paths::config_path().display()).dark_grey());
    print!("{rendered}");
    println!(
        "{}",
        format!(
            "# registry url: {}\n# cache: {}",
            config.registry_base_url(),
            config.cache_path().display()
        )
        .dark_grey()
    );
    Ok(())
}

/// Rewrite `config.toml` with defaults filled in. Environment overrides are
/// not persisted.
fn write_config() -> Result<()> {
    let path = paths::config_path();
    let config = Config::load_from(&path)
        .with_context(|| format!("Refusing to overwrite {}", path.display()))?
        .unwrap_or_default();
    config
        .save()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Output::new().success(&format!("Wrote {}", path.display()));
    Ok(())
}
