//! Install command

use anyhow::Result;
use crossterm::style::Stylize;
use sk_core::ops::{self, InstallRequest};

use crate::ui::theme::format_size;

/// Install one skill
pub async fn install(source: &str, name: Option<&str>, force: bool) -> Result<()> {
    let start = std::time::Instant::now();
    let ctx = super::context()?;

    let outcome = ops::install(&ctx, InstallRequest { source, name, force }).await?;

    println!();
    println!(
        "  {} {}",
        outcome.name.as_str().white().bold(),
        outcome.target.display().to_string().dark_grey()
    );
    println!(
        "  {} files, {} archive, {:.2}s",
        outcome.files,
        format_size(outcome.archive_size),
        start.elapsed().as_secs_f64()
    );
    if let Some(provenance) = outcome.provenance {
        if provenance != sk_core::Provenance::Remote {
            println!(
                "  {}",
                format!("resolved from {provenance} registry data").dark_grey()
            );
        }
    }
    Ok(())
}
