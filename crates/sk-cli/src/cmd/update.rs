//! Update command

use anyhow::Result;

/// Updates are rejected; the error carries the reinstall hint.
pub fn update(name: Option<&str>) -> Result<()> {
    sk_core::ops::update(name)?;
    Ok(())
}
