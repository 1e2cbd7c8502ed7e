//! Command implementations

pub mod category;
pub mod config;
pub mod info;
pub mod install;
pub mod list;
pub mod search;
pub mod uninstall;
pub mod update;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use sk_core::{Config, Context};

use crate::ui::Output;

/// Load configuration and build the shared operation context.
pub(crate) fn context() -> Result<Context> {
    let config = Config::load();
    Context::new(config, Arc::new(Output::new())).context("Failed to initialize HTTP client")
}
