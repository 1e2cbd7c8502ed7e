//! sk - install and browse Claude skills
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! # Directory Layout
//!
//! ```text
//! ~/.sk/
//! ├── config.toml          # Settings
//! ├── state.db             # Install receipts
//! └── cache/registry.json  # Last fetched registry
//!
//! ~/.claude/skills/<name>/SKILL.md
//! ```

pub mod cmd;
pub mod ui;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sk")]
#[command(author, version, about = "sk - install and browse Claude skills")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a skill from the registry, owner/repo[/path], or a repository URL
    Install {
        /// Skill name, owner/repo[/path], or https://<host>/<owner>/<repo>[/tree/<branch>/<path>]
        source: String,
        /// Install under a different local name
        #[arg(long)]
        name: Option<String>,
        /// Overwrite an existing skill with the same name
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Search the registry and GitHub (lists popular skills when no keyword is given)
    #[command(visible_alias = "s", alias = "find")]
    Search {
        /// Keywords matched against name, description, and tags
        keyword: Vec<String>,
        /// Maximum number of GitHub repositories to show
        #[arg(long, short = 'l', default_value_t = 10)]
        limit: usize,
        /// Show popular skills
        #[arg(long, short = 'p')]
        popular: bool,
    },
    /// List registry skills in a category
    Category {
        /// Category name
        name: String,
    },
    /// List installed skills
    List,
    /// Show details of an installed skill
    Info {
        /// Skill name
        name: String,
    },
    /// Remove an installed skill
    #[command(alias = "remove")]
    Uninstall {
        /// Skill name
        name: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Update installed skills (not supported)
    Update {
        /// Skill name
        name: Option<String>,
    },
    /// Print the effective configuration
    Config {
        /// Write config.toml with every setting filled in
        #[arg(long)]
        init: bool,
    },
}
