//! sk CLI entry point

use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Stylize;
use tracing_subscriber::EnvFilter;

use sk_cli::cmd;
use sk_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install {
            source,
            name,
            force,
        } => cmd::install::install(&source, name.as_deref(), force).await,
        Commands::Search {
            keyword,
            limit,
            popular,
        } => cmd::search::search(&keyword.join(" "), limit, popular).await,
        Commands::Category { name } => cmd::category::category(&name).await,
        Commands::List => cmd::list::list(),
        Commands::Info { name } => cmd::info::info(&name),
        Commands::Uninstall { name, yes } => cmd::uninstall::uninstall(&name, yes),
        Commands::Update { name } => cmd::update::update(name.as_deref()),
        Commands::Config { init } => cmd::config::config(init),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
