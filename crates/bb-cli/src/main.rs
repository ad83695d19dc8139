//! Blackboard admin CLI
//!
//! Reconciles stored blackboards with their YAML mirror folders.

mod cli;
mod commands;
mod context;
mod error;
mod output;

use std::path::Path;

use bb_core::{DiffOptions, ImportOptions, SyncOptions};
use bb_store::Page;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{BlackboardAction, Cli, Commands};
use commands::diff::DiffArgs;
use context::GlobalArgs;
use error::Result;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "BBADMIN_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose || std::env::var_os(LOG_ENV).is_some() {
        init_tracing(cli.verbose);
    }

    let globals = GlobalArgs {
        store: cli.store,
        config_dir: cli.config_dir,
    };

    match cli.command {
        Some(Commands::Blackboard { action }) => {
            let cwd = std::env::current_dir()?;
            execute_blackboard(&cwd, &globals, action)
        }
        None => {
            println!("{} Blackboard admin CLI", "bbadmin".green().bold());
            println!();
            println!("Run {} for available commands.", "bbadmin --help".cyan());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        tracing::debug!("tracing enabled");
    }
}

fn execute_blackboard(cwd: &Path, globals: &GlobalArgs, action: BlackboardAction) -> Result<()> {
    match action {
        BlackboardAction::Diff {
            first,
            second,
            detailed,
            include_archived,
            json,
        } => commands::run_diff(
            cwd,
            globals,
            DiffArgs {
                first,
                second,
                options: DiffOptions {
                    detailed,
                    include_archived,
                },
                json,
            },
        ),
        BlackboardAction::Sync {
            source,
            target,
            delete,
            dry_run,
            force,
            clear_ids,
        } => commands::run_sync(
            cwd,
            globals,
            &source,
            &target,
            SyncOptions {
                delete,
                dry_run,
                force,
                clear_ids,
            },
        ),
        BlackboardAction::Import { folder, detailed } => {
            commands::run_import(cwd, globals, &folder, ImportOptions { detailed })
        }
        BlackboardAction::List {
            role,
            limit,
            offset,
            json,
        } => commands::run_list(cwd, globals, &role, Page::new(limit, offset), json),
        BlackboardAction::Get { id, json } => commands::run_get(cwd, globals, &id, json),
    }
}
