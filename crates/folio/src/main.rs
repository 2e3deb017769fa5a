//! Folio CLI - flat-file page repository.
//!
//! Provides commands for:
//! - `index`, `list`: enumerate pages
//! - `show`, `breadcrumb`: inspect a single page
//! - `create`, `update`, `patch`, `delete`: modify pages

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    BreadcrumbArgs, CreateArgs, DeleteArgs, IndexArgs, ListArgs, PatchArgs, RepositoryArgs,
    ShowArgs, UpdateArgs,
};
use error::CliError;
use output::Output;

/// Folio - flat-file page repository.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(flatten)]
    repository: RepositoryArgs,

    /// Enable verbose output (repository and storage logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List page identifiers found on disk.
    Index(IndexArgs),
    /// List pages, optionally filtered and ordered.
    List(ListArgs),
    /// Print a single page.
    Show(ShowArgs),
    /// Print the ancestors of a page, root first.
    Breadcrumb(BreadcrumbArgs),
    /// Create a new page.
    Create(CreateArgs),
    /// Replace a page with the contents of a file.
    Update(UpdateArgs),
    /// Change individual fields of a page.
    Patch(PatchArgs),
    /// Delete a page.
    Delete(DeleteArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, output: &Output) -> Result<(), CliError> {
    let repo = cli.repository.open()?;

    match cli.command {
        Commands::Index(args) => args.execute(&repo, output),
        Commands::List(args) => args.execute(&repo, output),
        Commands::Show(args) => args.execute(&repo, output),
        Commands::Breadcrumb(args) => args.execute(&repo, output),
        Commands::Create(args) => args.execute(&repo, output),
        Commands::Update(args) => args.execute(&repo, output),
        Commands::Patch(args) => args.execute(&repo, output),
        Commands::Delete(args) => args.execute(&repo, output),
    }
}
