mod cli;
mod commands;
mod config;
mod error;
mod jpeg;
mod listing;
mod mcp;
mod pdf;
mod raster;
mod shell;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use commands::Outcome;
use config::Config;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use ui::TerminalUi;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v. Logs go to stderr; stdout carries MCP traffic.
    let filter = if cli.verbose { "pdftools=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let config = Config::new(cli.poppler_dir);

    let outcome = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Mcp => {
            mcp::run_server(config).await?;
            Outcome::Succeeded
        }
        Commands::Shell => {
            shell::run(config).context("Terminal I/O failed")?;
            Outcome::Succeeded
        }
        Commands::PdfToImages {
            path,
            keep_intermediate,
        } => {
            let mut ui = TerminalUi::stdio();
            commands::pdf_to_images::run(&path, &config, keep_intermediate, &mut ui)
        }
        Commands::ImagesToPdf { folder, output } => {
            let mut ui = TerminalUi::stdio();
            commands::images_to_pdf::run(&folder, output.as_deref(), &mut ui)
        }
        Commands::Merge { folder, output } => {
            let mut ui = TerminalUi::stdio();
            commands::merge::run(&folder, output.as_deref(), &mut ui)
        }
        Commands::Check => commands::check::run(&config, &mut io::stdout(), &mut io::stderr()),
    };

    Ok(outcome.exit_code())
}
