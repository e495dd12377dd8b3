mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use log;
use std::process;

use cli_args::{Cli, Commands, StoreOpts};
use repodoc_core::{AppError, Config, MemoryCatalog, OutputStore};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let core_err = e.downcast_ref::<AppError>();
            let exit_code = match core_err {
                Some(AppError::Config(_)) => 1,
                Some(AppError::TomlParse(_)) => 1,
                Some(AppError::TomlSerialize(_)) => 1,
                Some(AppError::Io(_)) => 2,
                Some(AppError::FileRead { .. }) => 2,
                Some(AppError::FileWrite { .. }) => 2,
                Some(AppError::DirCreation { .. }) => 2,
                Some(AppError::Walk { .. }) => 2,
                Some(AppError::Ignore(_)) => 2,
                Some(AppError::ArtifactNotFound(_)) => 3,
                Some(AppError::InvalidArgument(_)) => 5,
                Some(AppError::Json(_)) => 6,
                Some(_) => 1,
                None => 1,
            };

            // Keep critical argument and config errors visible even with -q.
            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }

            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(command) => match command {
            Commands::Generate(args) => {
                log::debug!("Executing 'generate' command...");
                commands::generate::handle_generate_command(args, quiet)?;
            }
            Commands::Render(args) => {
                log::debug!("Executing 'render' command...");
                commands::render::handle_render_command(args, quiet)?;
            }
            Commands::List(args) => {
                log::debug!("Executing 'list' command...");
                commands::list::handle_list_command(args, quiet)?;
            }
            Commands::Show(args) => {
                log::debug!("Executing 'show' command...");
                commands::show::handle_show_command(args, quiet)?;
            }
            Commands::Delete(args) => {
                log::debug!("Executing 'delete' command...");
                commands::delete::handle_delete_command(args, quiet)?;
            }
            Commands::Config(args) => {
                log::debug!("Executing 'config' command...");
                commands::config::handle_config_command(args, quiet)?;
            }
        },
    }
    Ok(())
}

// Helper to load config and open the artifact store it points at.
// Kept public as it's used by multiple command modules.
pub fn load_store_for_command(store_opts: &StoreOpts) -> Result<(Config, OutputStore)> {
    let config = Config::load(store_opts.config.config_file.as_ref())
        .context("Failed to load configuration")?;
    let dir = config.resolved_output_dir(store_opts.output_dir.as_ref());
    log::debug!("Using artifact directory: {}", dir.display());

    let store = OutputStore::open(&dir, Box::new(MemoryCatalog::new()))
        .with_context(|| format!("Failed to open artifact directory {}", dir.display()))?;
    Ok((config, store))
}
