use anyhow::{Context, Result};
use colored::Colorize;
use log;
use std::path::PathBuf;

use crate::cli_args::ConfigArgs;
use crate::output;
use repodoc_core::{AppError, Config, config::DEFAULT_CONFIG_FILENAME};

pub fn handle_config_command(args: ConfigArgs, quiet: bool) -> Result<()> {
    if args.init {
        return init_config_file(&args, quiet);
    }

    let config =
        Config::load(args.config.config_file.as_ref()).context("Failed to load configuration")?;
    let body = toml::to_string_pretty(&config).map_err(AppError::from)?;
    output::print_body_or_save(&body, None, quiet)
}

fn init_config_file(args: &ConfigArgs, quiet: bool) -> Result<()> {
    let path = match args.config.config_file.as_deref() {
        Some(custom) => PathBuf::from(custom),
        None => PathBuf::from(DEFAULT_CONFIG_FILENAME),
    };

    if path.exists() {
        anyhow::bail!(AppError::Config(format!(
            "Refusing to overwrite existing config file {}",
            path.display()
        )));
    }

    let body = Config::default_toml()?;
    output::write_to_file(&path, &body)?;
    log::info!("Wrote default configuration to {}", path.display());

    if !quiet {
        println!(
            "{} Default configuration written to: {}",
            "✅".green(),
            path.display().to_string().blue()
        );
    }
    Ok(())
}
