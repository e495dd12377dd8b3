use anyhow::Result;
use colored::*;
use log;

use crate::cli_args::ShowArgs;
use crate::load_store_for_command;
use crate::output;
use repodoc_core::{AppError, OutputStore};

pub fn handle_show_command(args: ShowArgs, quiet: bool) -> Result<()> {
    let (_config, mut store) = load_store_for_command(&args.store)?;

    match store.read_body(&args.id) {
        Ok(body) => {
            log::debug!("Artifact '{}' read ({} bytes).", args.id, body.len());
            output::print_body_or_save(&body, None, quiet)
        }
        Err(AppError::ArtifactNotFound(id)) => {
            eprintln!("{} Artifact \"{}\" not found.", "Error:".red(), id.blue());
            list_available_ids(&store);
            Err(AppError::ArtifactNotFound(id).into())
        }
        Err(e) => Err(e.into()),
    }
}

fn list_available_ids(store: &OutputStore) {
    // Always print the id listing to stderr
    eprintln!("\nAvailable artifacts:");
    let artifacts = store.list();
    if artifacts.is_empty() {
        eprintln!("  {}", "(None available)".dimmed());
        return;
    }
    for artifact in artifacts {
        eprintln!("  - {}", artifact.id.blue());
    }
}
