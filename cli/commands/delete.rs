use anyhow::{Context, Result};
use colored::Colorize;
use log;

use crate::cli_args::DeleteArgs;
use crate::load_store_for_command;

pub fn handle_delete_command(args: DeleteArgs, quiet: bool) -> Result<()> {
    let (_config, mut store) = load_store_for_command(&args.store)?;

    let metadata = store
        .delete(&args.id)
        .with_context(|| format!("Failed to delete artifact \"{}\"", args.id))?;
    log::info!("Deleted artifact '{}'.", metadata.id);

    if !quiet {
        println!(
            "{} Deleted artifact {} ({})",
            "✅".green(),
            metadata.id.cyan(),
            metadata.filename
        );
    }
    Ok(())
}
