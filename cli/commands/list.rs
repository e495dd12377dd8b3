use anyhow::Result;
use log;

use crate::cli_args::ListArgs;
use crate::load_store_for_command;
use crate::output;

pub fn handle_list_command(args: ListArgs, quiet: bool) -> Result<()> {
    let (_config, store) = load_store_for_command(&args.store)?;

    let artifacts = store.list();
    log::debug!("Listing {} artifacts.", artifacts.len());

    if artifacts.is_empty() {
        if !quiet {
            println!("No artifacts found in {}", store.dir().display());
        }
        return Ok(());
    }

    output::print_artifact_table(&artifacts);
    Ok(())
}
