use anyhow::{Context, Result};
use colored::Colorize;
use log;

use crate::cli_args::GenerateArgs;
use crate::output;
use repodoc_core::{
    Config, MemoryCatalog, OutputFormat, OutputStore, generate_documentation, render_markdown,
};

pub fn handle_generate_command(args: GenerateArgs, quiet: bool) -> Result<()> {
    log::info!("Generating documentation for: {}", args.path.display());

    let config = Config::load(args.store.config.config_file.as_ref())
        .context("Failed to load configuration")?;

    let document = generate_documentation(&args.path)
        .with_context(|| format!("Failed to generate documentation for {}", args.path.display()))?;
    log::debug!(
        "Documentation generated: {} files, {} bytes.",
        document.stats.total_files,
        document.stats.total_size
    );

    if args.save {
        return save_artifacts(&args, &config, &document, quiet);
    }

    let format: OutputFormat = match args.format.as_deref() {
        Some(value) => value.parse()?,
        None => config.output.format.parse()?,
    };
    log::debug!("Rendering document as {}.", format);

    let body = match format {
        OutputFormat::Json => document.to_json(config.output.json_pretty)?,
        OutputFormat::Markdown => render_markdown(&document),
    };
    output::print_body_or_save(&body, args.output.as_deref(), quiet)
}

/// Persists both renderings of the document, like a full export. The JSON
/// artifact is the one `render` and `show` can reprocess later.
fn save_artifacts(
    args: &GenerateArgs,
    config: &Config,
    document: &repodoc_core::Document,
    quiet: bool,
) -> Result<()> {
    let dir = config.resolved_output_dir(args.store.output_dir.as_ref());
    let mut store = OutputStore::open(&dir, Box::new(MemoryCatalog::new()))
        .with_context(|| format!("Failed to open artifact directory {}", dir.display()))?;

    let source = args.path.display().to_string();
    for format in [OutputFormat::Json, OutputFormat::Markdown] {
        let metadata = store.save(document, &source, format, config.output.json_pretty)?;
        if !quiet {
            println!(
                "{} Documentation saved to: {} (id: {})",
                "✅".green(),
                metadata.file_path.display().to_string().blue(),
                metadata.id.cyan()
            );
        }
    }
    Ok(())
}
