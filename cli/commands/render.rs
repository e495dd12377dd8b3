use anyhow::{Context, Result};
use log;
use std::fs;

use crate::cli_args::RenderArgs;
use crate::output;
use repodoc_core::{AppError, Document, render_markdown};

pub fn handle_render_command(args: RenderArgs, quiet: bool) -> Result<()> {
    log::info!("Rendering document: {}", args.document.display());

    let text = fs::read_to_string(&args.document).map_err(|source| AppError::FileRead {
        path: args.document.clone(),
        source,
    })?;

    let document = Document::from_json(&text)
        .with_context(|| format!("Invalid document JSON in {}", args.document.display()))?;
    log::debug!(
        "Document loaded: '{}', {} files.",
        document.project_info.name,
        document.files.len()
    );

    let markdown = render_markdown(&document);
    output::print_body_or_save(&markdown, args.output.as_deref(), quiet)
}
