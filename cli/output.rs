use anyhow::{Context, Result};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use repodoc_core::ArtifactMetadata;

/// Writes an already-rendered document body to a file or to stdout.
pub fn print_body_or_save(body: &str, output_path: Option<&Path>, quiet: bool) -> Result<()> {
    match output_path {
        Some(path) => {
            write_to_file(path, body)?;
            if !quiet {
                println!(
                    "{} Document saved to: {}",
                    "✅".green(),
                    path.display().to_string().blue()
                );
            }
        }
        None => {
            write_to_stdout(body)?;
        }
    }
    Ok(())
}

pub fn write_to_file(path: &Path, content: &str) -> Result<()> {
    // A bare filename has an empty parent; nothing to create then.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    let mut file =
        File::create(path).with_context(|| format!("Failed to create file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to file {}", path.display()))?;
    Ok(())
}

fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

pub fn print_artifact_table(artifacts: &[ArtifactMetadata]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Id").fg(Color::Green),
        Cell::new("Project").fg(Color::Green),
        Cell::new("Format").fg(Color::Green),
        Cell::new("Created").fg(Color::Green),
        Cell::new("Size").fg(Color::Green),
    ]);
    for artifact in artifacts {
        table.add_row(vec![
            Cell::new(&artifact.id).fg(Color::Cyan),
            Cell::new(&artifact.project_name),
            Cell::new(artifact.format),
            Cell::new(artifact.created_at.format("%Y-%m-%d %H:%M:%S").to_string())
                .fg(Color::DarkGrey),
            Cell::new(artifact.size).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}
