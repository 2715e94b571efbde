//! Inspect command - show what a trials file contains.

use std::path::PathBuf;

use colored::Colorize;
use trialscope::{InspectView, TrialExplorer};

use crate::cli::LoadArgs;

pub fn run(
    file: PathBuf,
    load: LoadArgs,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    super::ensure_exists(&file)?;

    let explorer = TrialExplorer::with_config(load.loader_config()?);
    let trials = explorer.load_trials(&file)?;
    let source = explorer
        .source_metadata(&file)
        .ok_or_else(|| format!("No source metadata recorded for {}", file.display()))?;
    let view = InspectView::build(source, &trials);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Inspecting".cyan().bold(),
        view.source.file.white()
    );
    println!();
    println!("  Format:     {}", view.source.format);
    println!("  Size:       {} bytes", view.source.size_bytes);
    println!("  Rows:       {}", view.source.row_count.to_string().white().bold());
    println!("  Columns:    {}", view.source.column_count);
    println!("  Hash:       {}", view.source.hash.dimmed());
    println!("  Loaded at:  {}", view.source.loaded_at.to_rfc3339());
    println!("  Identifier: {}", view.id_column.white());
    println!();

    println!("{}", "Analysis columns:".yellow().bold());
    for column in &view.present_columns {
        println!("  {} {}", "✓".green(), column);
    }
    for column in &view.missing_columns {
        println!("  {} {} {}", "✗".red(), column, "(missing, reported as zero)".dimmed());
    }

    Ok(())
}
