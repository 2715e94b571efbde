//! CLI command implementations.

pub mod categories;
pub mod export;
pub mod inspect;
pub mod states;

use std::path::Path;

use colored::Colorize;
use trialscope::aggregate::format_ratio;
use trialscope::view::Share;
use trialscope::CriteriaMetrics;

/// Fail early with a readable message instead of an I/O error.
pub(crate) fn ensure_exists(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    Ok(())
}

/// Print a count table: value, count, percentage.
pub(crate) fn print_shares(title: &str, shares: &[Share]) {
    println!("{}", title.yellow().bold());
    if shares.is_empty() {
        println!("  {}", "(none)".dimmed());
        return;
    }
    for share in shares {
        println!(
            "  {:40} {:>6} {:>7}",
            share.value,
            share.count.to_string().white().bold(),
            format_ratio(share.percentage, "%")
        );
    }
}

/// Print the language criteria metrics of a selection.
pub(crate) fn print_metrics(metrics: &CriteriaMetrics) {
    println!("{}", "English Language Criteria:".yellow().bold());
    println!(
        "  English as inclusion criterion:      {} ({} of selected trials)",
        metrics.english_inclusion.to_string().white().bold(),
        format_ratio(metrics.english_inclusion_pct, "%")
    );
    println!(
        "  Non-English as exclusion criterion:  {} ({} of selected trials)",
        metrics.non_english_exclusion.to_string().white().bold(),
        format_ratio(metrics.non_english_exclusion_pct, "%")
    );
    println!();

    println!("{}", "Additional Languages:".yellow().bold());
    println!(
        "  Trials with add'l languages:         {} ({} of selected trials)",
        metrics.trials_with_other_language.to_string().white().bold(),
        format_ratio(metrics.other_language_pct, "%")
    );
    println!(
        "  Total add'l languages listed:        {}",
        metrics.total_language_mentions.to_string().white().bold()
    );
    println!(
        "  Avg add'l languages per trial:       {}",
        format_ratio(metrics.average_languages_per_trial, "")
    );

    if !metrics.language_breakdown.is_empty() {
        println!();
        println!("{}", "Language Breakdown:".yellow().bold());
        // Most frequent on top when reading a terminal
        for share in metrics.language_breakdown.iter().rev() {
            println!(
                "  {:30} {:>6} {:>7}",
                share.language,
                share.trials.to_string().white(),
                format_ratio(share.percentage, "%")
            );
        }
    }
}
