//! States command - geographic distribution of trials.

use std::path::PathBuf;

use colored::Colorize;
use trialscope::aggregate::format_ratio;
use trialscope::view::ALL_STATES;
use trialscope::{Selector, StateView, TrialExplorer};

use super::{print_metrics, print_shares};
use crate::cli::{explorer_config, GeoArgs, LoadArgs};

pub fn run(
    file: PathBuf,
    state: Option<String>,
    geo: GeoArgs,
    load: LoadArgs,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    super::ensure_exists(&file)?;

    let explorer = TrialExplorer::from_config(explorer_config(&load, Some(&geo))?)?;
    let trials = explorer.load_trials(&file)?;
    let geo_trials = explorer.load_geo_enriched(&file)?;

    let state = state.map_or(Selector::All, |s| Selector::parse(&s.to_uppercase(), ALL_STATES));
    let (view, _) = StateView::build(&geo_trials, &trials, &state);

    if json_output {
        let output = serde_json::json!({
            "file": file.display().to_string(),
            "located_trials": geo_trials.len(),
            "states": view,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Trials by state in".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "{} of {} trials have a usable site zip code",
        geo_trials.len().to_string().white().bold(),
        trials.len()
    );
    println!();

    print_shares("States:", &view.states);
    println!();

    println!(
        "{} {}",
        "Statistics for".cyan().bold(),
        view.selection.white().bold()
    );
    if view.total_in_selection == 0 {
        println!("{}", "No trials in this selection.".yellow());
        return Ok(());
    }
    println!(
        "  Total trials in selection: {}",
        view.total_in_selection.to_string().white().bold()
    );
    println!(
        "  Percentage of all trials:  {}",
        format_ratio(view.percentage_of_all, "%")
    );
    println!();
    print_metrics(&view.metrics);

    Ok(())
}
