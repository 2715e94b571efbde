//! Export command - write the trials of a selection as CSV.

use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use trialscope::view::{ALL_CATEGORIES, ALL_STATES, ALL_SUB_CATEGORIES};
use trialscope::{
    export_csv, save_export, CategoryView, Selector, StateView, SubCategoryView, TrialExplorer,
};

use crate::cli::{explorer_config, GeoArgs, LoadArgs};

/// Which rows to export. A state selection is independent of the category
/// and sub-category selections.
#[derive(Debug, Default)]
pub struct Selection {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub state: Option<String>,
}

pub fn run(
    file: PathBuf,
    selection: Selection,
    output: PathBuf,
    to_stdout: bool,
    geo: GeoArgs,
    load: LoadArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    super::ensure_exists(&file)?;

    let geo = selection.state.is_some().then_some(&geo);
    let explorer = TrialExplorer::from_config(explorer_config(&load, geo)?)?;
    let trials = explorer.load_trials(&file)?;

    let (label, selected) = if let Some(state) = &selection.state {
        let geo_trials = explorer.load_geo_enriched(&file)?;
        let state = Selector::parse(&state.to_uppercase(), ALL_STATES);
        let (view, selected) = StateView::build(&geo_trials, &trials, &state);
        (view.selection, selected)
    } else {
        let category = selection
            .category
            .as_deref()
            .map_or(Selector::All, |c| Selector::parse(c, ALL_CATEGORIES));
        let (category_view, selected) = CategoryView::build(&trials, &category);

        match selection.sub_category.as_deref() {
            Some(sub) => {
                let sub = Selector::parse(sub, ALL_SUB_CATEGORIES);
                let (view, selected) = SubCategoryView::build(&selected, &sub);
                (view.selection, selected)
            }
            None => (category_view.selection, selected),
        }
    };

    if to_stdout {
        std::io::stdout().write_all(&export_csv(&selected)?)?;
        return Ok(());
    }

    let path = save_export(&selected, &output, &label)?;
    println!(
        "{} {} trials ({}) to {}",
        "Exported".green().bold(),
        selected.len().to_string().white().bold(),
        label,
        path.display().to_string().white()
    );

    Ok(())
}
