//! Categories command - category and sub-category drill-down.

use std::path::PathBuf;

use colored::Colorize;
use trialscope::view::{ALL_CATEGORIES, ALL_SUB_CATEGORIES};
use trialscope::{CategoryView, Selector, SubCategoryView, TrialExplorer};

use super::{print_metrics, print_shares};
use crate::cli::LoadArgs;

pub fn run(
    file: PathBuf,
    category: Option<String>,
    sub_category: Option<String>,
    load: LoadArgs,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    super::ensure_exists(&file)?;

    let explorer = TrialExplorer::with_config(load.loader_config()?);
    let trials = explorer.load_trials(&file)?;

    let category = category.map_or(Selector::All, |c| Selector::parse(&c, ALL_CATEGORIES));
    let sub_category =
        sub_category.map_or(Selector::All, |s| Selector::parse(&s, ALL_SUB_CATEGORIES));

    let (category_view, selected) = CategoryView::build(&trials, &category);
    let (sub_view, _) = SubCategoryView::build(&selected, &sub_category);

    if json_output {
        let output = serde_json::json!({
            "file": file.display().to_string(),
            "category": category_view,
            "sub_category": sub_view,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Trial categories in".cyan().bold(),
        file.display().to_string().white()
    );
    println!();
    println!(
        "Total trials analyzed: {}",
        category_view.total_trials.to_string().white().bold()
    );
    println!();

    if category_view.has_category {
        print_shares("Categories:", &category_view.categories);
    } else {
        println!("{}", "Category column not found in the dataset.".yellow());
    }
    println!();

    println!(
        "{} {}",
        "Statistics for".cyan().bold(),
        category_view.selection.white().bold()
    );
    print_metrics(&category_view.metrics);
    println!();

    if !sub_view.has_sub_category {
        println!("{}", "Sub-category column not found in the dataset.".yellow());
        return Ok(());
    }

    print_shares("Sub-categories:", &sub_view.sub_categories);
    println!();
    println!(
        "{} {} {}",
        "Statistics for".cyan().bold(),
        sub_view.selection.white().bold(),
        format!("(within {})", category_view.selection).dimmed()
    );
    print_metrics(&sub_view.metrics);

    Ok(())
}
