//! Trialscope CLI - language-criteria analysis of clinical trials.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect { file, load, json } => commands::inspect::run(file, load, json),

        Commands::Categories {
            file,
            category,
            sub_category,
            load,
            json,
        } => commands::categories::run(file, category, sub_category, load, json),

        Commands::States {
            file,
            state,
            geo,
            load,
            json,
        } => commands::states::run(file, state, geo, load, json),

        Commands::Export {
            file,
            category,
            sub_category,
            state,
            output,
            stdout,
            geo,
            load,
        } => commands::export::run(
            file,
            commands::export::Selection {
                category,
                sub_category,
                state,
            },
            output,
            stdout,
            geo,
            load,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so JSON on stdout stays clean. `--verbose` forces debug,
/// otherwise `RUST_LOG` applies with `warn` as the default.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
