//! dawdash CLI entry point

use clap::Parser;
use dawdash::config::{Cli, Settings};
use dawdash::pipeline;
use dawdash::view::{self, FolderTree};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli);

    // Validate inputs
    if let Err(e) = validate_inputs(&cli) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    // Build settings from CLI
    let settings = match Settings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Run the pipeline
    match pipeline::run(&settings) {
        Ok(result) => {
            if result.records.is_empty() {
                println!("No .{} projects found.", settings.format.extension());
            } else if cli.tree {
                let root = if settings.input.is_file() {
                    settings.input.parent().unwrap_or(settings.input.as_path())
                } else {
                    settings.input.as_path()
                };
                print!("{}", FolderTree::build(root, &result.records).render());
            } else {
                print!("{}", view::render(&result.records));
            }

            println!();
            println!(
                "Summary: {} read, {} unreadable (of {} {} projects)",
                result.extracted,
                result.failed,
                result.total_files,
                settings.format
            );

            if let Some(path) = &result.csv_path {
                println!("Wrote {}", path.display());
            }
            if let Some(path) = &result.json_path {
                println!("Wrote {}", path.display());
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = cli.log_level().to_string().to_lowercase();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn validate_inputs(cli: &Cli) -> Result<(), String> {
    if !cli.input.exists() {
        return Err(format!(
            "Input path does not exist: {}\n\n  Tip: Check the path is correct and accessible.\n  Examples:\n    dawdash -i ~/Music/Ableton -f als\n    dawdash -i ./Songs -f song -o ./export --extended-csv",
            cli.input.display()
        ));
    }

    // The output directory itself is created, its parent must exist
    if let Some(parent) = cli.output.as_deref().and_then(|o| o.parent()) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(format!(
                "Output parent directory does not exist: {}\n\n  Tip: The output directory will be created automatically,\n  but its parent directory must exist.\n  Example: mkdir -p {}",
                parent.display(),
                parent.display()
            ));
        }
    }

    Ok(())
}
