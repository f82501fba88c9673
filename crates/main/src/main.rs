use std::error::Error;

use clap::{Parser, Subcommand};

/// Renders the pdf_dsl demo documents from the command line.
///
/// Fonts must be present under `assets/fonts` relative to the `pdf_dsl` crate,
/// installed system-wide, or provided via the `PDF_DSL_FONTS_DIR` environment
/// variable before running the commands below.
#[derive(Parser)]
#[command(author, version, about = "Convenience CLI for the pdf_dsl demos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the sample report to `report.pdf`.
    #[command(name = "report")]
    Report,

    /// Render the uneven table demo to `table.pdf`.
    #[command(name = "table", aliases = ["uneven-table"])]
    Table,

    /// Render every demo under `target/run_all_demos`.
    #[command(name = "run-all", aliases = ["run_all", "all"])]
    RunAll,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report => pdf_dsl::demos::run_report(),
        Commands::Table => pdf_dsl::demos::run_table(),
        Commands::RunAll => pdf_dsl::demos::run_all_demos(),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
