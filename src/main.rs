// src/main.rs
mod config;
mod extractors;
mod storage;
mod table;
mod utils;

use clap::Parser;
use config::{Args, RunConfig};
use extractors::{case_info, parties};
use storage::{RunSummary, StorageManager};
use table::merge::{self, MergeOptions};
use utils::html_debug::{self, DebugCell};
use utils::AppError;

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);
    let config = RunConfig::from_args(args)?;

    // 3. Read the whole input table
    let source = storage::input::read_table(&config.input, config.sheet.as_deref())?;
    tracing::info!(
        "Read {} rows, {} columns from {}",
        source.len(),
        source.headers.len(),
        config.input.display()
    );
    if source.is_empty() {
        tracing::warn!("Input has a header row but no data rows");
    }

    // 4. Extract and reshape
    let options = MergeOptions {
        case_column: &config.case_column,
        parties_column: &config.parties_column,
        keep_unlisted: config.keep_unlisted,
    };
    let (output, report) = merge::assemble(&source, &options)?;
    tracing::info!(
        "Built {} columns ({} generated) for {} rows; {} rows without a case number",
        report.exported_columns,
        report.generated_columns,
        report.rows,
        report.rows_without_case
    );

    // 5. Save table and metadata
    let storage = StorageManager::new(&config.output_dir)?;

    if config.debug {
        let debug_dir = storage.base_dir().join("debug");
        std::fs::create_dir_all(&debug_dir)?;

        // Columns were validated by assemble above.
        let case_idx = source.column_index(&config.case_column)?;
        let parties_idx = source.column_index(&config.parties_column)?;
        let mut cells = Vec::with_capacity(source.len() * 2);
        for row in 0..source.len() {
            for (idx, column) in [(case_idx, &config.case_column), (parties_idx, &config.parties_column)] {
                if let Some(text) = source.cell(row, idx) {
                    cells.push(DebugCell { title: format!("Linha {} {}", row + 1, column), text });
                }
            }
        }

        let debug_patterns = [
            (case_info::CASE_PAIR_PATTERN, "case"),
            (parties::PARTY_LABEL_PATTERN, "party"),
            (parties::BIRTHDATE_PATTERN, "birthdate"),
        ];
        let debug_html_path = debug_dir.join("extraction_annotated.html");
        if let Err(e) = html_debug::create_debug_html(&cells, &debug_html_path, &debug_patterns) {
            tracing::warn!("Failed to create debug HTML: {}", e);
        }
    }

    let output_path = storage.save_table(&output, &config.output_name, config.delimiter)?;

    let summary = RunSummary {
        input: &config.input,
        sheet: config.sheet.as_deref(),
        output: &output_path,
        report: &report,
    };
    match storage.save_run_metadata(&summary) {
        Ok(path) => tracing::info!("Saved run metadata to: {}", path.display()),
        Err(e) => tracing::error!("Failed to save run metadata: {}", e),
    }

    tracing::info!("Processing finished. Output: {}", output_path.display());
    Ok(())
}
