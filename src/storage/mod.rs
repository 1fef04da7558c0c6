// src/storage/mod.rs
pub mod input;

use std::fs;
use std::path::{Path, PathBuf};

use crate::table::merge::MergeReport;
use crate::table::OutputTable;
use crate::utils::error::StorageError;

/// What a finished run records next to its output table.
#[derive(Debug, Clone)]
pub struct RunSummary<'a> {
    pub input: &'a Path,
    pub sheet: Option<&'a str>,
    pub output: &'a Path,
    pub report: &'a MergeReport,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Writes the cleaned table as delimited text. Empty cells become empty fields.
    pub fn save_table(
        &self,
        table: &OutputTable,
        file_name: &str,
        delimiter: u8,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(file_name);

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(&file_path)?;

        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
        }
        writer.flush().map_err(StorageError::IoError)?;

        tracing::info!(
            "Saved {} rows x {} columns to {}",
            table.rows.len(),
            table.headers.len(),
            file_path.display()
        );

        Ok(file_path)
    }

    /// Saves metadata about the run in JSON format, next to the table.
    pub fn save_run_metadata(&self, summary: &RunSummary<'_>) -> Result<PathBuf, StorageError> {
        let stem = summary
            .output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("cleaned_data");
        let file_path = self.base_dir.join(format!("{}_meta.json", stem));

        let metadata = serde_json::json!({
            "input": summary.input.display().to_string(),
            "sheet": summary.sheet,
            "output": summary.output.display().to_string(),
            "report": summary.report,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}
