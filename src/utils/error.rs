// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error), // Automatically convert calamine errors

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column not found: {0}")]
    MissingColumn(String),

    #[error("Sheet has no header row: {0}")]
    EmptySheet(String),

    #[error("Unsupported input file type: {0}")]
    UnsupportedFormat(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_error_wording_fits_merge_failures() {
        let err = AppError::from(TableError::MissingColumn("PARTES".to_string()));
        assert_eq!(err.to_string(), "Table error: Required column not found: PARTES");
    }
}
