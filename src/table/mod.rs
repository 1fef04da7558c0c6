// src/table/mod.rs
pub mod columns;
pub mod merge;

use crate::utils::error::TableError;

/// One spreadsheet cell; `None` when the cell is empty.
pub type Cell = Option<String>;

/// Input table as read from the uploaded file: header row plus data rows.
/// Every row is padded to the header width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SourceTable {
    pub fn new(headers: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, None);
        }
        Self { headers, rows }
    }

    /// Position of a required column, failing the whole run when absent.
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Final wide table handed to storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[cfg(test)]
impl OutputTable {
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.headers.iter().position(|h| h == name)?;
        Some(self.rows.iter().map(|r| r[idx].as_deref()).collect())
    }
}
