// src/storage/input.rs
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::table::{Cell, SourceTable};
use crate::utils::error::TableError;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reads the input table: first row is the header row, empty cells are `None`.
///
/// Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) go through calamine,
/// using `sheet` or the first sheet. Delimited text (`.csv`, `.tsv`, `.txt`)
/// goes through the csv crate.
pub fn read_table<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<SourceTable, TableError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path, sheet),
        "csv" | "txt" => read_delimited(path, b','),
        "tsv" => read_delimited(path, b'\t'),
        _ => Err(TableError::UnsupportedFormat(path.display().to_string())),
    }
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<SourceTable, TableError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| TableError::EmptySheet(path.display().to_string()))?,
    };
    tracing::info!("Reading sheet '{}' from {}", sheet_name, path.display());

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| TableError::EmptySheet(sheet_name.clone()))?
        .iter()
        .map(|c| cell_text(c).unwrap_or_default())
        .collect();

    let body: Vec<Vec<Cell>> = rows
        .map(|r| r.iter().map(cell_text).collect())
        .collect();

    Ok(SourceTable::new(headers, body))
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<SourceTable, TableError> {
    tracing::info!("Reading delimited text from {}", path.display());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_path(path)?;

    let mut records = reader.records();

    let headers: Vec<String> = match records.next() {
        Some(record) => {
            let record = record?;
            record
                .iter()
                .enumerate()
                .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h })
                .map(str::to_string)
                .collect()
        }
        None => return Err(TableError::EmptySheet(path.display().to_string())),
    };

    let mut body = Vec::new();
    for record in records {
        let record = record?;
        body.push(
            record
                .iter()
                .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
                .collect(),
        );
    }

    Ok(SourceTable::new(headers, body))
}

/// Renders a workbook cell the way it reads on screen.
fn cell_text(data: &Data) -> Cell {
    match data {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map(|d| d.format(DATETIME_FORMAT).to_string())
                .unwrap_or_else(|| format_float(dt.as_f64())),
        ),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => Some(e.to_string()),
    }
}

// Integral floats lose their ".0" (ids and years are stored as floats).
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
