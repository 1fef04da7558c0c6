// src/table/merge.rs
use serde::Serialize;

use super::columns::{order_generated, ColumnSet};
use super::{Cell, OutputTable, SourceTable};
use crate::extractors::{parse_case_info, parse_parties, FieldSet, NOT_INFORMED};
use crate::utils::error::TableError;

/// Which source columns feed the extractors, and how to treat leftovers.
#[derive(Debug, Clone)]
pub struct MergeOptions<'a> {
    pub case_column: &'a str,
    pub parties_column: &'a str,
    pub keep_unlisted: bool,
}

/// Counters reported after a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub rows: usize,
    pub passthrough_columns: usize,
    pub generated_columns: usize,
    pub exported_columns: usize,
    pub rows_without_case: usize,
}

/// Per-row extraction results, kept until every column is known.
struct RowFields {
    case: FieldSet,
    parties: FieldSet,
}

impl RowFields {
    fn value(&self, name: &str) -> Cell {
        self.case
            .get(name)
            .or_else(|| self.parties.get(name))
            .map(str::to_string)
    }
}

/// Runs both extractors over every row and assembles the wide output table.
///
/// Fails only when one of the two source columns is missing. Row order and
/// row count are preserved.
pub fn assemble(
    source: &SourceTable,
    options: &MergeOptions<'_>,
) -> Result<(OutputTable, MergeReport), TableError> {
    let case_idx = source.column_index(options.case_column)?;
    let parties_idx = source.column_index(options.parties_column)?;

    let passthrough: Vec<usize> = (0..source.headers.len())
        .filter(|&i| i != case_idx && i != parties_idx)
        .collect();

    // First pass: extract, and grow the column sets as names are discovered.
    let mut case_columns = ColumnSet::new();
    let mut party_columns = ColumnSet::new();
    let mut extracted = Vec::with_capacity(source.len());
    let mut rows_without_case = 0;

    for row in 0..source.len() {
        let case = parse_case_info(source.cell(row, case_idx));
        let parties = parse_parties(source.cell(row, parties_idx));

        if case.get("Processo 1") == Some(NOT_INFORMED) {
            rows_without_case += 1;
        }
        tracing::debug!(
            "Row {}: {} case fields, {} party fields",
            row + 1,
            case.len(),
            parties.len()
        );

        case_columns.extend(case.names());
        party_columns.extend(parties.names());
        extracted.push(RowFields { case, parties });
    }

    let mut generated = case_columns;
    generated.extend(party_columns.iter());
    let ordered = order_generated(&generated, options.keep_unlisted);

    // Second pass: lay every row out on the final header.
    let mut headers: Vec<String> = passthrough
        .iter()
        .map(|&i| source.headers[i].clone())
        .collect();
    headers.extend(ordered.iter().cloned());

    let rows: Vec<Vec<Cell>> = extracted
        .iter()
        .zip(&source.rows)
        .map(|(fields, src)| {
            passthrough
                .iter()
                .map(|&i| src[i].clone())
                .chain(ordered.iter().map(|name| fields.value(name)))
                .collect()
        })
        .collect();

    let report = MergeReport {
        rows: rows.len(),
        passthrough_columns: passthrough.len(),
        generated_columns: generated.len(),
        exported_columns: headers.len(),
        rows_without_case,
    };

    Ok((OutputTable { headers, rows }, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS: MergeOptions<'static> = MergeOptions {
        case_column: "PJE",
        parties_column: "PARTES",
        keep_unlisted: false,
    };

    fn s(v: &str) -> Cell {
        Some(v.to_string())
    }

    fn source() -> SourceTable {
        SourceTable::new(
            vec!["ID".into(), "PJE".into(), "COMARCA".into(), "PARTES".into()],
            vec![
                vec![
                    s("1"),
                    s("0000001-11.2019.8.12.0001 <b>Autuação:</b>10/03/2019"),
                    s("Campo Grande"),
                    s("<b>REQUERENTE:</b> Maria</br><b>FILHO:</b> Pedro (NASCIMENTO: 01/01/2015)"),
                ],
                vec![
                    s("2"),
                    s("0000002-22.2021.8.12.0002 <b>Autuação:</b>05/07/2021 \
                       0000003-33.2022.8.12.0003 <b>Autuação:</b>30/11/2022"),
                    None,
                    s("<b>REQUERIDO:</b> José<b>ADVOGADO:</b> Dr. Silva"),
                ],
                vec![s("3"), None, s("Dourados"), None],
            ],
        )
    }

    #[test]
    fn builds_wide_table_in_export_order() {
        let (table, report) = assemble(&source(), &OPTIONS).unwrap();

        assert_eq!(
            table.headers,
            vec![
                "ID",
                "COMARCA",
                "Processo 1",
                "Autuação 1",
                "Processo 2",
                "Autuação 2",
                "REQUERENTE 1",
                "REQUERIDO 1",
                "CRIANÇA OU ADOLESCENTE 1",
                "NASCIMENTO 1",
            ]
        );
        assert_eq!(report.rows, 3);
        assert_eq!(report.passthrough_columns, 2);
        assert_eq!(report.generated_columns, 9);
        assert_eq!(report.exported_columns, 10);
        assert_eq!(report.rows_without_case, 1);
    }

    #[test]
    fn missing_values_are_blank_and_rows_preserved() {
        let (table, _) = assemble(&source(), &OPTIONS).unwrap();
        assert_eq!(table.rows.len(), 3);

        assert_eq!(
            table.column("Processo 2").unwrap(),
            vec![None, Some("0000003-33.2022.8.12.0003"), None]
        );
        assert_eq!(
            table.column("Processo 1").unwrap(),
            vec![
                Some("0000001-11.2019.8.12.0001"),
                Some("0000002-22.2021.8.12.0002"),
                Some(NOT_INFORMED),
            ]
        );
        assert_eq!(table.column("COMARCA").unwrap(), vec![Some("Campo Grande"), None, Some("Dourados")]);
        assert_eq!(table.column("NASCIMENTO 1").unwrap(), vec![Some("01/01/2015"), None, None]);
    }

    #[test]
    fn keep_unlisted_appends_leftover_columns() {
        let options = MergeOptions { keep_unlisted: true, ..OPTIONS };
        let (table, _) = assemble(&source(), &options).unwrap();
        assert_eq!(table.headers.last().map(String::as_str), Some("ADVOGADO 1"));
        assert_eq!(table.column("ADVOGADO 1").unwrap(), vec![None, Some("DR. SILVA"), None]);
    }

    #[test]
    fn missing_parties_column_fails() {
        let source = SourceTable::new(vec!["PJE".into()], vec![vec![None]]);
        let result = assemble(&source, &OPTIONS);
        assert!(matches!(result, Err(TableError::MissingColumn(ref c)) if c == "PARTES"));
    }

    #[test]
    fn empty_source_gives_header_only_table() {
        let source = SourceTable::new(vec!["PJE".into(), "PARTES".into()], vec![]);
        let (table, report) = assemble(&source, &OPTIONS).unwrap();
        assert!(table.rows.is_empty());
        assert!(table.headers.is_empty());
        assert_eq!(report.rows, 0);
    }
}
