// src/table/columns.rs
use std::collections::HashSet;

use crate::extractors::parties::{BIRTHDATE_LABEL, MINOR_LABEL};

/// Growable ordered set of generated column names, in first-discovery order
/// across all rows.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    order: Vec<String>,
    known: HashSet<String>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name` at the end unless it is already known.
    pub fn add(&mut self, name: &str) {
        if self.known.insert(name.to_string()) {
            self.order.push(name.to_string());
        }
    }

    pub fn extend<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.add(name);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Category of a generated column, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    CaseIdentifier,
    Institution,
    Petitioner,
    Respondent,
}

impl Group {
    const ORDER: [Group; 4] = [
        Group::CaseIdentifier,
        Group::Institution,
        Group::Petitioner,
        Group::Respondent,
    ];

    fn claims(self, name: &str) -> bool {
        match self {
            Group::CaseIdentifier => name.starts_with("Processo") || name.starts_with("Autuação"),
            Group::Institution => name.contains("INSTITUIÇÃO"),
            Group::Petitioner => name.contains("REQUERENTE"),
            Group::Respondent => name.contains("REQUERIDO"),
        }
    }
}

/// Orders the generated columns for export.
///
/// Case identifiers come first, then institution, petitioner and respondent
/// columns, then minors interleaved with their birthdates. Minors and
/// birthdates are paired by position in discovery order, not by numeric
/// suffix, and the pairing stops at the shorter of the two lists.
///
/// Columns no group claims are dropped, or appended in discovery order when
/// `keep_unlisted` is set. No column appears twice. Passthrough columns are
/// never regrouped, even when their names match a group.
pub fn order_generated(generated: &ColumnSet, keep_unlisted: bool) -> Vec<String> {
    if generated.is_empty() {
        return Vec::new();
    }

    let mut placed: HashSet<&str> = HashSet::new();
    let mut ordered: Vec<String> = Vec::with_capacity(generated.len());

    for group in Group::ORDER {
        for name in generated.iter().filter(|n| group.claims(n)) {
            if placed.insert(name) {
                ordered.push(name.to_string());
            }
        }
    }

    let minors: Vec<&str> = generated
        .iter()
        .filter(|n| n.contains(MINOR_LABEL) && !placed.contains(n))
        .collect();
    let birthdates: Vec<&str> = generated
        .iter()
        .filter(|n| n.contains(BIRTHDATE_LABEL) && !placed.contains(n))
        .collect();

    if minors.len() != birthdates.len() {
        tracing::warn!(
            "Minor/birthdate column counts differ ({} vs {}); extra columns are not exported",
            minors.len(),
            birthdates.len()
        );
    }

    for (minor, birthdate) in minors.into_iter().zip(birthdates) {
        placed.insert(minor);
        placed.insert(birthdate);
        ordered.push(minor.to_string());
        ordered.push(birthdate.to_string());
    }

    if keep_unlisted {
        for name in generated.iter() {
            if placed.insert(name) {
                ordered.push(name.to_string());
            }
        }
    } else {
        let dropped = generated.iter().filter(|n| !placed.contains(n)).count();
        if dropped > 0 {
            tracing::debug!("Dropping {} generated columns outside the export groups", dropped);
        }
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> ColumnSet {
        let mut columns = ColumnSet::new();
        columns.extend(names.iter().copied());
        columns
    }

    #[test]
    fn column_set_keeps_first_discovery_order() {
        let mut columns = set(&["Processo 1", "Autuação 1"]);
        columns.extend(["Processo 1", "Autuação 1", "Processo 2", "Autuação 2"]);
        let names: Vec<_> = columns.iter().collect();
        assert_eq!(names, vec!["Processo 1", "Autuação 1", "Processo 2", "Autuação 2"]);
    }

    #[test]
    fn groups_are_emitted_in_fixed_order() {
        let columns = set(&[
            "Processo 1",
            "Autuação 1",
            "REQUERIDO 1",
            "CRIANÇA OU ADOLESCENTE 1",
            "NASCIMENTO 1",
            "REQUERENTE 1",
            "INSTITUIÇÃO 1",
            "Processo 2",
            "Autuação 2",
            "REQUERENTE 2",
        ]);
        assert_eq!(
            order_generated(&columns, false),
            vec![
                "Processo 1",
                "Autuação 1",
                "Processo 2",
                "Autuação 2",
                "INSTITUIÇÃO 1",
                "REQUERENTE 1",
                "REQUERENTE 2",
                "REQUERIDO 1",
                "CRIANÇA OU ADOLESCENTE 1",
                "NASCIMENTO 1",
            ]
        );
    }

    #[test]
    fn minors_and_birthdates_interleave_by_position() {
        let columns = set(&[
            "CRIANÇA OU ADOLESCENTE 1",
            "NASCIMENTO 1",
            "CRIANÇA OU ADOLESCENTE 2",
            "NASCIMENTO 2",
        ]);
        assert_eq!(
            order_generated(&columns, false),
            vec![
                "CRIANÇA OU ADOLESCENTE 1",
                "NASCIMENTO 1",
                "CRIANÇA OU ADOLESCENTE 2",
                "NASCIMENTO 2",
            ]
        );
    }

    #[test]
    fn uneven_minor_groups_truncate_to_shorter() {
        let columns = set(&[
            "CRIANÇA OU ADOLESCENTE 1",
            "NASCIMENTO 1",
            "CRIANÇA OU ADOLESCENTE 2",
        ]);
        assert_eq!(
            order_generated(&columns, false),
            vec!["CRIANÇA OU ADOLESCENTE 1", "NASCIMENTO 1"]
        );
    }

    #[test]
    fn unlisted_columns_dropped_unless_kept() {
        let columns = set(&["Processo 1", "Autuação 1", "ADVOGADO 1", "REQUERENTE 1"]);
        assert_eq!(
            order_generated(&columns, false),
            vec!["Processo 1", "Autuação 1", "REQUERENTE 1"]
        );
        assert_eq!(
            order_generated(&columns, true),
            vec!["Processo 1", "Autuação 1", "REQUERENTE 1", "ADVOGADO 1"]
        );
    }

    #[test]
    fn empty_set_orders_to_nothing() {
        assert!(order_generated(&ColumnSet::new(), true).is_empty());
    }

    #[test]
    fn column_claimed_by_two_groups_appears_once() {
        let columns = set(&["REQUERENTE INSTITUIÇÃO 1"]);
        assert_eq!(order_generated(&columns, false), vec!["REQUERENTE INSTITUIÇÃO 1"]);
    }
}
