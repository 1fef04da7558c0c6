// src/extractors/case_info.rs

// --- Imports ---
use super::fields::FieldSet;
use once_cell::sync::Lazy;
use regex::Regex;

// --- Constants ---
/// Value used for both fields when a cell carries no recognizable case.
pub const NOT_INFORMED: &str = "não informado";

/// Case number (`DDDDDDD-DD.DDDD.D.DD.DDDD`) paired with the nearest following
/// bold "Autuação" label and its `DD/MM/YYYY` date. One match per occurrence
/// keeps numbers and dates aligned.
pub const CASE_PAIR_PATTERN: &str =
    r"(\d{7}-\d{2}\.\d{4}\.\d\.\d{2}\.\d{4}).*?<b>Autuação:</b>(\d{2}/\d{2}/\d{4})";

// --- Regex Patterns (Lazy Static) ---
static CASE_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(CASE_PAIR_PATTERN).expect("Failed to compile CASE_PAIR_RE")
});

/// Extracts every (case number, filing date) pair from a PJE cell.
///
/// Fields come out as `Processo {i}` / `Autuação {i}`, numbered from 1 in
/// order of appearance. A cell with no pair (absent, empty or malformed)
/// yields a single `Processo 1` / `Autuação 1` pair set to [`NOT_INFORMED`].
pub fn parse_case_info(text: Option<&str>) -> FieldSet {
    let mut fields = FieldSet::new();
    let text = text.unwrap_or_default();

    for (i, caps) in CASE_PAIR_RE.captures_iter(text).enumerate() {
        let number = caps.get(1).map_or("", |m| m.as_str().trim());
        let filed = caps.get(2).map_or("", |m| m.as_str().trim());
        tracing::trace!("Case pair {}: {} autuado em {}", i + 1, number, filed);
        fields.insert(format!("Processo {}", i + 1), number);
        fields.insert(format!("Autuação {}", i + 1), filed);
    }

    if fields.is_empty() {
        fields.insert("Processo 1", NOT_INFORMED);
        fields.insert("Autuação 1", NOT_INFORMED);
    }

    fields
}
