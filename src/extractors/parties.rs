// src/extractors/parties.rs

// --- Imports ---
use super::fields::FieldSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

// --- Constants ---
/// Unified category for any party whose value carries a birthdate annotation.
pub const MINOR_LABEL: &str = "CRIANÇA OU ADOLESCENTE";
pub const BIRTHDATE_LABEL: &str = "NASCIMENTO";

/// `<b>LABEL:</b> value`, the value running up to the next tag.
pub const PARTY_PATTERN: &str = r"<b>([^<]+?)\s*:\s*</b>\s*([^<]+)";
/// Label part of [`PARTY_PATTERN`] alone.
pub const PARTY_LABEL_PATTERN: &str = r"<b>[^<]+?\s*:\s*</b>";
pub const BIRTHDATE_PATTERN: &str = r"\(NASCIMENTO:\s*(\d{2}/\d{2}/\d{4})\)";

// --- Regex Patterns (Lazy Static) ---
// Some exports put a line break between consecutive bold labels.
static BREAK_BEFORE_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</br>\s*<b>").expect("Failed to compile BREAK_BEFORE_LABEL_RE")
});

static PARTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(PARTY_PATTERN).expect("Failed to compile PARTY_RE")
});

static BIRTHDATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(BIRTHDATE_PATTERN).expect("Failed to compile BIRTHDATE_RE")
});

static BIRTHDATE_STRIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\(NASCIMENTO:.*?\)").expect("Failed to compile BIRTHDATE_STRIP_RE")
});

// --- Data Structures ---
/// What has already been emitted under one original label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SeenValue {
    Minor { name: String, birthdate: String },
    Plain(String),
}

/// Per-cell dedup state. Lives for exactly one `parse_parties` call.
#[derive(Debug, Default)]
struct SeenValues {
    by_label: HashMap<String, HashSet<SeenValue>>,
}

impl SeenValues {
    /// Records `value` under `label`; false when it was already there.
    fn first_time(&mut self, label: &str, value: SeenValue) -> bool {
        self.by_label.entry(label.to_string()).or_default().insert(value)
    }
}

/// Extracts labeled party annotations from a PARTES cell.
///
/// Plain values become `"{LABEL} {n}"`, upper-cased. Values carrying a
/// `(NASCIMENTO: DD/MM/YYYY)` annotation are filed under the shared
/// `CRIANÇA OU ADOLESCENTE {n}` / `NASCIMENTO {n}` pair whatever their label.
/// Repeats of the same value under the same label are dropped. An absent or
/// empty cell yields an empty set.
pub fn parse_parties(text: Option<&str>) -> FieldSet {
    let mut fields = FieldSet::new();

    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return fields,
    };

    let clean_text = BREAK_BEFORE_LABEL_RE.replace_all(text, "<b>");
    let mut seen = SeenValues::default();

    for caps in PARTY_RE.captures_iter(&clean_text) {
        let label = caps.get(1).map_or("", |m| m.as_str().trim());
        let value = caps.get(2).map_or("", |m| m.as_str().trim());

        if let Some(birthdate) = BIRTHDATE_RE.captures(value).and_then(|c| c.get(1)) {
            let name = BIRTHDATE_STRIP_RE.replace_all(value, "").trim().to_uppercase();
            let birthdate = birthdate.as_str().to_string();

            let key = SeenValue::Minor { name: name.clone(), birthdate: birthdate.clone() };
            if !seen.first_time(label, key) {
                tracing::trace!("Skipping repeated minor under '{}': {}", label, name);
                continue;
            }

            // Counter shared by every label that carries a birthdate.
            let n = fields.count_containing(MINOR_LABEL) + 1;
            fields.insert(format!("{} {}", MINOR_LABEL, n), name);
            fields.insert(format!("{} {}", BIRTHDATE_LABEL, n), birthdate);
        } else {
            if !seen.first_time(label, SeenValue::Plain(value.to_string())) {
                tracing::trace!("Skipping repeated value under '{}': {}", label, value);
                continue;
            }

            let count = fields.count_containing(label) + 1;
            fields.insert(format!("{} {}", label, count), value.to_uppercase());
        }
    }

    fields
}
