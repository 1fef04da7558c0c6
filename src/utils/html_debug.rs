// src/utils/html_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;
use crate::utils::error::AppError;

/// One source cell shown in the debug page.
pub struct DebugCell<'a> {
    pub title: String,
    pub text: &'a str,
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escapes `text` and wraps each highlighted byte range in a tagged span.
/// Ranges overlapping an earlier one are skipped.
pub fn annotate(text: &str, highlights: &[(usize, usize, &str)]) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut last_pos = 0;
    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0); // Sort by position

    for (start, end, highlight_type) in sorted_highlights {
        if start < last_pos {
            continue;
        }
        out.push_str(&escape_html(&text[last_pos..start]));

        let css_class = match highlight_type {
            "case" => "highlight-case",
            "party" => "highlight-party",
            "birthdate" => "highlight-birthdate",
            _ => "highlight-custom",
        };

        out.push_str(&format!("<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, highlight_type));
        out.push_str(&escape_html(&text[start..end]));
        out.push_str("</span>");

        last_pos = end;
    }

    if last_pos < text.len() {
        out.push_str(&escape_html(&text[last_pos..]));
    }

    out
}

/// Writes an HTML page listing every cell with the regions matched by `patterns`
/// highlighted, so extraction misses can be spotted by eye.
pub fn create_debug_html(cells: &[DebugCell<'_>], filename: &Path, patterns: &[(&str, &str)]) -> Result<(), AppError> {
    use regex::Regex;

    let compiled = patterns
        .iter()
        .map(|(pattern, highlight_type)| {
            Regex::new(pattern)
                .map(|re| (re, *highlight_type))
                .map_err(|e| AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");
    debug_html.push_str(".highlight-case { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-party { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-birthdate { background-color: #FFA500; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("pre { white-space: pre-wrap; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    for cell in cells {
        let mut highlights = Vec::new();
        for (re, highlight_type) in &compiled {
            for mat in re.find_iter(cell.text) {
                highlights.push((mat.start(), mat.end(), *highlight_type));
            }
        }

        debug_html.push_str(&format!("<h3>{}</h3>\n<pre>", escape_html(&cell.title)));
        debug_html.push_str(&annotate(cell.text, &highlights));
        debug_html.push_str("</pre>\n");
    }

    debug_html.push_str("\n</body>\n</html>");

    let mut file = File::create(filename)?;
    file.write_all(debug_html.as_bytes())?;

    tracing::info!("Saved debug HTML to {}", filename.display());
    Ok(())
}
