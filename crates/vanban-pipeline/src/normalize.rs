//! Text normalization.
//!
//! Cleans whitespace and extraction noise while keeping line
//! structure intact — boundary detection depends on line starts, so
//! distinct lines are never merged.

/// Normalize a raw extracted body.
///
/// - CRLF/CR become LF, a leading BOM is dropped
/// - markdown bold markers and leading heading hashes (OCR/export
///   noise) are stripped
/// - whitespace inside a line is collapsed to single spaces, line
///   edges are trimmed
/// - runs of blank lines collapse to one
/// - document edges are trimmed
pub fn normalize(raw: &str) -> String {
    let text = raw.trim_start_matches('\u{feff}').replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    let mut prev_blank = false;
    for line in text.split('\n') {
        let line = strip_markup(line);
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !prev_blank && !lines.is_empty() {
                lines.push(String::new());
            }
            prev_blank = true;
        } else {
            lines.push(collapsed);
            prev_blank = false;
        }
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Remove `**` bold markers and leading `#` heading prefixes.
fn strip_markup(line: &str) -> String {
    let line = line.replace("**", "");
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix('#') {
        rest.trim_start_matches('#').trim_start().to_string()
    } else {
        line
    }
}
