//! Minimal CSV rendering for report records.

use std::fmt::Write as _;

use tally_core::IncidentTypeRecord;

pub const CSV_HEADER: &str = "name,ground_truth_count,discovered_count";

/// Quote a field if it contains a comma, quote or line break.
#[must_use]
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Header plus one line per record, each terminated by `\n`.
///
/// A quoted name with a line break spans several lines; ground-truth
/// labels are rejected on load if they contain one.
#[must_use]
pub fn render_csv(records: &[IncidentTypeRecord]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 32);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for record in records {
        // writing to a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{}",
            escape_field(&record.name),
            record.ground_truth_count,
            record.discovered_count
        );
    }
    out
}
