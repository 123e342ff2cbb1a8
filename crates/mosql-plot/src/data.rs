//! Inline data block for plot scripts
//!
//! Rows become whitespace separated records inside a `$DATA << EOD` here-doc,
//! so every cell has to be a single token with no quotes to break parsing.

use mosql_core::RowSet;

/// Name of the data block the user script refers to
pub const DATA_BLOCK: &str = "$DATA";

/// Here-doc terminator
pub const DATA_END: &str = "EOD";

/// Make one cell safe to embed as a single data token
///
/// Replacements, in order: `\r\n` and `\n` become `__`, `"` becomes `'`,
/// tab and space become `_`.
pub fn sanitize_cell(value: &str) -> String {
    value
        .replace("\r\n", "__")
        .replace('\n', "__")
        .replace('"', "'")
        .replace('\t', "_")
        .replace(' ', "_")
}

/// Append the data block for `rows` to `buf`
///
/// Column names are not written.
pub fn write_data_block(rows: &RowSet, buf: &mut String) {
    buf.push_str(DATA_BLOCK);
    buf.push_str(" << ");
    buf.push_str(DATA_END);
    buf.push('\n');

    for row in &rows.rows {
        let line = row.iter().map(|cell| sanitize_cell(cell)).collect::<Vec<_>>().join(" ");
        buf.push_str(&line);
        buf.push('\n');
    }

    buf.push_str(DATA_END);
    buf.push('\n');
}
