//! Aligned text tables for result sets

use mosql_core::RowSet;

/// Header, separator, one line per row and a row count footer
pub fn format_table(rows: &RowSet) -> Vec<String> {
    let width = rows
        .rows
        .iter()
        .map(|r| r.len())
        .chain(std::iter::once(rows.columns.len()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0usize; width];
    let all = std::iter::once(&rows.columns).chain(rows.rows.iter());
    for line in all {
        for (i, cell) in line.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_line = |cells: &Vec<String>| -> String {
        widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                format!("{:<width$}", cell, width = *w)
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 3);
    lines.push(format_line(&rows.columns));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.rows.iter().map(format_line));
    lines.push(match rows.len() {
        1 => "(1 row)".to_string(),
        n => format!("({} rows)", n),
    });

    lines
}
