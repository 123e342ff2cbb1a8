//! Line classifier for directive-annotated query buffers
//!
//! A buffer is split into three streams:
//!
//! ```text
//! --!gnuplot plot $DATA using 1:2 with lines      -> plot script
//! --!text2sql revenue per nation                   -> natural-language request
//! select n_name, sum(l_extendedprice) from ...     -> SQL (locks in)
//! ```
//!
//! Directives are only recognized at the very start of a line. The first line
//! that is not a comment (or is an explicit `--!sql` line) switches to SQL for
//! the rest of the buffer; comment lines in between continue whatever stream
//! was active.

use crate::templates::lookup_template;

/// Plot directive prefix
pub const PLOT_DIRECTIVE: &str = "--!gnuplot";

/// Natural-language request prefix
pub const NL_DIRECTIVE: &str = "--!text2sql";

/// Explicit SQL passthrough prefix
pub const SQL_DIRECTIVE: &str = "--!sql";

/// SQL line comment marker
pub const COMMENT_MARKER: &str = "--";

/// Stream a line is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Plot script
    Plot,

    /// Natural-language request
    NlRequest,

    /// Literal SQL; terminal once entered
    Sql,
}

/// The three streams of a classified buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedQuery {
    /// Plot script with directive tokens stripped
    pub plot_script: String,

    /// Natural-language request with directive tokens stripped
    pub nl_request: String,

    /// SQL lines, verbatim
    pub sql_text: String,

    /// Input lines routed to the plot script
    pub plot_lines: usize,

    /// Input lines routed to the request
    pub nl_lines: usize,

    /// Input lines routed to SQL
    pub sql_lines: usize,
}

impl ClassifiedQuery {
    /// Whether the plot script holds anything besides whitespace
    pub fn has_plot(&self) -> bool {
        !self.plot_script.trim().is_empty()
    }

    /// Whether the request holds anything besides whitespace
    pub fn has_nl_request(&self) -> bool {
        !self.nl_request.trim().is_empty()
    }

    /// Total number of input lines routed
    pub fn line_count(&self) -> usize {
        self.plot_lines + self.nl_lines + self.sql_lines
    }

    fn push(&mut self, mode: Mode, text: &str) {
        let (buf, count) = match mode {
            Mode::Plot => (&mut self.plot_script, &mut self.plot_lines),
            Mode::NlRequest => (&mut self.nl_request, &mut self.nl_lines),
            Mode::Sql => (&mut self.sql_text, &mut self.sql_lines),
        };
        buf.push_str(text);
        buf.push('\n');
        *count += 1;
    }
}

/// Whether a buffer should go through the classifier at all
///
/// Only buffers that open with a plot or request directive are intercepted;
/// anything else is ordinary SQL.
pub fn should_hijack(raw: &str) -> bool {
    raw.starts_with(PLOT_DIRECTIVE) || raw.starts_with(NL_DIRECTIVE)
}

/// Split a buffer into plot script, request and SQL
pub fn classify(raw: &str) -> ClassifiedQuery {
    let mut query = ClassifiedQuery::default();

    raw.split('\n').fold(None, |previous, line| {
        let mode = next_mode(previous, line);
        route(&mut query, mode, line);
        Some(mode)
    });

    tracing::debug!(
        plot_lines = query.plot_lines,
        nl_lines = query.nl_lines,
        sql_lines = query.sql_lines,
        "classified query buffer"
    );

    query
}

/// Mode for `line` given the mode of the previous line
fn next_mode(previous: Option<Mode>, line: &str) -> Mode {
    if previous == Some(Mode::Sql) {
        return Mode::Sql;
    }

    let detected = if line.starts_with(PLOT_DIRECTIVE) {
        Some(Mode::Plot)
    } else if line.starts_with(NL_DIRECTIVE) {
        Some(Mode::NlRequest)
    } else if !line.starts_with(COMMENT_MARKER) || line.starts_with(SQL_DIRECTIVE) {
        Some(Mode::Sql)
    } else {
        previous
    };

    // A buffer that opens with a plain comment has no stream yet; treat it as SQL.
    detected.unwrap_or(Mode::Sql)
}

fn route(query: &mut ClassifiedQuery, mode: Mode, line: &str) {
    match mode {
        Mode::Sql => query.push(Mode::Sql, line),
        Mode::NlRequest if line.starts_with(NL_DIRECTIVE) => {
            let payload = directive_payload(line);
            match lookup_template(payload) {
                Some(description) => {
                    tracing::debug!(key = payload.trim(), "expanded query template");
                    query.push(Mode::NlRequest, description);
                }
                None => query.push(Mode::NlRequest, payload),
            }
        }
        other => query.push(other, directive_payload(line)),
    }
}

/// Text after the first space/tab run of a line, or "" when there is none
fn directive_payload(line: &str) -> &str {
    match line.find([' ', '\t']) {
        Some(idx) if idx > 0 => line[idx..].trim_start_matches([' ', '\t']),
        _ => "",
    }
}
