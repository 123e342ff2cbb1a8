//! Query buffer dispatch
//!
//! Decides what a raw buffer from the input loop turns into:
//!
//! | request | SQL (trimmed)       | plot script | action                       |
//! |---------|---------------------|-------------|------------------------------|
//! | yes     | empty or only `;`   | any         | synthesize, then as below    |
//! |         | statement           | empty       | execute, return rows         |
//! |         | statement           | present     | execute and plot             |
//! |         | empty or only `;`   |             | nothing                      |
//!
//! Buffers that do not open with a plot or request directive skip all of this
//! and are executed exactly as typed.

use crate::error::EngineError;
use crate::text2sql::Synthesizer;
use mosql_catalog::Database;
use mosql_core::RowSet;
use mosql_directive::{classify, should_hijack};
use mosql_plot::{PlotPipeline, PlotSummary};
use std::io::Write;

/// What handling a buffer produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Statement executed; rows for the caller to print
    Rows {
        sql: String,
        result: RowSet,
        synthesized: bool,
    },

    /// Statement executed and plotted to the terminal
    Plotted {
        sql: String,
        summary: PlotSummary,
        synthesized: bool,
    },

    /// Only directives or comments; nothing to run
    Nothing,
}

impl Outcome {
    /// The statement that was executed, if any
    pub fn sql(&self) -> Option<&str> {
        match self {
            Outcome::Rows { sql, .. } | Outcome::Plotted { sql, .. } => Some(sql),
            Outcome::Nothing => None,
        }
    }

    /// Whether the statement came from the model
    pub fn synthesized(&self) -> bool {
        match self {
            Outcome::Rows { synthesized, .. } | Outcome::Plotted { synthesized, .. } => *synthesized,
            Outcome::Nothing => false,
        }
    }
}

/// Routes buffers to execution, synthesis and plotting for one session
pub struct Dispatcher {
    db: Box<dyn Database>,
    synthesizer: Synthesizer,
    plots: PlotPipeline,
}

impl Dispatcher {
    pub fn new(db: Box<dyn Database>, synthesizer: Synthesizer, plots: PlotPipeline) -> Self {
        Self { db, synthesizer, plots }
    }

    pub fn database(&self) -> &dyn Database {
        self.db.as_ref()
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// Swap the connection and forget the cached schema
    pub async fn reconnect(&mut self, db: Box<dyn Database>) {
        self.db = db;
        self.synthesizer.cache().invalidate().await;
    }

    /// Handle one raw buffer; plot images are written to `out`
    pub async fn handle(
        &self,
        raw: &str,
        bindings: &[String],
        out: &mut (dyn Write + Send),
    ) -> Result<Outcome, EngineError> {
        if !should_hijack(raw) {
            let result = self.db.query(raw, bindings).await?;
            return Ok(Outcome::Rows {
                sql: raw.to_string(),
                result,
                synthesized: false,
            });
        }

        let query = classify(raw);
        let mut sql = query.sql_text.trim().to_string();
        let mut synthesized = false;

        if query.has_nl_request() && only_terminators(&sql) {
            sql = self.synthesizer.synthesize(self.db.as_ref(), &query.nl_request).await?;
            synthesized = true;
        }

        if only_terminators(&sql) {
            tracing::debug!("no statement to execute");
            return Ok(Outcome::Nothing);
        }

        if query.has_plot() {
            let summary = self
                .plots
                .render(self.db.as_ref(), &sql, &query.plot_script, bindings, out)
                .await?;
            tracing::info!(rows = summary.rows, protocol = summary.protocol, "plotted query");
            return Ok(Outcome::Plotted { sql, summary, synthesized });
        }

        let result = self.db.query(&sql, bindings).await?;
        Ok(Outcome::Rows { sql, result, synthesized })
    }
}

/// Empty, or nothing but `;` and whitespace
fn only_terminators(sql: &str) -> bool {
    sql.chars().all(|c| c == ';' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminator_only_detection() {
        assert!(only_terminators(""));
        assert!(only_terminators(";"));
        assert!(only_terminators("; ;\n"));
        assert!(!only_terminators("select 1;"));
    }

    #[test]
    fn outcome_accessors() {
        let outcome = Outcome::Rows {
            sql: "select 1".to_string(),
            result: RowSet::empty(),
            synthesized: true,
        };
        assert_eq!(outcome.sql(), Some("select 1"));
        assert!(outcome.synthesized());
        assert_eq!(Outcome::Nothing.sql(), None);
    }
}
