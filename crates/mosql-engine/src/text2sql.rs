//! Natural-language to SQL synthesis
//!
//! Fetches (or reuses) the schema, builds the prompt, asks the model and
//! pulls a single terminated statement out of the reply.

use crate::error::EngineError;
use mosql_catalog::{Database, SchemaCache};
use mosql_core::LlmConfig;
use mosql_prompt::{extract_sql, LanguageModel, PromptBuilder};

/// Turns requests into SQL for one session
///
/// Owns the session's schema cache, so the schema is introspected once no
/// matter how many requests are made.
pub struct Synthesizer {
    model: Box<dyn LanguageModel>,
    prompts: PromptBuilder,
    cache: SchemaCache,
    temperature: f32,
}

impl Synthesizer {
    pub fn new(model: Box<dyn LanguageModel>) -> Self {
        Self {
            model,
            prompts: PromptBuilder::new(),
            cache: SchemaCache::new(),
            temperature: LlmConfig::default().temperature,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// The session schema cache
    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Generate a `;`-terminated statement answering `request`
    pub async fn synthesize(&self, db: &dyn Database, request: &str) -> Result<String, EngineError> {
        let schema = self.cache.ensure_schema(db).await?;
        let messages = self.prompts.build(request.trim(), &schema, db.dialect())?;

        tracing::info!(model = self.model.name(), "requesting SQL from model");
        let completion = self.model.generate(&messages, self.temperature).await?;
        let reply = completion.first()?;

        let sql = terminate(extract_sql(reply).trim()).ok_or(EngineError::EmptySynthesis)?;
        tracing::debug!(%sql, "synthesized SQL");
        Ok(sql)
    }
}

/// `sql` with a trailing `;`, or None when there is no statement
fn terminate(sql: &str) -> Option<String> {
    if sql.trim_end_matches(';').trim().is_empty() {
        return None;
    }
    if sql.ends_with(';') {
        Some(sql.to_string())
    } else {
        Some(format!("{};", sql))
    }
}
