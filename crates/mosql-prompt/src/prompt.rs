//! Prompt construction for text-to-SQL
//!
//! The user message follows the sqlcoder instruction format: an instruction
//! header naming the dialect and restating the question, the schema DDL, and
//! a response footer that opens a ```` ```sql ```` fence for the model to
//! continue.

use minijinja::{context, Environment, UndefinedBehavior};
use mosql_core::{Dialect, SchemaSnapshot};
use serde::{Deserialize, Serialize};

/// System message sent ahead of every request
pub const SYSTEM_MESSAGE: &str =
    "You are a SQL/Database expert that helps user to convert a question into a SQL query.";

const USER_TEMPLATE: &str = "### Instructions:
Your task is to convert a question into a SQL query, given a {{ dialect }} database schema.
Adhere to these rules:
- **Deliberately go through the question and database schema word by word** to appropriately answer the question
- **Use Table Aliases** to prevent ambiguity. For example, `SELECT table1.col1, table2.col1 FROM table1 JOIN table2 ON table1.id = table2.id`.
- When creating a ratio, always cast the numerator as float

### Input:
Generate a SQL query that answers the question `{{ question }}`.
This query will run on a database whose schema is represented in this string:
{{ schema }}
### Response:
Based on your instructions, here is the SQL query I have generated to answer the question `{{ question }}`:
```sql
";

/// Who a message is from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One chat message handed to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Error while rendering a prompt
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Prompt render error: {0}")]
    RenderError(String),
}

impl From<minijinja::Error> for PromptError {
    fn from(error: minijinja::Error) -> Self {
        PromptError::RenderError(error.to_string())
    }
}

/// Builds the message sequence for one natural-language request
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }

    /// Render the user message
    ///
    /// Values are substituted as plain text; template syntax inside the
    /// question or the schema is not evaluated.
    pub fn render_user_prompt(
        &self,
        question: &str,
        schema: &SchemaSnapshot,
        dialect: Dialect,
    ) -> Result<String, PromptError> {
        let rendered = self.env.render_str(
            USER_TEMPLATE,
            context! {
                dialect => dialect.display_name(),
                question => question,
                schema => schema.schema_text(),
            },
        )?;
        Ok(rendered)
    }

    /// System message followed by the rendered user message
    pub fn build(
        &self,
        question: &str,
        schema: &SchemaSnapshot,
        dialect: Dialect,
    ) -> Result<Vec<PromptMessage>, PromptError> {
        let user = self.render_user_prompt(question, schema, dialect)?;
        tracing::debug!(
            question_len = question.len(),
            tables = schema.table_count(),
            prompt_len = user.len(),
            "built text-to-SQL prompt"
        );
        Ok(vec![PromptMessage::system(SYSTEM_MESSAGE), PromptMessage::user(user)])
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
