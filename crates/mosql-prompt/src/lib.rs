//! Prompt building and language model access for text-to-SQL
//!
//! This crate handles:
//! - Rendering the instruction prompt from a question and a schema snapshot
//! - Talking to the language model (Ollama, or a scripted model in tests)
//! - Extracting the SQL block from the model's reply

pub mod extract;
pub mod llm;
pub mod mock;
pub mod prompt;

pub use extract::extract_sql;
pub use llm::{Completion, LanguageModel, LlmError, OllamaClient, DEFAULT_OLLAMA_HOST};
pub use mock::{RecordedCall, ScriptedModel};
pub use prompt::{PromptBuilder, PromptError, PromptMessage, Role, SYSTEM_MESSAGE};
