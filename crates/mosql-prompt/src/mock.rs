//! Scripted language model for testing
//!
//! Replies are handed out in the order they were queued. Every call is
//! recorded so tests can assert on the prompt and on how often the model was
//! asked.

use crate::llm::{Completion, LanguageModel, LlmError};
use crate::prompt::PromptMessage;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A call the scripted model received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub messages: Vec<PromptMessage>,
    pub temperature: f32,
}

/// Language model that returns queued replies
///
/// Clones share the queue and the call log.
#[derive(Clone, Default)]
pub struct ScriptedModel {
    replies: Arc<Mutex<VecDeque<Result<Completion, LlmError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a single-choice reply
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.push(Ok(Completion::single(content)));
        self
    }

    /// Queue a reply with no choices
    pub fn with_empty_completion(self) -> Self {
        self.push(Ok(Completion::default()));
        self
    }

    /// Queue a failure
    pub fn with_error(self, error: LlmError) -> Self {
        self.push(Err(error));
        self
    }

    /// Number of calls received
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Every call received, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push(&self, reply: Result<Completion, LlmError>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }
}

#[async_trait::async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(
        &self,
        messages: &[PromptMessage],
        temperature: f32,
    ) -> Result<Completion, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall { messages: messages.to_vec(), temperature });
        }

        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| Err(LlmError::RequestError("no scripted reply left".to_string())))
    }
}
