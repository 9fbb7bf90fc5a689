//! Request and response types for the chat-completions endpoint.
//!
//! All structs derive `Serialize`/`Deserialize` matching the wire format of
//! the OpenAI `v1/chat/completions` API.

use serde::{Deserialize, Serialize};

/// Body of a chat-completions request: model, sampling temperature, and the
/// ordered role-tagged conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier (e.g. "gpt-3.5-turbo-16k").
    pub model: String,
    /// Sampling temperature. Above zero, so repeated repair attempts for the
    /// same failure produce different candidates.
    pub temperature: f32,
    /// Conversation messages in order: system context first, then the
    /// dynamic user prompt.
    pub messages: Vec<ChatMessage>,
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "assistant", or "user".
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

/// Reply from the chat-completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Content of the first choice, if any. The repair flow only ever reads
    /// one generated message.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// One generated alternative in a chat response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting for one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
