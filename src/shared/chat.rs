//! Chat Wire Types
//!
//! Payloads exchanged with the chat endpoints. The same `ChatRequest` shape is
//! accepted by `POST /api/chat` and by each text frame on the chat websocket;
//! the websocket answers with a sequence of `ChatEvent` frames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A prompt, optionally scoped to a file in a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub file_id: Option<i64>,
}

/// Non-streaming answer to a `ChatRequest`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub message: String,
    pub model: String,
}

/// Description of the active model provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelInfo {
    pub model: String,
    pub version: String,
    pub description: String,
    pub capabilities: Vec<String>,
}

/// Server-to-client frame on the chat websocket
///
/// A successful turn is exactly one `Start`, one or more `Token`, then one
/// `End`. A failed turn ends with a single `Error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    Start {
        model: String,
        timestamp: DateTime<Utc>,
    },
    Token {
        content: String,
    },
    End {
        full_response: String,
        timestamp: DateTime<Utc>,
    },
    Error {
        message: String,
    },
}

impl ChatEvent {
    pub fn start(model: impl Into<String>) -> Self {
        ChatEvent::Start {
            model: model.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn token(content: impl Into<String>) -> Self {
        ChatEvent::Token {
            content: content.into(),
        }
    }

    pub fn end(full_response: impl Into<String>) -> Self {
        ChatEvent::End {
            full_response: full_response.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ChatEvent::Error {
            message: message.into(),
        }
    }
}
