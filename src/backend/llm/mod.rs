//! Model Provider Module
//!
//! The chat endpoints talk to a language model through the `ModelProvider`
//! capability trait. Streaming output is a boxed stream of text fragments;
//! dropping the stream cancels whatever is producing it.
//!
//! Only the demo provider ships today. It answers from a small set of canned
//! manuscript-assistant replies chosen by keyword.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use thiserror::Error;

use crate::shared::{ModelInfo, ModelKind, Settings};

/// Keyword-routed demo model
pub mod demo;

pub use demo::DemoModel;

/// Incremental model output, in order
pub type TokenStream = BoxStream<'static, Result<String, ModelError>>;

/// Failures raised by a model provider
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("generation failed: {0}")]
    Generation(String),
}

/// A language model able to answer prompts in full or as a token stream
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Static description of the model
    fn info(&self) -> ModelInfo;

    /// Produce the complete response to `prompt`, optionally grounded in `context`.
    async fn generate(&self, prompt: &str, context: &str) -> Result<String, ModelError>;

    /// Produce the response incrementally.
    ///
    /// Concatenating every `Ok` fragment yields the same text `generate` would.
    fn stream(&self, prompt: &str, context: &str) -> TokenStream;
}

/// Construct the provider selected in settings
pub fn create_model(settings: &Settings) -> Arc<dyn ModelProvider> {
    match settings.model_provider {
        ModelKind::Demo => {
            tracing::info!(
                "Using demo model provider ({}ms between tokens)",
                settings.demo_token_delay_ms
            );
            Arc::new(DemoModel::new(settings.demo_token_delay()))
        }
    }
}
