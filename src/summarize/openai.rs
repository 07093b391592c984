//! OpenAI chat-completion summarizer.
//!
//! Sends the instruction as the system message and the conversation text as
//! the user message. The async client runs on a private current-thread tokio
//! runtime so the [`Summarizer`] trait stays synchronous; do not call it from
//! inside another tokio runtime.
//!
//! The client's exponential backoff is turned off: a rate-limited or failed
//! request surfaces once as [`SummarizeError::Request`].

use super::Summarizer;
use crate::config::Config;
use crate::error::SummarizeError;
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;
use tokio::runtime::Runtime;

/// Summarizer backed by the OpenAI chat completions API.
pub struct OpenAiSummarizer {
    client: Client<OpenAIConfig>,
    runtime: Runtime,
    model: String,
    timeout: Duration,
}

impl OpenAiSummarizer {
    /// Creates a summarizer for `model` with the given API key and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the tokio runtime cannot be built.
    pub fn new(api_key: &str, model: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        Self::with_config(OpenAIConfig::new().with_api_key(api_key), model, timeout)
    }

    fn with_config(
        config: OpenAIConfig,
        model: impl Into<String>,
        timeout: Duration,
    ) -> crate::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SummarizeError::Runtime(e.to_string()))?;
        let client = Client::with_config(config).with_backoff(no_retry());

        Ok(Self {
            client,
            runtime,
            model: model.into(),
            timeout,
        })
    }

    /// Creates a summarizer from process configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if no API key is configured.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let api_key = config.require_api_key()?;
        Self::new(api_key, config.model.clone(), config.timeout)
    }

    /// Returns the model name used for requests.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_messages(
        instruction: &str,
        text: &str,
    ) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
        Ok(vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(instruction)
                    .build()?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(text)
                    .build()?,
            ),
        ])
    }

    async fn complete(&self, instruction: &str, text: &str) -> Result<Option<String>, OpenAIError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(Self::build_messages(instruction, text)?)
            .build()?;

        let response = self.client.chat().create(request).await?;
        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

/// Backoff policy that gives up after the first failed attempt.
fn no_retry() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

impl Summarizer for OpenAiSummarizer {
    fn summarize(&self, instruction: &str, text: &str) -> Result<String, SummarizeError> {
        tracing::debug!(model = %self.model, input_len = text.len(), "requesting summary");

        let outcome = self.runtime.block_on(async {
            tokio::time::timeout(self.timeout, self.complete(instruction, text)).await
        });

        match outcome {
            Err(_elapsed) => {
                tracing::warn!(timeout = ?self.timeout, "summary request timed out");
                Err(SummarizeError::Timeout {
                    seconds: self.timeout.as_secs(),
                })
            }
            Ok(Err(e)) => Err(SummarizeError::Request(e.to_string())),
            Ok(Ok(Some(content))) if !content.trim().is_empty() => Ok(content),
            Ok(Ok(_)) => Err(SummarizeError::EmptyResponse),
        }
    }
}

impl std::fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
