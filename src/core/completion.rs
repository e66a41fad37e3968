use crate::adapters::llm::{LLMAdapter, LLMRequest};
use crate::core::error::ReviewError;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: usize,
}

impl SamplingParams {
    pub const TRANSFORM: SamplingParams = SamplingParams {
        temperature: 0.7,
        max_tokens: 800,
    };

    pub const SUMMARY: SamplingParams = SamplingParams {
        temperature: 0.8,
        max_tokens: 150,
    };
}

/// Single entry point for model calls. One outbound request per call, no
/// retries; the caller decides whether a failure is fatal.
pub struct CompletionClient {
    adapter: Box<dyn LLMAdapter>,
}

impl CompletionClient {
    pub fn new(adapter: Box<dyn LLMAdapter>) -> Self {
        Self { adapter }
    }

    pub fn model(&self) -> &str {
        self.adapter.model_name()
    }

    pub async fn complete(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        params: SamplingParams,
    ) -> Result<String, ReviewError> {
        let request = LLMRequest {
            system_prompt: system_instruction.to_string(),
            user_prompt: user_prompt.to_string(),
            temperature: Some(params.temperature),
            max_tokens: Some(params.max_tokens),
        };

        let response = self
            .adapter
            .complete(request)
            .await
            .map_err(|e| ReviewError::Upstream(format!("{:#}", e)))?;

        let served_by = if response.model.is_empty() {
            self.model()
        } else {
            response.model.as_str()
        };
        match &response.usage {
            Some(usage) => debug!(
                "Completion from {}: {} prompt + {} completion = {} tokens",
                served_by, usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            ),
            None => debug!("Completion from {} (no usage reported)", served_by),
        }

        match response.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(ReviewError::Upstream("No response from AI".to_string())),
        }
    }
}
