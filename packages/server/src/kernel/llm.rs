// AI implementation over an OpenAI-compatible chat endpoint
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use llm_client::{ChatRequest, LlmClient, Message};

use super::BaseAI;

#[derive(Clone)]
pub struct LlmAI {
    client: LlmClient,
    model: String,
}

impl LlmAI {
    pub fn new(client: LlmClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl BaseAI for LlmAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest::new(&self.model).message(Message::user(prompt));
        let response = self
            .client
            .chat_completion(request)
            .await
            .context("LLM completion failed")?;
        Ok(response.content)
    }

    async fn complete_json(&self, prompt: &str) -> Result<String> {
        self.client
            .json_completion(&self.model, prompt)
            .await
            .context("LLM JSON completion failed")
    }
}
