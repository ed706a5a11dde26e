use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::constants;
use crate::error::GenerationError;

/// Decoding parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Upper bound on the generated length, in tokens.
    #[serde(rename = "num_predict")]
    pub max_length: u32,
    pub num_return_sequences: u32,
    pub num_beams: u32,
    pub no_repeat_ngram_size: u32,
    pub early_stopping: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 150,
            num_return_sequences: 1,
            num_beams: 5,
            no_repeat_ngram_size: 2,
            early_stopping: true,
        }
    }
}

/// A text generation model: prompt in, completion out.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// True when the completion contains the prompt, ignoring case.
pub fn is_parroting(prompt: &str, completion: &str) -> bool {
    completion.to_lowercase().contains(&prompt.to_lowercase())
}

/// Generates a reply for `prompt`, replacing echoed prompts with a clarification
/// and failures with their error text.
pub async fn respond(responder: &dyn Responder, prompt: &str) -> String {
    match responder.generate(prompt).await {
        Ok(completion) if is_parroting(prompt, &completion) => {
            debug!("Completion echoed the prompt, substituting clarification");
            constants::CLARIFICATION_REPLY.to_string()
        }
        Ok(completion) => completion,
        Err(e) => {
            error!(error = %e, "Generation failed");
            e.to_string()
        }
    }
}

// Structures matching Ollama's /api/generate endpoint
#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool, // We want the full response, not a stream
    options: &'a GenerationParams,
}

#[derive(Deserialize, Debug)]
struct OllamaResponse {
    response: String, // The generated text
    #[serde(default)]
    done: bool,
}

/// Completions from a model served by Ollama.
pub struct OllamaResponder {
    client: Client,
    base_url: String,
    model: String,
    params: GenerationParams,
}

impl OllamaResponder {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, GenerationError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            params: GenerationParams::default(),
        })
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Responder for OllamaResponder {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let payload = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: &self.params,
        };
        debug!(?prompt, "Sending generation request");

        let response = self.client.post(&url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(%status, %body, "Ollama API request failed");
            return Err(GenerationError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let ollama_response = response
            .json::<OllamaResponse>()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;
        if !ollama_response.done {
            warn!("Ollama reported an unfinished completion");
        }
        debug!(response = ?ollama_response.response, "Received Ollama response");

        Ok(ollama_response.response.trim().to_string())
    }
}
