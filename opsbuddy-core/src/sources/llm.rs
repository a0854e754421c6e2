use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::{OpsBuddyError, OpsBuddyResult};
use crate::models::Reply;
use crate::sources::traits::ResponseSource;

const SERVICE_NAME: &str = "openai";
const TEMPERATURE: f32 = 0.7;

pub const SYSTEM_PROMPT: &str = "You are OpsBuddy, an incident resolution assistant for an IT operations team. Answer questions about incidents, configuration items and service health concisely. Suggest concrete troubleshooting steps, name the likely root cause when the symptoms point at one, and say plainly when you do not know.";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client used for free-form analysis once a key is known.
pub struct LlmClient {
    client: Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> OpsBuddyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                OpsBuddyError::Internal(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &LlmConfig) -> OpsBuddyResult<Self> {
        let key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| OpsBuddyError::MissingApiKey(SERVICE_NAME.to_string()))?;
        Self::new(config, key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(&self, text: &str) -> OpsBuddyResult<String> {
        let url = format!("{}/v1/chat/completions", self.api_base);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: TEMPERATURE,
        };

        debug!(model = %self.model, "Requesting chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(OpsBuddyError::ApiAuthenticationFailed {
                service: SERVICE_NAME.to_string(),
                message: status.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Chat completion request failed");
            return Err(OpsBuddyError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| OpsBuddyError::ApiParseError(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| OpsBuddyError::ApiParseError("Completion had no content".to_string()))
    }
}

#[async_trait]
impl ResponseSource for LlmClient {
    fn source_name(&self) -> &str {
        "llm"
    }

    async fn respond(&self, text: &str) -> OpsBuddyResult<Reply> {
        Ok(Reply::info(self.complete(text).await?))
    }
}
