use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EXPERT_PREAMBLE, PING_MESSAGE, RecommendationEngine};
use crate::config::CohereConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    message: &'a str,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    preamble: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChatErrorResponse {
    message: String,
}

/// Client for the Cohere v1 chat endpoint
#[derive(Clone)]
pub struct CohereClient {
    client: reqwest::Client,
    config: CohereConfig,
}

impl CohereClient {
    pub fn new(client: reqwest::Client, config: CohereConfig) -> Self {
        Self { client, config }
    }

    async fn chat(&self, request: ChatRequest<'_>) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("COHERE_API_KEY is not configured"))?;

        let url = format!("{}/v1/chat", self.config.base_url.trim_end_matches('/'));
        debug!(
            "Sending chat request to {} ({} chars)",
            url,
            request.message.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to send Cohere chat request: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ChatErrorResponse>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| "no error details".to_string());
            bail!("Cohere chat request failed with HTTP {}: {}", status.as_u16(), detail);
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse Cohere chat response: {}", e))?;

        Ok(body.text.trim().to_string())
    }
}

#[async_trait]
impl RecommendationEngine for CohereClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn recommend(&self, prompt: &str) -> Result<String> {
        self.chat(ChatRequest {
            model: &self.config.model,
            message: prompt,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            preamble: Some(EXPERT_PREAMBLE),
        })
        .await
    }

    async fn ping(&self) -> Result<String> {
        self.chat(ChatRequest {
            model: &self.config.model,
            message: PING_MESSAGE,
            max_tokens: 10,
            temperature: 0.1,
            preamble: None,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_body() {
        let request = ChatRequest {
            model: "command-r-08-2024",
            message: "hola",
            max_tokens: 1500,
            temperature: 0.3,
            preamble: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "command-r-08-2024",
                "message": "hola",
                "max_tokens": 1500,
                "temperature": 0.3
            })
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = CohereClient::new(
            reqwest::Client::new(),
            CohereConfig {
                api_key: None,
                base_url: "http://127.0.0.1:9".to_string(),
                model: "command-r-08-2024".to_string(),
                max_tokens: 1500,
                temperature: 0.3,
            },
        );

        assert!(!client.is_configured());
        let err = client.recommend("hola").await.unwrap_err();
        assert_eq!(err.to_string(), "COHERE_API_KEY is not configured");
    }
}
