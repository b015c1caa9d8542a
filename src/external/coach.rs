//! Chat-completion client for coaching content
//!
//! Thin proxy to an OpenAI-compatible /v1/chat/completions endpoint. No
//! retries or caching; failures surface to the caller as strings.

use serde::{Deserialize, Serialize};

/// Default endpoint when LEANLOG_COACH_API_URL is unset
const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model when LEANLOG_COACH_MODEL is unset
const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// A generated coaching message and the model that produced it
#[derive(Debug, Clone)]
pub struct CoachReply {
    pub content: String,
    pub model: Option<String>,
}

/// Chat-completion API client
#[derive(Clone)]
pub struct CoachClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl CoachClient {
    /// Build a client from environment configuration
    pub fn from_env() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: std::env::var("LEANLOG_COACH_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: std::env::var("LEANLOG_COACH_API_KEY").ok(),
            model: std::env::var("LEANLOG_COACH_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }

    /// Request a coaching message for the given prompt
    pub async fn generate(&self, system: &str, prompt: &str) -> Result<CoachReply, String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| "LEANLOG_COACH_API_KEY is not set".to_string())?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: 600,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Coach API request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Coach API returned {}: {}", status, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| format!("Coach API response decode failed: {}", e))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| "Coach API returned no choices".to_string())?;

        Ok(CoachReply {
            content,
            model: parsed.model,
        })
    }
}
