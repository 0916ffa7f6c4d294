use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::MEDIA_CATALOG_CONFIG;
use crate::model::error::ai_errors::{AiClientError, AiError};

pub mod prompt;

#[cfg(test)]
mod tests;

/// Boundary to the external image-understanding service: given a model name, a
/// prompt, and image bytes, it returns free text or an error. One attempt per
/// call; retry policy belongs to the caller.
pub trait AiClient: Send + Sync {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, AiError>;
}

/// Builds the configured client, failing fast when no credentials are present
/// so a generation run aborts before touching any file.
pub fn client_from_config() -> Result<Arc<dyn AiClient>, AiClientError> {
    let config = MEDIA_CATALOG_CONFIG.clone();
    match config.ai.api_key {
        Some(key) if !key.trim().is_empty() => Ok(Arc::new(GeminiClient::new(key))),
        _ => {
            log::error!(
                "No API key configured for platform {}; generation cannot run",
                config.ai.platform
            );
            Err(AiClientError::MissingApiKey)
        }
    }
}

/// client for the Gemini generateContent REST endpoint
pub struct GeminiClient {
    api_key: String,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        GeminiClient {
            api_key,
            http: reqwest::blocking::Client::new(),
        }
    }
}

impl AiClient for GeminiClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, AiError> {
        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    { "inline_data": { "mime_type": mime_type, "data": STANDARD.encode(image_bytes) } }
                ]
            }]
        });
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent?key={}",
            self.api_key
        );
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(AiError::RequestFailed(format!(
                "model request returned {status}: {detail}"
            )));
        }
        let value: serde_json::Value = response
            .json()
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;
        let text = value["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<Vec<&str>>()
                    .join("")
            })
            .unwrap_or_default();
        if text.is_empty() {
            return Err(AiError::RequestFailed(
                "model returned no text candidates".to_string(),
            ));
        }
        Ok(text)
    }
}
