use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use serde_json::{json, Value};

use super::{response_json_or_error, TextGenerator};
use crate::config::GeminiSettings;

pub struct GeminiTextProvider {
    api_base: String,
    api_key: String,
    model: String,
    timeout: Duration,
    http: HttpClient,
}

impl GeminiTextProvider {
    /// `None` when no API key is configured.
    pub fn from_settings(settings: &GeminiSettings) -> Option<Self> {
        let api_key = settings.api_key.clone()?;
        Some(Self {
            api_base: settings.api_base.clone(),
            api_key,
            model: settings.model.clone(),
            timeout: settings.timeout,
            http: HttpClient::new(),
        })
    }

    fn endpoint(&self) -> String {
        let trimmed = self.model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

impl TextGenerator for GeminiTextProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate_text(&self, prompt: &str) -> Result<String> {
        let endpoint = self.endpoint();
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .with_context(|| format!("Gemini request failed ({endpoint})"))?;
        let body = response_json_or_error("Gemini", response)?;
        Ok(extract_text(&body))
    }
}

/// Concatenated text parts of the first candidate.
pub fn extract_text(payload: &Value) -> String {
    payload
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}
