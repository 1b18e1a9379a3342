//! Gemini `generateContent` oracle.
//!
//! Key priority: config `oracle.api_key` -> `GEMINI_API_KEY` -> `GOOGLE_API_KEY`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::Oracle;
use crate::config::OracleConfig;
use crate::error::OracleError;

pub struct GeminiOracle {
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    timeout: Duration,
    client: Client,
}

impl std::fmt::Debug for GeminiOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiOracle")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiOracle {
    pub fn new(api_key: &str, model: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Gemini HTTP client")?;

        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            temperature: None,
            timeout,
            client,
        })
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn from_config(config: &OracleConfig) -> Result<Self> {
        let env_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .ok();
        let api_key = resolve_api_key(config.api_key.as_deref(), env_key.as_deref())
            .ok_or(OracleError::MissingCredentials)?;

        Ok(Self::new(&api_key, &config.model, &config.base_url, config.timeout())?
            .with_temperature(config.temperature))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Client-level timeouts surface as `Timeout`, everything else as `Request`.
    fn request_error(&self, err: reqwest::Error) -> OracleError {
        if err.is_timeout() {
            OracleError::Timeout(self.timeout)
        } else {
            OracleError::from(err)
        }
    }

    fn api_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });
        if let Some(temperature) = self.temperature {
            body["generationConfig"] = json!({ "temperature": temperature });
        }
        body
    }

    /// Final answer text of the first candidate. Parts tagged `"thought": true`
    /// are reasoning steps and are skipped.
    pub fn extract_text(response: &Value) -> Option<String> {
        let parts = response["candidates"][0]["content"]["parts"].as_array()?;
        let text: String = parts
            .iter()
            .filter(|p| !p["thought"].as_bool().unwrap_or(false))
            .filter_map(|p| p["text"].as_str())
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn resolve_api_key(explicit: Option<&str>, env: Option<&str>) -> Option<String> {
    explicit
        .filter(|k| !k.trim().is_empty())
        .or_else(|| env.filter(|k| !k.trim().is_empty()))
        .map(str::to_string)
}

#[async_trait]
impl Oracle for GeminiOracle {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        log::debug!("Gemini request to model {}", self.model);

        let response = self
            .client
            .post(self.api_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&error_text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(String::from))
                .unwrap_or(error_text);
            return Err(OracleError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let json: Value = response.json().await.map_err(|e| self.request_error(e))?;
        Self::extract_text(&json).ok_or(OracleError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
