use anyhow::{Context, Result};
use base64::Engine;
use reqwest::multipart;
use serde_json::json;
use tracing::{debug, warn};

use crate::audio::AudioSegment;

use super::{TranscriptionClient, VisionAnalysisClient};

const TRANSCRIPTION_URL: &str = "https://api.groq.com/openai/v1/audio/transcriptions";
const CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

const TRANSCRIPTION_MODEL: &str = "whisper-large-v3-turbo";
const VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

/// Substituted when the vision service returns a response with no
/// usable content; the pipeline continues without screen analysis.
pub const FALLBACK_ANALYSIS: &str =
    "Unable to analyze screen content. Continuing without screen analysis.";

/// Groq Whisper transcription adapter
#[derive(Debug)]
pub struct GroqTranscriptionClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl GroqTranscriptionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: TRANSCRIPTION_URL.to_string(),
            model: TRANSCRIPTION_MODEL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Pull the transcript out of a transcription response body
fn parse_transcription(body: &serde_json::Value) -> Result<String> {
    let text = body["text"]
        .as_str()
        .context("Transcription response missing text field")?;
    Ok(text.trim().to_string())
}

/// Pull the analysis out of a chat-completion response body
///
/// A well-formed envelope with no content is substituted, not failed.
fn parse_vision(body: &serde_json::Value) -> String {
    match body["choices"][0]["message"]["content"].as_str() {
        Some(content) if !content.trim().is_empty() => content.to_string(),
        _ => {
            warn!("vision response had no usable content, substituting fallback");
            FALLBACK_ANALYSIS.to_string()
        }
    }
}

#[async_trait::async_trait]
impl TranscriptionClient for GroqTranscriptionClient {
    async fn transcribe(&self, segment: &AudioSegment) -> Result<String> {
        debug!(
            bytes = segment.bytes.len(),
            mime = %segment.mime_type,
            "sending audio segment for transcription"
        );

        let file_part = multipart::Part::bytes(segment.bytes.clone())
            .file_name("segment.wav")
            .mime_str(&segment.mime_type)?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("language", "en")
            .part("file", file_part);

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("Transcription request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Transcription service error {}: {}", status, body);
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .context("Failed to read transcription response")?;

        parse_transcription(&body)
    }
}

/// Groq vision-model analysis adapter
///
/// Frames are sent inline as a base64 data URL with the analysis prompt.
pub struct GroqVisionClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl GroqVisionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: CHAT_COMPLETIONS_URL.to_string(),
            model: VISION_MODEL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl VisionAnalysisClient for GroqVisionClient {
    async fn analyze(&self, image: &[u8], prompt: &str) -> Result<String> {
        let image_b64 = base64::engine::general_purpose::STANDARD.encode(image);

        let payload = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    {
                        "type": "image_url",
                        "image_url": { "url": format!("data:image/jpeg;base64,{}", image_b64) },
                    },
                    { "type": "text", "text": prompt },
                ],
            }],
            "max_tokens": 2000,
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Vision analysis request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Vision service error {}: {}", status, body);
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .context("Failed to read vision response")?;

        Ok(parse_vision(&body))
    }
}
