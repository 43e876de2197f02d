use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::GenerateError;

const GEMINI_API: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One media part from an image response. `data` carries the base64 payload
/// when the part has inline image data.
#[derive(Debug, Clone)]
pub struct MediaPart {
    pub mime_type: Option<String>,
    pub data: Option<String>,
}

#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, GenerateError>;

    async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<Vec<MediaPart>, GenerateError>;
}

pub struct HttpGeminiClient {
    client: Client,
    api_key: String,
}

impl HttpGeminiClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    async fn generate_content(
        &self,
        model: &str,
        body: Value,
    ) -> Result<GenerateContentResponse, GenerateError> {
        let url = format!("{GEMINI_API}/models/{model}:generateContent");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerateError::Api { status, body });
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl GenerationClient for HttpGeminiClient {
    async fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, GenerateError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": temperature },
        });

        let response = self.generate_content(model, body).await?;
        response.text().ok_or(GenerateError::EmptyResponse)
    }

    async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<Vec<MediaPart>, GenerateError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self.generate_content(model, body).await?;
        Ok(response.media_parts())
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter())
            .into_iter()
            .flatten()
    }

    /// Concatenated text of the first candidate, or None when the response
    /// carries no text at all.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .parts()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() { None } else { Some(text) }
    }

    pub fn media_parts(&self) -> Vec<MediaPart> {
        self.parts()
            .map(|p| MediaPart {
                mime_type: p
                    .inline_data
                    .as_ref()
                    .and_then(|d| d.mime_type.clone()),
                data: p.inline_data.as_ref().map(|d| d.data.clone()),
            })
            .collect()
    }
}
