// Gemini REST client implementing the inference capability
use crate::application::inference::InferenceService;
use crate::domain::media::{AnalysisError, MediaBlob};
use crate::infrastructure::config::InferenceSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedFile {
    uri: String,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
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
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(settings: &InferenceSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build inference HTTP client")?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    fn upload_url(&self, api_key: &str) -> String {
        format!(
            "{}/upload/v1beta/files?uploadType=media&key={}",
            self.endpoint,
            urlencoding::encode(api_key)
        )
    }

    fn generate_url(&self, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint,
            urlencoding::encode(&self.model),
            urlencoding::encode(api_key)
        )
    }

    async fn upload(&self, api_key: &str, media: &MediaBlob) -> Result<UploadedFile> {
        let response = self
            .http
            .post(self.upload_url(api_key))
            .header("Content-Type", media.mime_type())
            .body(media.bytes().clone())
            .send()
            .await
            .context("Failed to upload media to inference service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Media upload failed with status {}: {}", status, body);
        }

        let uploaded = response
            .json::<UploadResponse>()
            .await
            .context("Failed to parse media upload response")?;

        Ok(uploaded.file)
    }

    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        file: &UploadedFile,
        mime_type: &str,
    ) -> Result<String> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    {
                        "file_data": {
                            "mime_type": file.mime_type.as_deref().unwrap_or(mime_type),
                            "file_uri": file.uri,
                        }
                    }
                ]
            }]
        });

        let response = self
            .http
            .post(self.generate_url(api_key))
            .json(&body)
            .send()
            .await
            .context("Failed to send generateContent request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("generateContent failed with status {}: {}", status, body);
        }

        let data = response
            .json::<GenerateResponse>()
            .await
            .context("Failed to parse generateContent response")?;

        extract_text(data)
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        anyhow::bail!("Model returned no text");
    }
    Ok(text)
}

#[async_trait]
impl InferenceService for GeminiClient {
    async fn analyze(&self, prompt: &str, media: &MediaBlob) -> Result<String, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AnalysisError::InferenceUnavailable("GOOGLE_API_KEY is not configured".to_string())
        })?;

        let result = async {
            let file = self.upload(api_key, media).await?;
            tracing::debug!("Uploaded {} as {}", media.mime_type(), file.uri);
            self.generate(api_key, prompt, &file, media.mime_type()).await
        }
        .await;

        result.map_err(|e| AnalysisError::InferenceUnavailable(format!("{:#}", e)))
    }
}
