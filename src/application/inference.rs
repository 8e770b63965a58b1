// Inference capability consumed by the AI analysis surface
use crate::domain::media::{AnalysisError, MediaBlob};
use async_trait::async_trait;

#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Ask the model to describe `media` following `prompt`.
    /// Any transport or model failure maps to `InferenceUnavailable`.
    async fn analyze(&self, prompt: &str, media: &MediaBlob) -> Result<String, AnalysisError>;
}
