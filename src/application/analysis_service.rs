// Analysis service - Use case for describing uploaded images and audio
use crate::application::inference::InferenceService;
use crate::domain::media::{AnalysisError, AnalysisReport, MediaBlob, MediaKind};
use std::sync::Arc;

pub const IMAGE_PROMPT: &str = r#"
You are a marine biologist and expert taxonomist. Analyze the provided image of a marine creature.
Your task is to:
1. Identify the creature with its common and scientific name.
2. Provide a detailed description covering "Appearance & Habitat" and "Scientific Classification".
3. Create a "Summary Table" with the key features.
Format your entire response using Markdown with these headings:
### Identification & Common Name
### Appearance & Habitat
### Scientific Classification
### Summary Table
The summary table has two columns, Feature and Details, with rows for Scientific Name,
Common Name, Distinctive Traits and Habitat.
"#;

pub const AUDIO_PROMPT: &str = r#"
You are an expert bioacoustics analyst and sonar operator.
Listen to the provided audio file and identify the most likely source of the sound.
Is it a marine creature (like a specific whale or dolphin), a man-made object (like a ship engine, submarine sonar, or propeller), or something else?
Provide a brief, confident analysis.
"#;

#[derive(Clone)]
pub struct AnalysisService {
    inference: Arc<dyn InferenceService>,
}

impl AnalysisService {
    pub fn new(inference: Arc<dyn InferenceService>) -> Self {
        Self { inference }
    }

    pub async fn analyze(&self, media: MediaBlob) -> Result<AnalysisReport, AnalysisError> {
        let prompt = match media.kind() {
            MediaKind::Image => IMAGE_PROMPT,
            MediaKind::Audio => AUDIO_PROMPT,
        };

        tracing::info!(
            "Analyzing {:?} upload ({}, {} bytes)",
            media.kind(),
            media.mime_type(),
            media.bytes().len()
        );

        let analysis = self
            .inference
            .analyze(prompt.trim(), &media)
            .await
            .inspect_err(|e| tracing::error!("Analysis of {:?} failed: {}", media.kind(), e))?;

        Ok(AnalysisReport {
            kind: media.kind(),
            analysis,
        })
    }
}
