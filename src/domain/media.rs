// Uploaded media submitted for AI analysis
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    fn mime_prefix(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Audio => "audio/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("inference service unavailable: {0}")]
    InferenceUnavailable(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("uploaded media is empty")]
    EmptyMedia,
}

#[derive(Debug, Clone)]
pub struct MediaBlob {
    kind: MediaKind,
    mime_type: String,
    bytes: Bytes,
}

impl MediaBlob {
    /// Accepts the blob only if `mime_type` matches `kind` (`image/*` or `audio/*`).
    pub fn new(kind: MediaKind, mime_type: &str, bytes: Bytes) -> Result<Self, AnalysisError> {
        let mime_type = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if !mime_type.starts_with(kind.mime_prefix()) {
            return Err(AnalysisError::UnsupportedMedia(mime_type));
        }
        if bytes.is_empty() {
            return Err(AnalysisError::EmptyMedia);
        }

        Ok(Self {
            kind,
            mime_type,
            bytes,
        })
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub kind: MediaKind,
    pub analysis: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_must_match_kind() {
        let err = MediaBlob::new(MediaKind::Image, "audio/wav", Bytes::from_static(b"RIFF"))
            .unwrap_err();
        assert_eq!(err, AnalysisError::UnsupportedMedia("audio/wav".to_string()));
    }

    #[test]
    fn test_mime_parameters_stripped() {
        let blob = MediaBlob::new(
            MediaKind::Audio,
            "Audio/MPEG; charset=binary",
            Bytes::from_static(b"ID3"),
        )
        .unwrap();
        assert_eq!(blob.mime_type(), "audio/mpeg");
        assert_eq!(blob.kind(), MediaKind::Audio);
    }

    #[test]
    fn test_empty_upload_rejected() {
        let err = MediaBlob::new(MediaKind::Image, "image/png", Bytes::new()).unwrap_err();
        assert_eq!(err, AnalysisError::EmptyMedia);
    }
}
