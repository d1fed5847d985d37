//! Platform vision seams for the photo track.
//!
//! OCR and image classification are platform capabilities: iOS backs these
//! traits with the Vision framework, Android with ML Kit. Tests inject
//! mocks; the CLI has no camera and wires none.

use async_trait::async_trait;

use crate::error::PipelineError;

/// One classifier candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

/// Extracts text lines from a captured image.
///
/// Fails with `ImageDecoding` when the bytes are not a readable image and
/// `Cancelled` when the platform abandons the request.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize_text(&self, image: &[u8]) -> Result<Vec<String>, PipelineError>;
}

/// Produces ranked (label, confidence) candidates for a captured image.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<Vec<Classification>, PipelineError>;
}
