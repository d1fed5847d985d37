use thiserror::Error;

/// Failures the auto-fill pipeline can produce.
///
/// None of these are fatal to the app: the controller absorbs every variant
/// into draft status text (or silence, for cancellation).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("image decoding failed: {0}")]
    ImageDecoding(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("cancelled")]
    Cancelled,
}
