//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors surfaced by pipeline stages.
///
/// Per-item failures (a single keyframe, a single interpolation pair) are
/// handled inside their stage and recorded as skips or cuts; only structural
/// failures travel through this type to the top level.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A language-model reply did not parse as the expected JSON schema.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The language model service failed to return a completion.
    #[error("Language model service error: {0}")]
    LanguageService(String),

    /// The generative media service failed or returned nothing usable.
    #[error("Media service error: {0}")]
    MediaService(String),

    /// A stage received zero usable inputs.
    #[error("No usable input: {0}")]
    EmptyInput(String),

    /// Required configuration is missing or invalid at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Media error: {0}")]
    Media(#[from] vidgen_media::MediaError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn language_service(msg: impl Into<String>) -> Self {
        Self::LanguageService(msg.into())
    }

    pub fn media_service(msg: impl Into<String>) -> Self {
        Self::MediaService(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
