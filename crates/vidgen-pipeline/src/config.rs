//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PipelineError, PipelineResult};

/// Default model used for planning and prompt composition.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root folder that per-project output folders are created under.
    pub output_root: PathBuf,
    /// Output video frame rate.
    pub fps: u32,
    /// Minimum spacing between generative media requests.
    pub request_cooldown: Duration,
    /// Anthropic API key (required).
    pub anthropic_api_key: String,
    /// Replicate API token (required).
    pub replicate_api_token: String,
    /// Language model identifier.
    pub claude_model: String,
    /// Completion token budget per language-model call.
    pub max_tokens: u32,
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing credentials fail here so no stage runs without them.
    pub fn from_env() -> PipelineResult<Self> {
        Ok(Self {
            output_root: std::env::var("VIDGEN_OUTPUT_ROOT")
                .unwrap_or_else(|_| "output".to_string())
                .into(),
            fps: std::env::var("VIDGEN_FPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24),
            request_cooldown: Duration::from_secs(
                std::env::var("VIDGEN_COOLDOWN_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(12),
            ),
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            replicate_api_token: require("REPLICATE_API_TOKEN")?,
            claude_model: std::env::var("VIDGEN_CLAUDE_MODEL")
                .unwrap_or_else(|_| DEFAULT_CLAUDE_MODEL.to_string()),
            max_tokens: 4096,
        })
    }
}

fn require(key: &str) -> PipelineResult<String> {
    std::env::var(key)
        .map_err(|_| PipelineError::config(format!("{key} not set. Add it to your .env file.")))
}
