//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while driving FFmpeg or reading frames.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFmpeg command failed (exit code {exit_code:?}): {stderr}")]
    FfmpegFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("no input frames: {0}")]
    NoFrames(String),

    #[error("could not decode image {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error from a finished process.
    pub fn ffmpeg_failed(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::FfmpegFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Create a decode failure error.
    pub fn decode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a no-input-frames error.
    pub fn no_frames(context: impl Into<String>) -> Self {
        Self::NoFrames(context.into())
    }
}
