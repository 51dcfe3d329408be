//! Transition clip decoding.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};
use crate::fs::sorted_pngs;

/// Decode every frame of `clip` into PNG files inside `out_dir`.
///
/// Frames are written as `f_0001.png`, `f_0002.png`, ... and returned in
/// display order. Only the clip's own frames are produced; global sequence
/// numbering belongs to the caller.
pub async fn extract_clip_frames(clip: &Path, out_dir: &Path) -> MediaResult<Vec<PathBuf>> {
    if !clip.exists() {
        return Err(MediaError::FileNotFound(clip.to_path_buf()));
    }
    tokio::fs::create_dir_all(out_dir).await?;

    FfmpegCommand::new(clip, out_dir.join("f_%04d.png"))
        .run()
        .await?;

    let frames = sorted_pngs(out_dir).await?;
    debug!("decoded {} frames from {}", frames.len(), clip.display());
    Ok(frames)
}
