//! Filesystem helpers for frame files.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

use crate::error::{MediaError, MediaResult};

/// EXDEV on Linux/macOS: rename across filesystems.
const EXDEV: i32 = 18;

/// List the `.png` files directly inside `dir`, lexicographically sorted.
pub async fn sorted_pngs(dir: &Path) -> MediaResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("png") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Move `src` to `dst`, falling back to copy-and-delete across filesystems.
///
/// Scratch folders can sit on a different filesystem than the project
/// folder, where a plain rename fails with EXDEV.
pub async fn move_file(src: &Path, dst: &Path) -> MediaResult<()> {
    if let Some(parent) = dst.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == Some(EXDEV) => {
            fs::copy(src, dst).await?;
            // source cleanup is best-effort once the copy landed
            if let Err(e) = fs::remove_file(src).await {
                warn!("could not remove {} after copy: {e}", src.display());
            }
            Ok(())
        }
        Err(e) => Err(MediaError::from(e)),
    }
}
