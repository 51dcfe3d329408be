//! Image-sequence video assembly.
//!
//! Encodes an ordered set of still images into a fixed-fps H.264 video via a
//! single FFmpeg concat-demuxer run. The first image's dimensions are the
//! canonical output resolution; any image that differs is stretched to match.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};
use crate::fs::sorted_pngs;

/// Assemble a folder of sequence frames into a video at `fps`.
///
/// Frames are read in lexicographic filename order (sequence frames are
/// zero-padded so this equals sequence order) and each frame is shown for
/// exactly one video frame.
pub async fn assemble_frames(frame_folder: &Path, output: &Path, fps: u32) -> MediaResult<PathBuf> {
    let frames = sorted_pngs(frame_folder).await?;
    if frames.is_empty() {
        return Err(MediaError::no_frames(format!(
            "no PNG files found in {}",
            frame_folder.display()
        )));
    }
    info!("found {} frames in {}", frames.len(), frame_folder.display());
    assemble_images(&frames, output, fps, 1.0 / f64::from(fps)).await
}

/// Assemble a flat image list, holding each image for `duration_per_image`
/// seconds (`fps x duration` video frames per image).
pub async fn assemble_images(
    images: &[PathBuf],
    output: &Path,
    fps: u32,
    duration_per_image: f64,
) -> MediaResult<PathBuf> {
    if images.is_empty() {
        return Err(MediaError::no_frames("no images provided"));
    }
    encode_image_sequence(images, output, fps, duration_per_image).await
}

async fn encode_image_sequence(
    images: &[PathBuf],
    output: &Path,
    fps: u32,
    duration: f64,
) -> MediaResult<PathBuf> {
    let ((width, height), usable) = probe_usable(images)?;

    if let Some(parent) = output.parent() {
        if !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    // the concat list lives in a temp file removed on drop
    let mut list = tempfile::NamedTempFile::new()?;
    list.write_all(concat_script(&usable, duration).as_bytes())?;

    FfmpegCommand::new(list.path(), output)
        .input_args(["-f", "concat", "-safe", "0"])
        .video_filter(format!("scale={width}:{height},setsar=1"))
        .video_codec("libx264")
        .pix_fmt("yuv420p")
        .output_fps(fps)
        .run()
        .await?;

    info!("wrote {}", output.display());
    Ok(output.to_path_buf())
}

/// Probe every image header, returning the canonical resolution and the
/// images that can actually be read.
///
/// The first image establishes the output resolution, so failing to read it
/// is fatal; later unreadable images are skipped with a warning.
fn probe_usable(images: &[PathBuf]) -> MediaResult<((u32, u32), Vec<PathBuf>)> {
    let first = &images[0];
    let canonical =
        image::image_dimensions(first).map_err(|e| MediaError::decode(first, e.to_string()))?;

    let mut usable = Vec::with_capacity(images.len());
    for path in images {
        match image::image_dimensions(path) {
            Ok(dims) => {
                if dims != canonical {
                    debug!(
                        "{} is {}x{}, will be stretched to {}x{}",
                        path.display(),
                        dims.0,
                        dims.1,
                        canonical.0,
                        canonical.1
                    );
                }
                usable.push(path.clone());
            }
            Err(e) => warn!("skipping unreadable frame {}: {e}", path.display()),
        }
    }
    Ok((canonical, usable))
}

/// Build an ffconcat script showing each image for `duration` seconds.
///
/// The final entry is listed again after its duration directive; the concat
/// demuxer drops the trailing duration otherwise.
fn concat_script(images: &[PathBuf], duration: f64) -> String {
    let mut script = String::from("ffconcat version 1.0\n");
    for path in images {
        script.push_str(&format!(
            "file '{}'\nduration {duration:.6}\n",
            path.display()
        ));
    }
    if let Some(last) = images.last() {
        script.push_str(&format!("file '{}'\n", last.display()));
    }
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn concat_script_lists_every_image_with_duration() {
        let images = vec![PathBuf::from("/a/frame_0001.png"), PathBuf::from("/a/frame_0002.png")];
        let script = concat_script(&images, 0.5);
        assert!(script.starts_with("ffconcat version 1.0\n"));
        assert_eq!(script.matches("duration 0.500000").count(), 2);
        // last file repeated so its duration is honored
        assert_eq!(script.matches("frame_0002.png").count(), 2);
    }

    #[test]
    fn concat_script_single_image() {
        let images = vec![PathBuf::from("/a/only.png")];
        let script = concat_script(&images, 1.0);
        assert_eq!(script.matches("only.png").count(), 2);
        assert_eq!(script.matches("duration").count(), 1);
    }

    #[test]
    fn probe_skips_unreadable_images() {
        let dir = TempDir::new().unwrap();
        let good1 = dir.path().join("frame_0001.png");
        let bad = dir.path().join("frame_0002.png");
        let good2 = dir.path().join("frame_0003.png");
        write_png(&good1, 4, 4);
        std::fs::write(&bad, b"not a png").unwrap();
        write_png(&good2, 8, 8);

        let images = vec![good1.clone(), bad, good2.clone()];
        let ((width, height), usable) = probe_usable(&images).unwrap();
        assert_eq!((width, height), (4, 4));
        assert_eq!(usable, vec![good1, good2]);
    }

    #[test]
    fn probe_fails_when_first_image_unreadable() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("frame_0001.png");
        std::fs::write(&bad, b"garbage").unwrap();

        let result = probe_usable(&[bad]);
        assert!(matches!(result, Err(MediaError::Decode { .. })));
    }

    #[tokio::test]
    async fn assemble_frames_requires_frames() {
        let dir = TempDir::new().unwrap();
        let result = assemble_frames(dir.path(), &dir.path().join("out.mp4"), 24).await;
        assert!(matches!(result, Err(MediaError::NoFrames(_))));
    }

    #[tokio::test]
    async fn assemble_images_requires_images() {
        let dir = TempDir::new().unwrap();
        let result = assemble_images(&[], &dir.path().join("out.mp4"), 24, 1.0).await;
        assert!(matches!(result, Err(MediaError::NoFrames(_))));
    }
}
