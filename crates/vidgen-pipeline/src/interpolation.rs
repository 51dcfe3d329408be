//! Frame interpolation and global sequencing stage.
//!
//! Stitches per-pair interpolation results into one contiguous, globally
//! numbered frame sequence. A failed pair degrades to an abrupt cut without
//! disturbing the numbering, so the sequence always carries at least one
//! frame per input keyframe.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use vidgen_media::move_file;
use vidgen_models::{naming, FrameSequence};

use crate::error::{PipelineError, PipelineResult};
use crate::replicate::MediaService;

/// How one keyframe pair was bridged.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Interior motion frames were synthesized between the pair.
    Interpolated { motion_frames: usize },
    /// Interpolation failed; the pair plays as an abrupt cut.
    Cut { reason: String },
}

/// Outcome of an interpolation pass.
#[derive(Debug)]
pub struct InterpolationReport {
    /// The frame sequence, contiguously numbered from 1.
    pub sequence: FrameSequence,
    /// Per-pair outcomes, in pair order.
    pub transitions: Vec<Transition>,
}

/// Builds the final frame sequence from generated keyframe images.
pub struct FrameInterpolator<'a, M: MediaService> {
    media: &'a M,
}

impl<'a, M: MediaService> FrameInterpolator<'a, M> {
    pub fn new(media: &'a M) -> Self {
        Self { media }
    }

    /// Interpolate motion across `keyframes` (already in display order) into
    /// `out_folder`, producing a contiguous frame sequence.
    pub async fn interpolate(
        &self,
        keyframes: &[PathBuf],
        out_folder: &Path,
    ) -> PipelineResult<InterpolationReport> {
        let Some(first) = keyframes.first() else {
            return Err(PipelineError::empty_input("no keyframes to interpolate"));
        };
        info!("interpolating {} keyframes", keyframes.len());
        tokio::fs::create_dir_all(out_folder).await?;

        let mut sequence = FrameSequence::new();
        let mut transitions = Vec::new();

        // the run's very first visual seeds the sequence as frame 1
        copy_keyframe(first, out_folder, &mut sequence).await?;

        for (i, pair) in keyframes.windows(2).enumerate() {
            info!(
                "[{}/{}] {} -> {}",
                i + 1,
                keyframes.len() - 1,
                pair[0].display(),
                pair[1].display(),
            );

            match self
                .interpolate_pair(&pair[0], &pair[1], out_folder, &mut sequence)
                .await
            {
                Ok(motion_frames) => transitions.push(Transition::Interpolated { motion_frames }),
                Err(e) => {
                    warn!("pair {} failed, falling back to a cut: {e}", i + 1);
                    transitions.push(Transition::Cut {
                        reason: e.to_string(),
                    });
                }
            }

            // close the pair with its ending keyframe exactly once; the next
            // pair starts from it implicitly
            copy_keyframe(&pair[1], out_folder, &mut sequence).await?;
        }

        info!("sequence complete: {} frames", sequence.len());
        Ok(InterpolationReport {
            sequence,
            transitions,
        })
    }

    /// Synthesize and number the interior frames for one pair.
    ///
    /// Frames already moved into the sequence stay there on failure, so the
    /// numbering remains contiguous whichever step fails.
    async fn interpolate_pair(
        &self,
        first: &Path,
        second: &Path,
        out_folder: &Path,
        sequence: &mut FrameSequence,
    ) -> PipelineResult<usize> {
        let scratch = tempfile::tempdir()?;
        let motion = self
            .media
            .interpolate(first, second, scratch.path())
            .await?;

        let mut moved = 0;
        for frame in &motion {
            let dest = out_folder.join(naming::frame_filename(sequence.next_index()));
            move_file(frame, &dest).await?;
            sequence.push(dest);
            moved += 1;
        }

        if let Err(e) = scratch.close() {
            warn!("could not remove interpolation scratch folder: {e}");
        }
        Ok(moved)
    }
}

/// Copy a keyframe verbatim into the sequence as its next frame.
async fn copy_keyframe(
    keyframe: &Path,
    out_folder: &Path,
    sequence: &mut FrameSequence,
) -> PipelineResult<()> {
    let dest = out_folder.join(naming::frame_filename(sequence.next_index()));
    tokio::fs::copy(keyframe, &dest).await?;
    sequence.push(dest);
    Ok(())
}
