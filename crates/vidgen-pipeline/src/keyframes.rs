//! Keyframe image generation stage.

use std::path::Path;

use tracing::{info, warn};
use vidgen_models::{naming, KeyframeAsset, SceneData};

use crate::error::PipelineResult;
use crate::replicate::MediaService;

/// A keyframe whose image could not be generated.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedKeyframe {
    pub keyframe_id: String,
    pub reason: String,
}

/// Outcome of a keyframe generation pass.
#[derive(Debug, Default)]
pub struct KeyframeReport {
    /// Successfully generated assets, in scene order.
    pub assets: Vec<KeyframeAsset>,
    /// Keyframes skipped after a generation failure.
    pub skipped: Vec<SkippedKeyframe>,
}

/// Realizes keyframe prompts as still images, one at a time.
pub struct KeyframeGenerator<'a, M: MediaService> {
    media: &'a M,
}

impl<'a, M: MediaService> KeyframeGenerator<'a, M> {
    pub fn new(media: &'a M) -> Self {
        Self { media }
    }

    /// Generate an image for every keyframe in `scene`.
    ///
    /// A failure on one keyframe is recorded as a skip and the pass keeps
    /// going with the rest; no keyframe failure aborts the run.
    pub async fn generate(
        &self,
        scene: &SceneData,
        out_folder: &Path,
    ) -> PipelineResult<KeyframeReport> {
        let total = scene.keyframes.len();
        info!("generating {total} keyframes");
        tokio::fs::create_dir_all(out_folder).await?;

        let mut report = KeyframeReport::default();
        for (i, keyframe) in scene.keyframes.iter().enumerate() {
            info!("[{}/{total}] {}", i + 1, keyframe.keyframe_id);
            let dest = out_folder.join(naming::keyframe_filename(&keyframe.keyframe_id));
            match self.media.generate_image(&keyframe.prompt, &dest).await {
                Ok(()) => report.assets.push(KeyframeAsset {
                    keyframe_id: keyframe.keyframe_id.clone(),
                    path: dest,
                }),
                Err(e) => {
                    warn!("keyframe {} failed: {e}", keyframe.keyframe_id);
                    report.skipped.push(SkippedKeyframe {
                        keyframe_id: keyframe.keyframe_id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!("generated {} of {total} keyframes", report.assets.len());
        Ok(report)
    }
}
