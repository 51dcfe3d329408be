//! Pipeline orchestration.
//!
//! Runs the five stages in strict order, persisting each intermediate
//! artifact before the next stage starts so an interrupted run leaves
//! evidence of how far it got.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};
use vidgen_models::Project;

use crate::claude::{ClaudeClient, LanguageModel};
use crate::composer::PromptComposer;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::interpolation::{FrameInterpolator, Transition};
use crate::keyframes::KeyframeGenerator;
use crate::planner::ShotPlanner;
use crate::replicate::{MediaService, ReplicateClient};
use crate::storage::ArtifactStore;

/// Sequences the pipeline stages for one run.
pub struct Orchestrator<L, M> {
    config: PipelineConfig,
    store: ArtifactStore,
    language: L,
    media: M,
}

impl Orchestrator<ClaudeClient, ReplicateClient> {
    /// Build an orchestrator wired to the real services.
    pub fn from_config(config: PipelineConfig) -> PipelineResult<Self> {
        let language = ClaudeClient::new(
            config.anthropic_api_key.clone(),
            config.claude_model.clone(),
            config.max_tokens,
        );
        let media = ReplicateClient::new(
            config.replicate_api_token.clone(),
            config.request_cooldown,
        )?;
        let store = ArtifactStore::new(config.output_root.clone());
        Ok(Self {
            config,
            store,
            language,
            media,
        })
    }
}

impl<L: LanguageModel, M: MediaService> Orchestrator<L, M> {
    /// Generate a video from a text prompt, returning the output path.
    ///
    /// Each invocation computes a fresh project id, so re-running with a new
    /// prompt never touches an earlier project's files.
    pub async fn run(&self, user_prompt: &str) -> PipelineResult<PathBuf> {
        let project = Project::new(user_prompt, Utc::now());
        info!("project: {}", project.id);
        info!("prompt: {user_prompt}");
        let layout = self.store.create_project(&project.id).await?;

        info!("STEP 1/5: planning shots");
        let plan = ShotPlanner::new(&self.language).plan(user_prompt).await?;
        self.store.save_json(&layout.shot_plan_path, &plan).await?;

        info!("STEP 2/5: composing detailed prompts");
        let scene = PromptComposer::new(&self.language).compose(&plan).await?;
        self.store.save_json(&layout.scene_path, &scene).await?;

        info!("STEP 3/5: generating keyframe images");
        let keyframes = KeyframeGenerator::new(&self.media)
            .generate(&scene, &layout.keyframes_dir)
            .await?;
        for skip in &keyframes.skipped {
            warn!("skipped keyframe {}: {}", skip.keyframe_id, skip.reason);
        }
        if keyframes.assets.is_empty() {
            return Err(PipelineError::empty_input("no keyframes were generated"));
        }
        let keyframe_paths: Vec<PathBuf> =
            keyframes.assets.iter().map(|a| a.path.clone()).collect();

        info!("STEP 4/5: interpolating motion between keyframes");
        let report = FrameInterpolator::new(&self.media)
            .interpolate(&keyframe_paths, &layout.frames_dir)
            .await?;
        let cuts = report
            .transitions
            .iter()
            .filter(|t| matches!(t, Transition::Cut { .. }))
            .count();
        if cuts > 0 {
            warn!(
                "{cuts} of {} transitions fell back to cuts",
                report.transitions.len()
            );
        }

        info!("STEP 5/5: assembling video at {} fps", self.config.fps);
        let video =
            vidgen_media::assemble_frames(&layout.frames_dir, &layout.video_path, self.config.fps)
                .await?;

        info!(
            "video generation complete: {} keyframes, {} frames, output {}",
            keyframe_paths.len(),
            report.sequence.len(),
            video.display(),
        );
        Ok(video)
    }
}
