//! Artifact persistence for a pipeline run.
//!
//! Every run owns one folder under the configured output root, named by its
//! project id. Artifacts are written once as each stage finishes and never
//! mutated afterwards.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PipelineResult;

/// Shot plan artifact file name.
pub const SHOT_PLAN_FILE: &str = "1_director.json";
/// Scene data artifact file name.
pub const SCENE_FILE: &str = "2_scene.json";
/// Keyframe image folder name.
pub const KEYFRAMES_DIR: &str = "3_keyframes";
/// Interpolated frame folder name.
pub const FRAMES_DIR: &str = "4_interpolated";
/// Final video file name.
pub const VIDEO_FILE: &str = "final.mp4";

/// Paths of a single project's artifacts.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub shot_plan_path: PathBuf,
    pub scene_path: PathBuf,
    pub keyframes_dir: PathBuf,
    pub frames_dir: PathBuf,
    pub video_path: PathBuf,
}

/// Creates per-project folders and persists JSON artifacts under an
/// explicit output root.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the folder structure for a project and return its layout.
    pub async fn create_project(&self, project_id: &str) -> PipelineResult<ProjectLayout> {
        let root = self.root.join(project_id);
        let layout = ProjectLayout {
            shot_plan_path: root.join(SHOT_PLAN_FILE),
            scene_path: root.join(SCENE_FILE),
            keyframes_dir: root.join(KEYFRAMES_DIR),
            frames_dir: root.join(FRAMES_DIR),
            video_path: root.join(VIDEO_FILE),
            root,
        };
        tokio::fs::create_dir_all(&layout.keyframes_dir).await?;
        tokio::fs::create_dir_all(&layout.frames_dir).await?;
        Ok(layout)
    }

    /// Persist `value` as pretty-printed JSON at `path`.
    pub async fn save_json<T: Serialize>(&self, path: &Path, value: &T) -> PipelineResult<()> {
        let json = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Load a JSON artifact from `path`.
    pub async fn load_json<T: DeserializeOwned>(&self, path: &Path) -> PipelineResult<T> {
        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
