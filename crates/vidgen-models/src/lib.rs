//! Shared data models for the VidGen pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Shot plans produced by the planning stage
//! - Scene data and detailed keyframe prompts
//! - Generated keyframe assets and the interpolated frame sequence
//! - Project identity and artifact naming conventions

pub mod frame;
pub mod naming;
pub mod project;
pub mod scene;
pub mod shot;

// Re-export common types
pub use frame::{Frame, FrameSequence, KeyframeAsset};
pub use naming::{frame_filename, keyframe_filename};
pub use project::Project;
pub use scene::{Keyframe, SceneData};
pub use shot::{CameraMovement, PlanError, Shot, ShotPlan, ShotType};
