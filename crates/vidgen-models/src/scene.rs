//! Scene data and keyframe prompt models.

use serde::{Deserialize, Serialize};

/// A detailed image-generation prompt anchoring one moment in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Stable identifier, unique within the scene (e.g. `shot1_key1`).
    pub keyframe_id: String,

    /// The shot this keyframe belongs to.
    pub shot_number: u32,

    /// Position on the video timeline, in seconds.
    pub timestamp: f64,

    /// Full image-generation prompt.
    pub prompt: String,

    /// Things the image model should avoid.
    #[serde(default)]
    pub negative_prompt: String,

    /// Key visual elements carried over from the shot.
    #[serde(default)]
    pub elements: Vec<String>,

    /// Special considerations for this keyframe.
    #[serde(default)]
    pub notes: String,
}

/// The detailed keyframe prompts derived from a shot plan.
///
/// `title` and `style` travel from the originating [`ShotPlan`] unchanged;
/// the composing stage re-imposes them rather than trusting the model reply.
///
/// [`ShotPlan`]: crate::shot::ShotPlan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    pub title: String,
    pub style: String,
    /// Keyframes in display order; a shot owns one or two of them.
    pub keyframes: Vec<Keyframe>,
}
