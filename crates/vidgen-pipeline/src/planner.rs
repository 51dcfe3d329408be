//! Shot planning stage.
//!
//! Breaks a user prompt into an ordered shot plan with camera framing,
//! movement, and timing.

use tracing::{info, warn};
use vidgen_models::ShotPlan;

use crate::claude::{parse_structured, LanguageModel};
use crate::error::{PipelineError, PipelineResult};

/// Plans the video structure from the user's prompt.
pub struct ShotPlanner<'a, L: LanguageModel> {
    model: &'a L,
}

impl<'a, L: LanguageModel> ShotPlanner<'a, L> {
    pub fn new(model: &'a L) -> Self {
        Self { model }
    }

    /// Create a shot plan from the user's prompt.
    pub async fn plan(&self, user_prompt: &str) -> PipelineResult<ShotPlan> {
        info!("planning video for: {user_prompt}");

        let reply = self.model.complete(&instruction(user_prompt)).await?;
        let plan: ShotPlan = parse_structured(&reply)?;
        plan.validate()
            .map_err(|e| PipelineError::schema(e.to_string()))?;

        let shots_total = plan.shots_duration();
        if (shots_total - plan.total_duration).abs() > 0.5 {
            // durations are hints; flag the mismatch but carry on
            warn!(
                "shot durations sum to {shots_total}s but the plan declares {}s",
                plan.total_duration
            );
        }

        info!(
            "planned {} shots, {}s total",
            plan.shots.len(),
            plan.total_duration
        );
        Ok(plan)
    }
}

fn instruction(user_prompt: &str) -> String {
    format!(
        r#"You are a film director planning a short video.

USER'S REQUEST: "{user_prompt}"

Create a shot plan for a 4-8 second video. Break it into 3-5 shots.

Return ONLY valid JSON in this exact format:
{{
    "title": "Short descriptive title",
    "total_duration": <number of seconds>,
    "style": "visual style description (e.g., cinematic, anime, realistic)",
    "shots": [
        {{
            "shot_number": 1,
            "type": "<wide/medium/close-up/extreme-close-up>",
            "duration": <seconds>,
            "description": "What happens in this shot",
            "camera_movement": "<static/pan/zoom/tracking>",
            "elements": ["list", "of", "key", "visual", "elements"]
        }}
    ]
}}

Guidelines:
- Start with an establishing shot (wide) to set the scene
- Vary the shot types rather than repeating one framing
- Give each shot clear visual elements
- Shot durations should add up to total_duration
- Keep descriptions vivid but concise

Return ONLY the JSON, no other text."#
    )
}
