//! Prompt composition stage.
//!
//! Expands a shot plan into detailed, model-ready image prompts, one or two
//! keyframes per shot.

use tracing::info;
use vidgen_models::{SceneData, Shot, ShotPlan};

use crate::claude::{parse_structured, LanguageModel};
use crate::error::PipelineResult;

/// Composes detailed image-generation prompts from a shot plan.
pub struct PromptComposer<'a, L: LanguageModel> {
    model: &'a L,
}

impl<'a, L: LanguageModel> PromptComposer<'a, L> {
    pub fn new(model: &'a L) -> Self {
        Self { model }
    }

    /// Expand a shot plan into keyframe prompts.
    pub async fn compose(&self, plan: &ShotPlan) -> PipelineResult<SceneData> {
        info!("composing prompts for {} shots", plan.shots.len());

        let reply = self.model.complete(&instruction(plan)).await?;
        let mut scene: SceneData = parse_structured(&reply)?;

        // title and style travel from the plan unchanged; never trust the
        // model to echo them back intact
        scene.title = plan.title.clone();
        scene.style = plan.style.clone();

        info!("composed {} keyframe prompts", scene.keyframes.len());
        Ok(scene)
    }
}

/// Format the shots into a readable block grounding the model's reply.
fn format_shots(shots: &[Shot]) -> String {
    shots
        .iter()
        .map(|shot| {
            format!(
                "Shot {}:\n  - Type: {}\n  - Duration: {} seconds\n  - Description: {}\n  - Camera: {}\n  - Elements: {}\n",
                shot.shot_number,
                shot.shot_type,
                shot.duration,
                shot.description,
                shot.camera_movement,
                shot.elements.join(", "),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn instruction(plan: &ShotPlan) -> String {
    format!(
        r#"You are an expert at writing prompts for AI image generation (Flux/Stable Diffusion).

VIDEO TITLE: "{title}"
STYLE: {style}

SHOT PLAN:
{shots}

For each shot, create 1-2 keyframe prompts. Each keyframe should be a detailed image prompt.

Return ONLY valid JSON in this exact format:
{{
    "title": "{title}",
    "style": "{style}",
    "keyframes": [
        {{
            "keyframe_id": "shot1_key1",
            "shot_number": 1,
            "timestamp": 0.0,
            "prompt": "Detailed prompt for AI image generation, include style, lighting, camera angle, quality tags",
            "negative_prompt": "Things to avoid: blurry, low quality, distorted, etc.",
            "elements": ["key", "visual", "elements"],
            "notes": "Any special considerations"
        }}
    ]
}}

PROMPT WRITING GUIDELINES:
1. Be specific and detailed (50-100 words per prompt)
2. Include style keywords: cinematic, photorealistic, 8k, detailed, etc.
3. Describe lighting: dramatic lighting, golden hour, backlit, etc.
4. Include camera/composition: wide shot, close-up, low angle, etc.
5. Add quality boosters: highly detailed, professional, masterpiece
6. Keep a consistent style across all keyframes
7. For negative prompts: include common issues to avoid

Return ONLY the JSON, no other text."#,
        title = plan.title,
        style = plan.style,
        shots = format_shots(&plan.shots),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use vidgen_models::{CameraMovement, ShotType};

    use crate::error::PipelineError;

    struct CannedModel {
        reply: String,
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn complete(&self, _prompt: &str) -> PipelineResult<String> {
            Ok(self.reply.clone())
        }
    }

    fn plan() -> ShotPlan {
        ShotPlan {
            title: "A Cat and Yarn".to_string(),
            total_duration: 4.0,
            style: "cinematic".to_string(),
            shots: vec![Shot {
                shot_number: 1,
                shot_type: ShotType::Wide,
                duration: 4.0,
                description: "A cat spots a ball of yarn".to_string(),
                camera_movement: CameraMovement::Static,
                elements: vec!["cat".to_string(), "yarn".to_string()],
            }],
        }
    }

    #[tokio::test]
    async fn compose_preserves_title_and_style_from_the_plan() {
        let reply = serde_json::json!({
            "title": "Something Else Entirely",
            "style": "watercolor",
            "keyframes": [{
                "keyframe_id": "shot1_key1",
                "shot_number": 1,
                "timestamp": 0.0,
                "prompt": "A cat in golden light, wide shot, 8k"
            }]
        })
        .to_string();
        let model = CannedModel { reply };

        let scene = PromptComposer::new(&model).compose(&plan()).await.unwrap();
        assert_eq!(scene.title, "A Cat and Yarn");
        assert_eq!(scene.style, "cinematic");
        assert_eq!(scene.keyframes.len(), 1);
        assert_eq!(scene.keyframes[0].keyframe_id, "shot1_key1");
    }

    #[tokio::test]
    async fn malformed_reply_is_a_schema_error() {
        let model = CannedModel {
            reply: "{\"keyframes\": \"not a list\"}".to_string(),
        };
        let result = PromptComposer::new(&model).compose(&plan()).await;
        assert!(matches!(result, Err(PipelineError::Schema(_))));
    }

    #[test]
    fn format_shots_renders_wire_names() {
        let text = format_shots(&plan().shots);
        assert!(text.contains("Shot 1:"));
        assert!(text.contains("Type: wide"));
        assert!(text.contains("Camera: static"));
        assert!(text.contains("cat, yarn"));
    }
}
