//! Shot plan models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera framing for a single shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShotType {
    Wide,
    Medium,
    CloseUp,
    ExtremeCloseUp,
}

impl ShotType {
    /// Wire/display name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wide => "wide",
            Self::Medium => "medium",
            Self::CloseUp => "close-up",
            Self::ExtremeCloseUp => "extreme-close-up",
        }
    }
}

impl std::fmt::Display for ShotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Camera movement within a shot.
///
/// Defaults to a static camera when the planner omits the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMovement {
    #[default]
    Static,
    Pan,
    Zoom,
    Tracking,
}

impl CameraMovement {
    /// Wire/display name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Pan => "pan",
            Self::Zoom => "zoom",
            Self::Tracking => "tracking",
        }
    }
}

impl std::fmt::Display for CameraMovement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single planned camera setup within the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// 1-indexed position in the plan.
    pub shot_number: u32,

    /// Camera framing.
    #[serde(rename = "type")]
    pub shot_type: ShotType,

    /// Planned length in seconds.
    pub duration: f64,

    /// What happens in this shot.
    pub description: String,

    /// Camera movement over the shot.
    #[serde(default)]
    pub camera_movement: CameraMovement,

    /// Key visual elements that must appear.
    #[serde(default)]
    pub elements: Vec<String>,
}

/// A structured plan for the whole video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotPlan {
    /// Short descriptive title.
    pub title: String,

    /// Target length of the finished video in seconds.
    pub total_duration: f64,

    /// Visual style carried through every downstream stage.
    pub style: String,

    /// Ordered shots, numbered contiguously from 1.
    pub shots: Vec<Shot>,
}

/// Structural problems in a shot plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("shot plan contains no shots")]
    NoShots,

    #[error("shot numbering must start at 1 and be contiguous: expected {expected}, got {got}")]
    BadNumbering { expected: u32, got: u32 },
}

impl ShotPlan {
    /// Check the structural invariants: at least one shot, shot numbers
    /// contiguous from 1.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.shots.is_empty() {
            return Err(PlanError::NoShots);
        }
        for (i, shot) in self.shots.iter().enumerate() {
            let expected = i as u32 + 1;
            if shot.shot_number != expected {
                return Err(PlanError::BadNumbering {
                    expected,
                    got: shot.shot_number,
                });
            }
        }
        Ok(())
    }

    /// Sum of per-shot durations.
    ///
    /// Advisory only: compared against `total_duration` for logging, never
    /// enforced downstream.
    pub fn shots_duration(&self) -> f64 {
        self.shots.iter().map(|s| s.duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(number: u32) -> Shot {
        Shot {
            shot_number: number,
            shot_type: ShotType::Wide,
            duration: 2.0,
            description: "A castle on a hill".to_string(),
            camera_movement: CameraMovement::Pan,
            elements: vec!["castle".to_string(), "hill".to_string()],
        }
    }

    #[test]
    fn validate_ok() {
        let plan = ShotPlan {
            title: "Castle".to_string(),
            total_duration: 4.0,
            style: "cinematic".to_string(),
            shots: vec![shot(1), shot(2)],
        };
        assert!(plan.validate().is_ok());
        assert!((plan.shots_duration() - 4.0).abs() < 0.001);
    }

    #[test]
    fn validate_empty() {
        let plan = ShotPlan {
            title: "Empty".to_string(),
            total_duration: 0.0,
            style: "cinematic".to_string(),
            shots: vec![],
        };
        assert!(matches!(plan.validate(), Err(PlanError::NoShots)));
    }

    #[test]
    fn validate_gap() {
        let plan = ShotPlan {
            title: "Gap".to_string(),
            total_duration: 4.0,
            style: "cinematic".to_string(),
            shots: vec![shot(1), shot(3)],
        };
        assert!(matches!(
            plan.validate(),
            Err(PlanError::BadNumbering {
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn validate_wrong_start() {
        let plan = ShotPlan {
            title: "Offset".to_string(),
            total_duration: 2.0,
            style: "cinematic".to_string(),
            shots: vec![shot(2)],
        };
        assert!(matches!(
            plan.validate(),
            Err(PlanError::BadNumbering {
                expected: 1,
                got: 2
            })
        ));
    }

    #[test]
    fn shot_type_wire_form() {
        let json = serde_json::to_string(&ShotType::CloseUp).unwrap();
        assert_eq!(json, "\"close-up\"");
        let back: ShotType = serde_json::from_str("\"extreme-close-up\"").unwrap();
        assert_eq!(back, ShotType::ExtremeCloseUp);
        assert_eq!(ShotType::ExtremeCloseUp.as_str(), "extreme-close-up");
    }

    #[test]
    fn camera_movement_defaults_to_static() {
        let json = serde_json::json!({
            "shot_number": 1,
            "type": "wide",
            "duration": 2.0,
            "description": "Establishing shot"
        });
        let shot: Shot = serde_json::from_value(json).unwrap();
        assert_eq!(shot.camera_movement, CameraMovement::Static);
        assert!(shot.elements.is_empty());
    }

    #[test]
    fn plan_round_trip() {
        let plan = ShotPlan {
            title: "A Knight's Duel".to_string(),
            total_duration: 6.0,
            style: "cinematic, dramatic lighting".to_string(),
            shots: vec![shot(1), shot(2), shot(3)],
        };
        let json = serde_json::to_string_pretty(&plan).unwrap();
        let back: ShotPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
