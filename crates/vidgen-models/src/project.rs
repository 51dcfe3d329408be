//! Project identity.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

/// One end-to-end run's isolated artifact scope.
///
/// Every artifact of a run lives under a folder named by `id`. Reruns of the
/// same prompt create a new project rather than mutating an old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
}

impl Project {
    /// Derive a project from the user prompt and a creation time.
    ///
    /// The id is a filesystem-safe slug of the first 30 characters of the
    /// prompt plus the creation unix timestamp, so reruns land in distinct
    /// folders.
    pub fn new(prompt: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: format!("{}_{}", slug(prompt), created_at.timestamp()),
        }
    }
}

/// Lowercase the first 30 characters of `prompt` and collapse every
/// non-alphanumeric run into a single underscore.
fn slug(prompt: &str) -> String {
    let re = SLUG_RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"));
    let short: String = prompt.chars().take(30).collect::<String>().to_lowercase();
    re.replace_all(&short, "_").trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(timestamp: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(timestamp, 0).unwrap()
    }

    #[test]
    fn id_is_slug_plus_timestamp() {
        let project = Project::new("A cat playing with yarn", at(1_700_000_000));
        assert_eq!(project.id, "a_cat_playing_with_yarn_1700000000");
    }

    #[test]
    fn slug_truncates_to_thirty_characters() {
        let prompt = "a very long prompt that keeps going well past thirty characters";
        let project = Project::new(prompt, at(0));
        assert_eq!(project.id, "a_very_long_prompt_that_keeps_0");
    }

    #[test]
    fn slug_collapses_special_characters() {
        let project = Project::new("Dragons!! & Knights???", at(1));
        assert_eq!(project.id, "dragons_knights_1");
    }

    #[test]
    fn slug_trims_leading_and_trailing_separators() {
        let project = Project::new("  spaced out  ", at(2));
        assert_eq!(project.id, "spaced_out_2");
    }
}
