//! Scene description loaded from JSON.
//!
//! A scene lists the scripted entities to spawn. Each entry names its
//! behavior, start position and animation clips:
//!
//! ```json
//! {
//!   "entities": [
//!     { "name": "elk", "behavior": "patrol", "x": 200.0, "y": 100.0 },
//!     { "name": "player", "behavior": "player", "x": 0.0, "y": 0.0,
//!       "clips": ["walk_up", "walk_down", "walk_left", "walk_right"] }
//!   ]
//! }
//! ```
//!
//! See [`crate::game::spawn_scene`] for how entries become entities.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::animation::WALK_CLIPS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorKind {
    Patrol,
    Player,
}

fn default_true() -> bool {
    true
}

fn default_time_scale() -> f32 {
    1.0
}

fn default_clips() -> Vec<String> {
    WALK_CLIPS.iter().map(|c| c.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescription {
    pub name: String,
    pub behavior: BehaviorKind,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default = "default_clips")]
    pub clips: Vec<String>,
    /// Bind the behavior's update hook. Without it, tweens only advance when
    /// the scheduler is told to advance them regardless.
    #[serde(default = "default_true")]
    pub has_update: bool,
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub entities: Vec<EntityDescription>,
}

impl Default for SceneDescription {
    /// One patrolling elk and one player.
    fn default() -> Self {
        Self {
            entities: vec![
                EntityDescription {
                    name: "elk".into(),
                    behavior: BehaviorKind::Patrol,
                    x: 200.0,
                    y: 100.0,
                    clips: default_clips(),
                    has_update: true,
                    time_scale: 1.0,
                },
                EntityDescription {
                    name: "player".into(),
                    behavior: BehaviorKind::Player,
                    x: 0.0,
                    y: 0.0,
                    clips: default_clips(),
                    has_update: true,
                    time_scale: 1.0,
                },
            ],
        }
    }
}

impl SceneDescription {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse scene: {}", e))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scene file {:?}: {}", path, e))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_entry_uses_defaults() {
        let scene = SceneDescription::from_json(
            r#"{ "entities": [ { "name": "elk", "behavior": "patrol" } ] }"#,
        )
        .unwrap();
        let elk = &scene.entities[0];
        assert_eq!(elk.behavior, BehaviorKind::Patrol);
        assert!(elk.has_update);
        assert_eq!(elk.clips.len(), 4);
        assert!((elk.time_scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_behavior_is_error() {
        let err = SceneDescription::from_json(
            r#"{ "entities": [ { "name": "x", "behavior": "fly" } ] }"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_default_scene_has_elk_and_player() {
        let scene = SceneDescription::default();
        let kinds: Vec<_> = scene.entities.iter().map(|e| e.behavior).collect();
        assert_eq!(kinds, vec![BehaviorKind::Patrol, BehaviorKind::Player]);
    }
}
