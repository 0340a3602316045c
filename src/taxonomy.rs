//! Prompt span taxonomy
//!
//! The classifier labels spans with dotted taxonomy identifiers
//! (`"camera.movement"`). The set is closed: anything outside it is either
//! remapped through the legacy alias table or falls back to `subject`.
//! A category's *parent* is the segment before the first dot; two highlights
//! merge only when their parents match.

use serde::{Deserialize, Serialize};

/// Closed set of span categories for video/image generation prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "subject")]
    Subject,
    #[serde(rename = "subject.appearance")]
    SubjectAppearance,
    #[serde(rename = "subject.action")]
    SubjectAction,
    #[serde(rename = "scene")]
    Scene,
    #[serde(rename = "scene.environment")]
    SceneEnvironment,
    #[serde(rename = "scene.time")]
    SceneTime,
    #[serde(rename = "camera.movement")]
    CameraMovement,
    #[serde(rename = "camera.angle")]
    CameraAngle,
    #[serde(rename = "camera.shot")]
    CameraShot,
    #[serde(rename = "lighting")]
    Lighting,
    #[serde(rename = "lighting.mood")]
    LightingMood,
    #[serde(rename = "style")]
    Style,
    #[serde(rename = "style.medium")]
    StyleMedium,
    #[serde(rename = "color")]
    Color,
    #[serde(rename = "motion")]
    Motion,
}

impl Category {
    /// Dotted taxonomy identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Subject => "subject",
            Category::SubjectAppearance => "subject.appearance",
            Category::SubjectAction => "subject.action",
            Category::Scene => "scene",
            Category::SceneEnvironment => "scene.environment",
            Category::SceneTime => "scene.time",
            Category::CameraMovement => "camera.movement",
            Category::CameraAngle => "camera.angle",
            Category::CameraShot => "camera.shot",
            Category::Lighting => "lighting",
            Category::LightingMood => "lighting.mood",
            Category::Style => "style",
            Category::StyleMedium => "style.medium",
            Category::Color => "color",
            Category::Motion => "motion",
        }
    }

    /// Parse an exact dotted taxonomy identifier
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "subject" => Some(Category::Subject),
            "subject.appearance" => Some(Category::SubjectAppearance),
            "subject.action" => Some(Category::SubjectAction),
            "scene" => Some(Category::Scene),
            "scene.environment" => Some(Category::SceneEnvironment),
            "scene.time" => Some(Category::SceneTime),
            "camera.movement" => Some(Category::CameraMovement),
            "camera.angle" => Some(Category::CameraAngle),
            "camera.shot" => Some(Category::CameraShot),
            "lighting" => Some(Category::Lighting),
            "lighting.mood" => Some(Category::LightingMood),
            "style" => Some(Category::Style),
            "style.medium" => Some(Category::StyleMedium),
            "color" => Some(Category::Color),
            "motion" => Some(Category::Motion),
            _ => None,
        }
    }

    /// Parent taxonomy segment (the part before the first dot)
    pub fn parent(&self) -> &'static str {
        let s = self.as_str();
        match s.find('.') {
            Some(idx) => &s[..idx],
            None => s,
        }
    }

    /// Whether this category carries a sub-segment (`camera.angle` vs `camera`)
    pub fn is_specific(&self) -> bool {
        self.as_str().contains('.')
    }
}

/// Resolve a classifier label to a taxonomy category.
///
/// Accepts either an exact dotted identifier or a legacy capitalized role
/// name from older classifier templates. Returns `None` for unknown labels.
pub fn resolve(label: &str) -> Option<Category> {
    let label = label.trim();
    if let Some(category) = Category::parse(label) {
        return Some(category);
    }
    resolve_legacy_role(label)
}

/// Resolve a label, falling back to `subject` when it is unknown.
///
/// Used during conversion so a single unrecognized label never discards the
/// whole span.
pub fn resolve_or_default(label: Option<&str>) -> Category {
    label.and_then(resolve).unwrap_or(Category::Subject)
}

/// Legacy role-name alias table from older labeling templates.
///
/// Pure lookup: capitalized role names map onto the closed taxonomy.
fn resolve_legacy_role(role: &str) -> Option<Category> {
    match role {
        "Subject" | "Character" => Some(Category::Subject),
        "Appearance" | "Wardrobe" => Some(Category::SubjectAppearance),
        "Action" => Some(Category::SubjectAction),
        "Scene" => Some(Category::Scene),
        "Setting" | "Environment" | "Location" => Some(Category::SceneEnvironment),
        "Time" | "TimeOfDay" => Some(Category::SceneTime),
        "Camera" | "CameraMovement" => Some(Category::CameraMovement),
        "Angle" | "CameraAngle" => Some(Category::CameraAngle),
        "Shot" | "Framing" => Some(Category::CameraShot),
        "Lighting" => Some(Category::Lighting),
        "Mood" | "Atmosphere" => Some(Category::LightingMood),
        "Style" => Some(Category::Style),
        "Medium" | "Aesthetic" => Some(Category::StyleMedium),
        "Color" | "Palette" => Some(Category::Color),
        "Motion" | "Movement" => Some(Category::Motion),
        _ => None,
    }
}
