//! Category color theme
//!
//! One muted color per parent taxonomy segment, applied to highlight marks
//! as CSS-style hex values. Calm enough to recede behind the text being
//! edited.

/// Colors per parent taxonomy segment
#[derive(Debug, Clone)]
pub struct CategoryTheme {
    pub subject: String,
    pub scene: String,
    pub camera: String,
    pub lighting: String,
    pub style: String,
    pub color: String,
    pub motion: String,

    /// Fallback for anything unrecognized
    pub neutral: String,
}

impl Default for CategoryTheme {
    fn default() -> Self {
        Self {
            subject: "#d4b85a".to_string(),  // Warm gold
            scene: "#6aa174".to_string(),    // Sage green
            camera: "#7a94c9".to_string(),   // Slate blue
            lighting: "#c9a16a".to_string(), // Soft amber
            style: "#a388c9".to_string(),    // Muted violet
            color: "#c97a8e".to_string(),    // Dusty rose
            motion: "#6ab4b0".to_string(),   // Calm teal
            neutral: "#9a9a9a".to_string(),  // Gray
        }
    }
}

impl CategoryTheme {
    /// Color for a parent taxonomy segment
    pub fn color_for(&self, parent: &str) -> &str {
        match parent {
            "subject" => &self.subject,
            "scene" => &self.scene,
            "camera" => &self.camera,
            "lighting" => &self.lighting,
            "style" => &self.style,
            "color" => &self.color,
            "motion" => &self.motion,
            _ => &self.neutral,
        }
    }
}
