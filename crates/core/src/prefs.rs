//! Presentation preferences: theme colors and label presets.
//!
//! These are local-only settings — they are never written to the record
//! store. The [`PrefsStore`] trait decouples the settings from any storage
//! medium; `estoque-api` provides a JSON-file implementation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Application color theme (CSS hex values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub primary: String,
    pub background: String,
    pub card: String,
    pub text: String,
    #[serde(rename = "textSecondary")]
    pub text_secondary: String,
    pub border: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: "#38bdf8".into(),
            background: "#0f172a".into(),
            card: "#1e293b".into(),
            text: "#f8fafc".into(),
            text_secondary: "#94a3b8".into(),
            border: "#334155".into(),
        }
    }
}

/// A label printing preset. Dimensions in millimeters, font sizes in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPreset {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "qrCodeSize")]
    pub qr_code_size: f64,
    #[serde(rename = "codeFontSize")]
    pub code_font_size: f64,
    #[serde(rename = "descriptionFontSize")]
    pub description_font_size: f64,
    #[serde(rename = "footerFontSize")]
    pub footer_font_size: f64,
    #[serde(rename = "labelsPerRow")]
    pub labels_per_row: u32,
}

impl LabelPreset {
    /// The built-in 40x40mm two-column preset.
    pub fn default_preset() -> Self {
        Self {
            id: "default-40x40-2col-v2".into(),
            name: "40x40mm (2 Colunas)".into(),
            width: 40.0,
            height: 40.0,
            qr_code_size: 20.0,
            code_font_size: 11.0,
            description_font_size: 9.0,
            footer_font_size: 8.0,
            labels_per_row: 2,
        }
    }
}

/// The full set of local preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    #[serde(rename = "labelPresets")]
    pub label_presets: Vec<LabelPreset>,
    #[serde(rename = "activePresetId")]
    pub active_preset_id: String,
}

impl Default for Preferences {
    fn default() -> Self {
        let preset = LabelPreset::default_preset();
        Self {
            theme: Theme::default(),
            active_preset_id: preset.id.clone(),
            label_presets: vec![preset],
        }
    }
}

impl Preferences {
    /// Repair the active-preset reference after edits: if the active id no
    /// longer names a preset, fall back to the first one (re-adding the
    /// built-in default when the list is empty).
    pub fn ensure_active_preset(&mut self) {
        if self.label_presets.is_empty() {
            self.label_presets.push(LabelPreset::default_preset());
        }
        if !self.label_presets.iter().any(|p| p.id == self.active_preset_id) {
            self.active_preset_id = self.label_presets[0].id.clone();
        }
    }
}

/// Storage-medium-agnostic settings repository.
pub trait PrefsStore: Send + Sync {
    /// Load the stored preferences, falling back to defaults when nothing
    /// has been saved yet (or the stored blob is unreadable).
    fn load(&self) -> Result<Preferences, CoreError>;

    /// Persist the given preferences.
    fn save(&self, prefs: &Preferences) -> Result<(), CoreError>;

    /// Discard stored preferences and return the defaults.
    fn reset(&self) -> Result<Preferences, CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_consistent() {
        let prefs = Preferences::default();
        assert_eq!(prefs.label_presets.len(), 1);
        assert_eq!(prefs.active_preset_id, prefs.label_presets[0].id);
        assert_eq!(prefs.theme.primary, "#38bdf8");
    }

    #[test]
    fn test_ensure_active_preset_falls_back() {
        let mut prefs = Preferences::default();
        prefs.active_preset_id = "gone".into();
        prefs.ensure_active_preset();
        assert_eq!(prefs.active_preset_id, prefs.label_presets[0].id);
    }

    #[test]
    fn test_ensure_active_preset_restores_default_when_empty() {
        let mut prefs = Preferences::default();
        prefs.label_presets.clear();
        prefs.ensure_active_preset();
        assert_eq!(prefs.label_presets.len(), 1);
        assert_eq!(prefs.active_preset_id, LabelPreset::default_preset().id);
    }

    #[test]
    fn test_preferences_json_round_trip() {
        let prefs = Preferences::default();
        let json = serde_json::to_string(&prefs).unwrap();
        let back: Preferences = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
    }
}
