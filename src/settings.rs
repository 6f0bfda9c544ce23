//! Player settings and preferences
//!
//! Persisted separately from the account record under its own storage key.

use serde::{Deserialize, Serialize};

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Class applied to the page body
    pub fn body_class(&self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }
}

/// Game settings/preferences
///
/// Missing fields in stored JSON fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Background music on/off
    pub sound_enabled: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_volume: 0.7,
            theme: Theme::Light,
        }
    }
}

/// A partial settings change, as emitted by the settings modal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub sound_enabled: Option<bool>,
    pub music_volume: Option<f32>,
    pub theme: Option<Theme>,
}

impl Settings {
    /// Merge a partial update; volume is clamped to 0.0 - 1.0
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(enabled) = update.sound_enabled {
            self.sound_enabled = enabled;
        }
        if let Some(volume) = update.music_volume {
            self.music_volume = clamp_volume(volume);
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
    }

    /// Volume actually sent to the player (stored values may be out of range)
    pub fn effective_volume(&self) -> f32 {
        clamp_volume(self.music_volume)
    }

    /// Volume as a whole percentage, for display
    pub fn volume_percent(&self) -> u32 {
        (self.effective_volume() * 100.0).round() as u32
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        Settings::default().music_volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&Settings::default()).expect("serialize");
        assert_eq!(json, r#"{"soundEnabled":true,"musicVolume":0.7,"theme":"light"}"#);
    }

    #[test]
    fn test_partial_json_merges_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme":"dark"}"#).expect("parse");
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.sound_enabled);
        assert_eq!(settings.music_volume, 0.7);
    }

    #[test]
    fn test_apply_update() {
        let mut settings = Settings::default();
        settings.apply(&SettingsUpdate {
            music_volume: Some(1.5),
            sound_enabled: Some(false),
            ..Default::default()
        });
        assert_eq!(settings.music_volume, 1.0);
        assert!(!settings.sound_enabled);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.volume_percent(), 100);
    }

    #[test]
    fn test_theme_helpers() {
        assert_eq!(serde_json::to_string(&Theme::Dark).expect("encode"), r#""dark""#);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.body_class(), "theme-dark");
    }
}
