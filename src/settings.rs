//! Game settings and preferences
//!
//! Read once at startup and never written back. On the web the page can
//! embed a JSON object in `<script id="settings" type="application/json">`;
//! natively the binary takes the path of a JSON file. Missing fields fall
//! back to their defaults.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Visual Effects ===
    /// Death burst particles
    pub particles: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no ball squash/stretch, no rotation)
    pub reduced_motion: bool,

    /// Fixed run seed; random per page load when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            particles: true,
            show_fps: false,
            reduced_motion: false,
            seed: None,
        }
    }
}

impl Settings {
    /// DOM id of the embedded settings block
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "settings";

    /// Parse settings from JSON, clamping volumes into range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Effective sound effect gain (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music gain (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Ball deformation and spin (respects reduced_motion)
    pub fn effective_ball_animation(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings embedded in the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from page");
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings JSON, using defaults: {}", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file, or defaults when no path is given
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&std::path::Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| Self::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Could not load {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"muted": true, "seed": 42}"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.master_volume, 0.8);
        assert!(settings.particles);
    }

    #[test]
    fn test_volumes_clamped() {
        let settings = Settings::from_json(r#"{"master_volume": 3.0, "sfx_volume": -1}"#).unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Settings::from_json("{not json").is_err());
        assert!(Settings::from_json(r#"{"muted": "yes"}"#).is_err());
    }

    #[test]
    fn test_mute_silences_everything() {
        let mut settings = Settings::default();
        assert!((settings.effective_sfx_volume() - 0.8).abs() < 1e-6);
        assert!((settings.effective_music_volume() - 0.56).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        assert_eq!(settings.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_reduced_motion() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_ball_animation());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load(Some(std::path::Path::new("/nonexistent/settings.json")));
        assert_eq!(settings, Settings::default());
        assert_eq!(Settings::load(None), Settings::default());
    }
}
