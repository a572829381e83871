//! Player preferences and host guards
//!
//! Stored as JSON: a file on native, LocalStorage in the browser. Missing
//! fields fall back to their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::STARTING_LIVES;
use crate::sim::normalize_elapsed;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{field} must be between 0.0 and 1.0, got {value}")]
    VolumeOutOfRange { field: &'static str, value: f32 },
    #[error("starting_lives must be at least 1")]
    NoLives,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Gameplay ===
    /// Lives at the start of a new game
    pub starting_lives: u32,

    // === Host ===
    /// Longest frame gap integrated in one step, in ms. 0 disables the guard.
    pub max_frame_gap_ms: f64,
    /// Pause when the page is hidden or loses focus
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            starting_lives: STARTING_LIVES,

            max_frame_gap_ms: 100.0,
            pause_on_blur: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "platform_quest_settings";

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::VolumeOutOfRange { field, value });
            }
        }
        if self.starting_lives == 0 {
            return Err(SettingsError::NoLives);
        }
        Ok(())
    }

    /// Frame gap guard in reference frames
    pub fn max_step(&self) -> Option<f32> {
        (self.max_frame_gap_ms > 0.0).then(|| normalize_elapsed(self.max_frame_gap_ms))
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"muted": true, "starting_lives": 5}"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.starting_lives, 5);
        assert_eq!(settings.master_volume, Settings::default().master_volume);
    }

    #[test]
    fn test_round_trip_through_json() {
        let settings = Settings {
            sfx_volume: 0.5,
            pause_on_blur: false,
            ..Default::default()
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            Settings::from_json(r#"{"master_volume": 1.5}"#),
            Err(SettingsError::VolumeOutOfRange {
                field: "master_volume",
                ..
            })
        ));
        assert!(matches!(
            Settings::from_json(r#"{"starting_lives": 0}"#),
            Err(SettingsError::NoLives)
        ));
        assert!(matches!(
            Settings::from_json("{"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_max_step() {
        let mut settings = Settings {
            max_frame_gap_ms: FRAME_MS * 3.0,
            ..Default::default()
        };
        assert!((settings.max_step().unwrap() - 3.0).abs() < 1e-5);

        settings.max_frame_gap_ms = 0.0;
        assert_eq!(settings.max_step(), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/nonexistent/platform-quest/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
