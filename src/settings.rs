//! Game tuning and preferences
//!
//! Persisted in LocalStorage on the web, read from a JSON file natively.
//! Every default matches the gameplay constants in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Ball kinematics tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Ball radius (cell units)
    pub ball_radius: f32,
    /// Speed cap (cell units per frame)
    pub max_speed: f32,
    /// Per-frame multiplicative velocity decay
    pub friction: f32,
    /// Velocity added per frame per unit of control
    pub acceleration: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            max_speed: BALL_MAX_SPEED,
            friction: BALL_FRICTION,
            acceleration: BALL_ACCELERATION,
        }
    }
}

/// Input normalization tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTuning {
    /// Smoothing weight while tilt sensors drive the ball
    pub sensor_smoothing: f32,
    /// Smoothing weight for keyboard/touch
    pub keyboard_smoothing: f32,
    /// Orientation angle (degrees) giving full deflection
    pub orientation_range_deg: f32,
    /// Acceleration (m/s²) giving full deflection
    pub motion_range: f32,
    pub jitter_deadzone: f32,
    pub touch_full_tilt_px: f32,
    pub calibration_ms: f64,
    pub fade_cutoff: f32,
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            sensor_smoothing: SENSOR_SMOOTHING,
            keyboard_smoothing: KEYBOARD_SMOOTHING,
            orientation_range_deg: ORIENTATION_RANGE_DEG,
            motion_range: MOTION_RANGE,
            jitter_deadzone: TILT_JITTER_DEADZONE,
            touch_full_tilt_px: TOUCH_FULL_TILT_PX,
            calibration_ms: CALIBRATION_MS,
            fade_cutoff: TOUCH_FADE_CUTOFF,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsTuning,
    pub input: InputTuning,
}

impl Settings {
    /// LocalStorage key (wasm) / env var naming a JSON file (native)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tilt_maze_settings";
    #[allow(dead_code)]
    const ENV_PATH: &'static str = "TILT_MAZE_SETTINGS";

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
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

    /// Load settings from the file named by `TILT_MAZE_SETTINGS` (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_PATH) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring settings file {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read settings file {}: {}", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let settings = Settings::default();
        assert_eq!(settings.physics.max_speed, 0.25);
        assert_eq!(settings.physics.friction, 0.96);
        assert_eq!(settings.physics.acceleration, 0.012);
        assert_eq!(settings.physics.ball_radius, 0.35);
        assert_eq!(settings.input.sensor_smoothing, 0.4);
        assert_eq!(settings.input.keyboard_smoothing, 0.75);
        assert_eq!(settings.input.calibration_ms, 600.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"physics":{"max_speed":0.3}}"#).unwrap();
        assert_eq!(settings.physics.max_speed, 0.3);
        assert_eq!(settings.physics.friction, BALL_FRICTION);
        assert_eq!(settings.input, InputTuning::default());
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(Settings::from_json("{not json").is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = Settings::default();
        settings.input.touch_full_tilt_px = 80.0;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
