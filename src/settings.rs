//! Game balance tuning
//!
//! Loaded from an optional JSON file. Every field is optional in the file;
//! anything left out keeps the built-in value from [`crate::consts`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading a tuning file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read tuning file: {err}"),
            Self::Parse(err) => write!(f, "malformed tuning json: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning value `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Gameplay numbers for one play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Play-scene gravity (units/s²)
    pub gravity: f32,
    /// Menu idle gravity, handed to presentation only
    pub menu_gravity: f32,

    // === Player ===
    pub player_speed: f32,
    pub jump_velocity: f32,

    // === Stars ===
    pub stars_per_wave: usize,
    /// Horizontal jitter (± whole units) around each star's slot centre
    pub star_jitter: i32,
    pub star_bounce_min: f32,
    pub star_bounce_max: f32,
    pub points_per_star: u32,

    // === Bombs ===
    /// Horizontal spawn speed range (± whole units/s)
    pub bomb_spawn_vx: i32,
    pub bomb_spawn_vy: f32,
    pub bomb_ground_impulse: f32,
    pub bomb_reheading_threshold: f32,
    /// Horizontal re-heading range on landing (± whole units/s)
    pub bomb_ground_vx: i32,
    pub bomb_separation_impulse: f32,

    // === Timers (ms) ===
    pub hit_flash_ms: f64,
    pub game_over_delay_ms: f64,
    pub menu_start_delay_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: PLAY_GRAVITY,
            menu_gravity: MENU_GRAVITY,

            player_speed: PLAYER_SPEED,
            jump_velocity: PLAYER_JUMP_VELOCITY,

            stars_per_wave: STARS_PER_WAVE,
            star_jitter: STAR_JITTER,
            star_bounce_min: STAR_BOUNCE_MIN,
            star_bounce_max: STAR_BOUNCE_MAX,
            points_per_star: POINTS_PER_STAR,

            bomb_spawn_vx: BOMB_SPAWN_VX,
            bomb_spawn_vy: BOMB_SPAWN_VY,
            bomb_ground_impulse: BOMB_GROUND_IMPULSE,
            bomb_reheading_threshold: BOMB_REHEADING_THRESHOLD,
            bomb_ground_vx: BOMB_GROUND_VX,
            bomb_separation_impulse: BOMB_SEPARATION_IMPULSE,

            hit_flash_ms: HIT_FLASH_MS,
            game_over_delay_ms: GAME_OVER_DELAY_MS,
            menu_start_delay_ms: MENU_START_DELAY_MS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("gravity", self.gravity),
            ("menu_gravity", self.menu_gravity),
            ("player_speed", self.player_speed),
            ("jump_velocity", self.jump_velocity),
            ("star_bounce_min", self.star_bounce_min),
            ("star_bounce_max", self.star_bounce_max),
            ("bomb_spawn_vy", self.bomb_spawn_vy),
            ("bomb_ground_impulse", self.bomb_ground_impulse),
            ("bomb_reheading_threshold", self.bomb_reheading_threshold),
            ("bomb_separation_impulse", self.bomb_separation_impulse),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("{value} is not finite")));
            }
        }

        if self.gravity <= 0.0 {
            return Err(invalid("gravity", format!("{} must be positive", self.gravity)));
        }
        if self.stars_per_wave == 0 {
            return Err(invalid("stars_per_wave", "a wave needs at least one star".into()));
        }
        if self.star_bounce_min > self.star_bounce_max {
            return Err(invalid(
                "star_bounce_min",
                format!("{} exceeds star_bounce_max {}", self.star_bounce_min, self.star_bounce_max),
            ));
        }
        let ranges = [
            ("star_jitter", self.star_jitter),
            ("bomb_spawn_vx", self.bomb_spawn_vx),
            ("bomb_ground_vx", self.bomb_ground_vx),
        ];
        for (field, value) in ranges {
            if value < 0 {
                return Err(invalid(field, format!("{value} must not be negative")));
            }
        }
        let delays = [
            ("hit_flash_ms", self.hit_flash_ms),
            ("game_over_delay_ms", self.game_over_delay_ms),
            ("menu_start_delay_ms", self.menu_start_delay_ms),
        ];
        for (field, value) in delays {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, format!("{value} is not a valid delay")));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    log::warn!("Rejected tuning field {field}: {reason}");
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let tuning = Tuning::default();
        assert_eq!(tuning.gravity, 600.0);
        assert_eq!(tuning.stars_per_wave, 12);
        assert_eq!(tuning.bomb_ground_impulse, -700.0);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 900.0, "stars_per_wave": 6 }"#).unwrap();
        assert_eq!(tuning.gravity, 900.0);
        assert_eq!(tuning.stars_per_wave, 6);
        assert_eq!(tuning.player_speed, PLAYER_SPEED);
        assert_eq!(tuning.game_over_delay_ms, GAME_OVER_DELAY_MS);
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ gravity: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "stars_per_wave": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "stars_per_wave", .. }));

        let err = Tuning::from_json(r#"{ "star_bounce_min": 0.9, "star_bounce_max": 0.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "star_bounce_min", .. }));

        let err = Tuning::from_json(r#"{ "gravity": -1.0 }"#).unwrap_err();
        assert!(err.to_string().contains("gravity"));
    }

    #[test]
    fn test_missing_file() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
