//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::game::{GameKind, HandMode};
use crate::hand::{GestureThresholds, TrackingConfig};

/// Application configuration loaded from environment variables
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// One hand steers and fires, or left steers and right fires
    pub hand_mode: HandMode,
    /// Which game to run
    pub game: GameKind,

    /// Classifier thresholds (palm widths)
    pub thresholds: GestureThresholds,
    /// Smoothing, debounce and lost-tracking settings
    pub tracking: TrackingConfig,

    /// Spawn-rate ramp; 0 keeps spawn rates constant
    pub difficulty_ramp: f32,
    /// Fixed RNG seed; random per session when unset
    pub seed: Option<u64>,

    /// Pace ticks at the simulation rate instead of as fast as input arrives
    pub realtime: bool,
    /// Draw the landmark skeleton in every frame
    pub debug_overlay: bool,
    /// JSON-lines score log; scores are only logged when unset
    pub score_log: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            hand_mode: HandMode::Single,
            game: GameKind::Shooter,
            thresholds: GestureThresholds::default(),
            tracking: TrackingConfig::default(),
            difficulty_ramp: 1.0,
            seed: None,
            realtime: true,
            debug_overlay: false,
            score_log: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build configuration from any variable source, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let thresholds = GestureThresholds {
            pinch: parse_or(&get, "PINCH_THRESHOLD", defaults.thresholds.pinch)?,
            tight_pinch: parse_or(&get, "TIGHT_PINCH_THRESHOLD", defaults.thresholds.tight_pinch)?,
            extension: parse_or(&get, "EXTENSION_THRESHOLD", defaults.thresholds.extension)?,
            ..defaults.thresholds
        };
        let tracking = TrackingConfig {
            smoothing: parse_or(&get, "SMOOTHING_FACTOR", defaults.tracking.smoothing)?,
            debounce_frames: parse_or(&get, "DEBOUNCE_FRAMES", defaults.tracking.debounce_frames)?,
            lost_frames: parse_or(&get, "LOST_FRAMES", defaults.tracking.lost_frames)?,
            ..defaults.tracking
        };

        let config = Self {
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            hand_mode: match get("HAND_MODE") {
                Some(v) => parse_hand_mode(&v)?,
                None => defaults.hand_mode,
            },
            game: match get("GAME") {
                Some(v) => parse_game(&v)?,
                None => defaults.game,
            },
            thresholds,
            tracking,
            difficulty_ramp: parse_or(&get, "DIFFICULTY_RAMP", defaults.difficulty_ramp)?,
            seed: match get("GAME_SEED") {
                Some(v) => Some(parse_value("GAME_SEED", &v)?),
                None => None,
            },
            realtime: match get("REALTIME") {
                Some(v) => parse_bool("REALTIME", &v)?,
                None => defaults.realtime,
            },
            debug_overlay: match get("DEBUG_OVERLAY") {
                Some(v) => parse_bool("DEBUG_OVERLAY", &v)?,
                None => defaults.debug_overlay,
            },
            score_log: get("SCORE_LOG").map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range values instead of clamping them
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if !(t.pinch.is_finite() && t.pinch > 0.0) {
            return Err(ConfigError::OutOfRange {
                var: "PINCH_THRESHOLD",
                reason: "must be positive",
            });
        }
        if !(t.tight_pinch.is_finite() && t.tight_pinch > 0.0 && t.tight_pinch < t.pinch) {
            return Err(ConfigError::OutOfRange {
                var: "TIGHT_PINCH_THRESHOLD",
                reason: "must be positive and below PINCH_THRESHOLD",
            });
        }
        if !t.extension.is_finite() {
            return Err(ConfigError::OutOfRange {
                var: "EXTENSION_THRESHOLD",
                reason: "must be finite",
            });
        }
        let s = self.tracking.smoothing;
        if !(s > 0.0 && s <= 1.0) {
            return Err(ConfigError::OutOfRange {
                var: "SMOOTHING_FACTOR",
                reason: "must be in (0, 1]",
            });
        }
        if self.tracking.debounce_frames == 0 {
            return Err(ConfigError::OutOfRange {
                var: "DEBOUNCE_FRAMES",
                reason: "must be at least 1",
            });
        }
        if self.tracking.lost_frames == 0 {
            return Err(ConfigError::OutOfRange {
                var: "LOST_FRAMES",
                reason: "must be at least 1",
            });
        }
        if !(self.difficulty_ramp.is_finite() && self.difficulty_ramp >= 0.0) {
            return Err(ConfigError::OutOfRange {
                var: "DIFFICULTY_RAMP",
                reason: "must be zero or positive",
            });
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_string(),
    })
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        Some(v) => parse_value(var, &v),
        None => Ok(default),
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
        }),
    }
}

fn parse_hand_mode(value: &str) -> Result<HandMode, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "single" | "one" | "1" => Ok(HandMode::Single),
        "dual" | "two" | "2" => Ok(HandMode::Dual),
        _ => Err(ConfigError::Invalid {
            var: "HAND_MODE",
            value: value.to_string(),
        }),
    }
}

fn parse_game(value: &str) -> Result<GameKind, ConfigError> {
    match value.to_ascii_lowercase().replace('-', "_").as_str() {
        "shooter" | "space_shooter" => Ok(GameKind::Shooter),
        "flight" | "flight_combat" => Ok(GameKind::Flight),
        _ => Err(ConfigError::Invalid {
            var: "GAME",
            value: value.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("{var} out of range: {reason}")]
    OutOfRange {
        var: &'static str,
        reason: &'static str,
    },
}
