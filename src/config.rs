use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::animation::OneShotSpec;

pub const CONFIG_ENV_VAR: &str = "PIZZA_DASH_CONFIG";

/// Every tunable of the simulation. All fields have defaults, so a JSON
/// override file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    /// `y` of a player standing on the street.
    pub ground_y: i32,
    pub player: PlayerConfig,
    pub hostile: HostileConfig,
    pub combat: CombatConfig,
    pub scoring: ScoringConfig,
    pub session: SessionConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    pub width: i32,
    pub height: i32,
    pub max_health: u32,
    pub walk_step: i32,
    pub climb_step: i32,
    pub gravity: f32,
    /// Negative: upward.
    pub jump_speed: f32,
    /// Extra height of the feet probe used for landing and support.
    pub landing_margin: i32,
    /// Extra height of the probe used to find ladders.
    pub ladder_margin: i32,
    pub attack_width: i32,
    pub attack_height: i32,
    /// Horizontal offset of the attack box when facing right.
    pub attack_reach: i32,
    pub attack_offset_y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostileConfig {
    pub width: i32,
    pub height: i32,
    pub max_health: u32,
    pub speed: i32,
    /// A patrolling hostile turns around with probability `1 / turn_odds`
    /// each frame. Zero disables random turns.
    pub turn_odds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CombatConfig {
    pub attack_damage: u32,
    pub contact_damage: u32,
    pub knockback: i32,
    pub invincibility_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub kill_bonus: u32,
    pub delivery_bonus: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Frames per level attempt.
    pub level_timer: u32,
    pub starting_lives: u32,
    pub loading_delay_ms: u64,
    pub level_count: u32,
    pub rng_seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    pub ticks_per_frame: u32,
    pub walk_frames: u32,
    pub climb_frames: u32,
    pub hostile_frames: u32,
    pub loading_frames: u32,
    pub attack: OneShotSpec,
    pub deliver: OneShotSpec,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 450,
            ground_y: 356,
            player: PlayerConfig::default(),
            hostile: HostileConfig::default(),
            combat: CombatConfig::default(),
            scoring: ScoringConfig::default(),
            session: SessionConfig::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 46,
            max_health: 3,
            walk_step: 4,
            climb_step: 2,
            gravity: 1.3,
            jump_speed: -20.0,
            landing_margin: 1,
            ladder_margin: 2,
            attack_width: 18,
            attack_height: 10,
            attack_reach: 29,
            attack_offset_y: 26,
        }
    }
}

impl Default for HostileConfig {
    fn default() -> Self {
        Self {
            width: 26,
            height: 42,
            max_health: 3,
            speed: 1,
            turn_odds: 240,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_damage: 1,
            contact_damage: 1,
            knockback: 13,
            invincibility_ticks: 120,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            kill_bonus: 5,
            delivery_bonus: 50,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            level_timer: 6000,
            starting_lives: 3,
            loading_delay_ms: 4000,
            level_count: 5,
            rng_seed: 0x5eed_1234,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            ticks_per_frame: 6,
            walk_frames: 7,
            climb_frames: 3,
            hostile_frames: 5,
            loading_frames: 12,
            attack: OneShotSpec {
                frame_count: 3,
                guard: 1,
            },
            deliver: OneShotSpec {
                frame_count: 10,
                guard: 2,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config json at {field}: {source}")]
    Parse {
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl GameConfig {
    /// Defaults, or the file named by `PIZZA_DASH_CONFIG` when set.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "config_loaded");
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config: GameConfig = serde_path_to_error::deserialize(&mut deserializer).map_err(
            |error| {
                let field = error.path().to_string();
                ConfigError::Parse {
                    field,
                    source: error.into_inner(),
                }
            },
        )?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: i64) -> Result<(), ConfigError> {
            if value > 0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a positive value, got {value}"),
                })
            }
        }

        positive("screen_width", self.screen_width.into())?;
        positive("screen_height", self.screen_height.into())?;
        positive("player.width", self.player.width.into())?;
        positive("player.height", self.player.height.into())?;
        positive("player.max_health", self.player.max_health.into())?;
        positive("player.walk_step", self.player.walk_step.into())?;
        positive("player.climb_step", self.player.climb_step.into())?;
        positive("hostile.width", self.hostile.width.into())?;
        positive("hostile.height", self.hostile.height.into())?;
        positive("hostile.max_health", self.hostile.max_health.into())?;
        positive("session.level_count", self.session.level_count.into())?;
        positive("session.starting_lives", self.session.starting_lives.into())?;
        positive("animation.ticks_per_frame", self.animation.ticks_per_frame.into())?;
        positive("animation.walk_frames", self.animation.walk_frames.into())?;
        positive("animation.climb_frames", self.animation.climb_frames.into())?;
        positive("animation.hostile_frames", self.animation.hostile_frames.into())?;
        positive("animation.loading_frames", self.animation.loading_frames.into())?;
        positive("animation.attack.guard", self.animation.attack.guard.into())?;
        positive("animation.deliver.guard", self.animation.deliver.guard.into())?;

        if !(self.player.gravity.is_finite() && self.player.gravity > 0.0) {
            return Err(ConfigError::Invalid {
                field: "player.gravity",
                reason: format!("expected a finite positive value, got {}", self.player.gravity),
            });
        }
        if !(self.player.jump_speed.is_finite() && self.player.jump_speed < 0.0) {
            return Err(ConfigError::Invalid {
                field: "player.jump_speed",
                reason: format!("expected a finite negative value, got {}", self.player.jump_speed),
            });
        }
        Ok(())
    }
}
