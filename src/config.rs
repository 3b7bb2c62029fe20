//! Game Configuration
//!
//! Every gameplay tunable in one place. Sources are layered:
//! defaults, then an optional JSON file, then environment overrides.

use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::game::state::GameMode;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its allowed range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Player tank tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Movement per tick per held axis (units)
    pub speed: f64,
    /// Starting and maximum health
    pub max_health: i32,
    /// Health removed by one unguarded hit
    pub damage_per_hit: i32,
    /// Health restored by a Health power-up
    pub heal_amount: i32,
    /// Invincibility granted after taking a hit (ms)
    pub hit_invincibility_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            max_health: 1000,
            damage_per_hit: 100,
            heal_amount: 200,
            hit_invincibility_ms: 1000,
        }
    }
}

/// Enemy tank tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Movement per tick (units)
    pub speed: i32,
    /// Ticks between heading re-evaluations
    pub move_duration_ticks: u32,
    /// Manhattan distance under which an enemy may fire
    pub fire_range: i32,
    /// Per-tick chance to fire when in range and off cooldown
    pub fire_chance_percent: u32,
    /// Ticks between shots
    pub fire_cooldown_ticks: u32,
    /// Chance that a seek decision is replaced by a random heading
    pub seek_noise_percent: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            speed: 2,
            move_duration_ticks: 50,
            fire_range: 200,
            fire_chance_percent: 10,
            fire_cooldown_ticks: 60,
            seek_noise_percent: 20,
        }
    }
}

/// Wave progression and scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Enemies in wave 0/1 before scaling
    pub base_enemy_count: u32,
    /// Hard cap on enemies per wave
    pub max_enemies: u32,
    /// Random cells tried per enemy before giving up on it
    pub spawn_attempts: u32,
    /// Score for clearing a wave
    pub clear_bonus: u32,
    /// Score per enemy destroyed
    pub score_per_kill: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            base_enemy_count: 1,
            max_enemies: 10,
            spawn_attempts: 100,
            clear_bonus: 500,
            score_per_kill: 100,
        }
    }
}

/// Relative weights for the power-up type roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpWeights {
    /// Weight of [`PowerUpKind::Health`](crate::game::powerup::PowerUpKind::Health)
    pub health: u32,
    /// Weight of `Freeze`
    pub freeze: u32,
    /// Weight of `Invincible`
    pub invincible: u32,
    /// Weight of `Bomb`
    pub bomb: u32,
}

impl Default for PowerUpWeights {
    fn default() -> Self {
        Self {
            health: 30,
            freeze: 30,
            invincible: 30,
            bomb: 10,
        }
    }
}

impl PowerUpWeights {
    /// Sum of all weights, or `None` if it does not fit in a `u32`.
    pub fn total(&self) -> Option<u32> {
        self.health
            .checked_add(self.freeze)?
            .checked_add(self.invincible)?
            .checked_add(self.bomb)
    }
}

/// Power-up timing and effects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    /// Minimum time between spawns (ms)
    pub spawn_interval_ms: u64,
    /// Time an unclaimed power-up stays on the field (ms)
    pub duration_ms: u64,
    /// Freeze length applied to every enemy (ms)
    pub freeze_ms: u64,
    /// Invincibility granted to the collector (ms)
    pub invincible_ms: u64,
    /// Type roll weights
    pub weights: PowerUpWeights,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 20_000,
            duration_ms: 10_000,
            freeze_ms: 5_000,
            invincible_ms: 5_000,
            weights: PowerUpWeights::default(),
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for a new game
    pub seed: u64,
    /// One or two players
    pub mode: GameMode,
    /// Simulation clock advance per tick (ms)
    pub tick_ms: u64,
    /// Projectile movement per tick (units)
    pub projectile_speed: i32,
    /// Player tank tunables
    pub player: PlayerConfig,
    /// Enemy tank and AI tunables
    pub enemy: EnemyConfig,
    /// Wave sizing and scoring
    pub wave: WaveConfig,
    /// Power-up timing and weights
    pub power_up: PowerUpConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            mode: GameMode::SinglePlayer,
            tick_ms: 16, // 1000 / 60, integer frame delay
            projectile_speed: 5,
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            wave: WaveConfig::default(),
            power_up: PowerUpConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Apply `ARENA_SEED`, `ARENA_MODE` and `ARENA_TICK_MS` overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup("ARENA_SEED") {
            self.seed = seed.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "seed",
                reason: format!("`{}` is not an unsigned integer", seed),
            })?;
        }

        if let Some(mode) = lookup("ARENA_MODE") {
            self.mode = match mode.trim().to_ascii_lowercase().as_str() {
                "1" | "single" | "1p" => GameMode::SinglePlayer,
                "2" | "two" | "2p" => GameMode::TwoPlayer,
                other => {
                    return Err(ConfigError::Invalid {
                        field: "mode",
                        reason: format!("unknown mode `{}`", other),
                    })
                }
            };
        }

        if let Some(tick_ms) = lookup("ARENA_TICK_MS") {
            self.tick_ms = tick_ms.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "tick_ms",
                reason: format!("`{}` is not an unsigned integer", tick_ms),
            })?;
        }

        self.validate()
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::Invalid { field, reason: reason.to_string() }
        }

        if self.tick_ms == 0 {
            return Err(invalid("tick_ms", "must be positive"));
        }
        if !(self.player.speed > 0.0 && self.player.speed < 40.0) {
            return Err(invalid("player.speed", "must be in (0, 40)"));
        }
        if self.player.max_health <= 0 {
            return Err(invalid("player.max_health", "must be positive"));
        }
        if self.player.damage_per_hit < 0 || self.player.heal_amount < 0 {
            return Err(invalid("player", "damage and heal must not be negative"));
        }
        if self.enemy.speed <= 0 {
            return Err(invalid("enemy.speed", "must be positive"));
        }
        if self.enemy.move_duration_ticks == 0 {
            return Err(invalid("enemy.move_duration_ticks", "must be positive"));
        }
        if self.enemy.fire_chance_percent > 100 || self.enemy.seek_noise_percent > 100 {
            return Err(invalid("enemy", "percentages must be at most 100"));
        }
        if self.projectile_speed <= 0 {
            return Err(invalid("projectile_speed", "must be positive"));
        }
        match self.power_up.weights.total() {
            None => return Err(invalid("power_up.weights", "sum overflows u32")),
            Some(0) => return Err(invalid("power_up.weights", "at least one weight must be non-zero")),
            Some(_) => {}
        }
        Ok(())
    }
}
