//! Game State Definitions
//!
//! The `World` owns every piece of simulation state. Only the tick
//! function and the steps it calls mutate it.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::config::GameConfig;
use crate::core::fixed::GRID_SIZE;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::core::rect::Rect;
use crate::core::rng::DeterministicRng;
use crate::core::vec2::FixedVec2;
use crate::game::actor::{EnemyActor, EnemyId, PlayerActor, PlayerSlot};
use crate::game::events::GameEvent;
use crate::game::map::ObstacleField;
use crate::game::powerup::PowerUpSlot;
use crate::game::wave::{populate_wave, WaveState};

// =============================================================================
// GAME MODE / PHASE
// =============================================================================

/// Number of human players and the matching terminal rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Ends when player one dies
    #[default]
    SinglePlayer,
    /// Ends when both players are dead
    TwoPlayer,
}

impl GameMode {
    /// Player slots in use.
    pub fn player_count(self) -> usize {
        match self {
            GameMode::SinglePlayer => 1,
            GameMode::TwoPlayer => 2,
        }
    }
}

/// Whether the game is still running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Terminal; ticks are no-ops
    GameOver,
}

// =============================================================================
// SPAWN POINTS
// =============================================================================

/// Preferred and fallback spawn cells (top-left, whole units) per slot.
const SPAWN_POINTS: [[(i32, i32); 2]; 2] = [
    [(GRID_SIZE, 800 - GRID_SIZE * 2), (GRID_SIZE * 2, 800 - GRID_SIZE * 3)],
    [(800 - GRID_SIZE * 2, 800 - GRID_SIZE * 2), (800 - GRID_SIZE * 3, 800 - GRID_SIZE * 3)],
];

fn spawn_position(slot: PlayerSlot, obstacles: &ObstacleField) -> FixedVec2 {
    let [(x, y), (fx, fy)] = SPAWN_POINTS[slot.index()];
    if obstacles.blocks(&Rect::new(x, y, GRID_SIZE, GRID_SIZE)) {
        FixedVec2::from_ints(fx, fy)
    } else {
        FixedVec2::from_ints(x, y)
    }
}

// =============================================================================
// WORLD
// =============================================================================

/// Complete state of one game.
#[derive(Clone, Debug)]
pub struct World {
    /// Single or two player
    pub mode: GameMode,

    /// Playing until the terminal condition holds
    pub phase: GamePhase,

    /// Ticks simulated so far
    pub tick: u32,

    /// Simulation clock (ms), advanced by `config.tick_ms` each tick
    pub clock_ms: u64,

    /// RNG seed (for verification and reset)
    pub seed: u64,

    /// Deterministic RNG state
    pub rng: DeterministicRng,

    /// Tunables this game was started with
    pub config: GameConfig,

    /// Static arena layout
    pub obstacles: ObstacleField,

    /// Player slots. Slot two is `None` in single-player mode.
    pub players: [Option<PlayerActor>; 2],

    /// Live enemies in spawn order
    pub enemies: Vec<EnemyActor>,

    /// Next enemy ID (monotonic counter)
    pub next_enemy_id: EnemyId,

    /// The single power-up slot
    pub power_up: PowerUpSlot,

    /// Wave number and shared score
    pub wave: WaveState,

    /// Events generated this tick (cleared each tick)
    pub pending_events: Vec<GameEvent>,
}

impl World {
    /// Start a new game: fresh arena, players at their spawn cells,
    /// wave 1 populated.
    pub fn new(mode: GameMode, seed: u64, config: GameConfig) -> Self {
        let obstacles = ObstacleField::new();
        let max_health = config.player.max_health;

        let mut players = [None, None];
        for slot in PlayerSlot::ALL.into_iter().take(mode.player_count()) {
            let position = spawn_position(slot, &obstacles);
            players[slot.index()] = Some(PlayerActor::new(slot, position, max_health));
        }

        let mut world = Self {
            mode,
            phase: GamePhase::Playing,
            tick: 0,
            clock_ms: 0,
            seed,
            rng: DeterministicRng::new(seed),
            config,
            obstacles,
            players,
            enemies: Vec::new(),
            next_enemy_id: 0,
            power_up: PowerUpSlot::new(0),
            wave: WaveState::default(),
            pending_events: Vec::new(),
        };

        populate_wave(&mut world);
        debug!(?mode, seed, enemies = world.enemies.len(), "game started");
        world
    }

    /// New game using the seed and mode from `config`.
    pub fn from_config(config: GameConfig) -> Self {
        Self::new(config.mode, config.seed, config)
    }

    /// Restart with the same mode, seed and config.
    pub fn reset(&mut self) {
        let config = std::mem::take(&mut self.config);
        *self = Self::new(self.mode, self.seed, config);
    }

    /// Get a player by slot.
    pub fn player(&self, slot: PlayerSlot) -> Option<&PlayerActor> {
        self.players[slot.index()].as_ref()
    }

    /// Get a player mutably by slot.
    pub fn player_mut(&mut self, slot: PlayerSlot) -> Option<&mut PlayerActor> {
        self.players[slot.index()].as_mut()
    }

    /// Hit-box of a player who exists and is alive.
    pub fn live_player_rect(&self, slot: PlayerSlot) -> Option<Rect> {
        self.player(slot).filter(|p| p.is_alive()).map(|p| p.rect())
    }

    /// Shared score.
    pub fn score(&self) -> u32 {
        self.wave.score
    }

    /// Current wave, starting at 1.
    pub fn wave_number(&self) -> u32 {
        self.wave.wave
    }

    /// Check if the game has ended.
    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver)
    }

    /// Terminal condition for the current mode.
    ///
    /// Single-player ends when player one is down; two-player only when
    /// both are.
    pub fn all_players_down(&self) -> bool {
        let down = |slot| self.player(slot).map_or(true, |p: &PlayerActor| !p.is_alive());
        match self.mode {
            GameMode::SinglePlayer => down(PlayerSlot::One),
            GameMode::TwoPlayer => down(PlayerSlot::One) && down(PlayerSlot::Two),
        }
    }

    /// Score one enemy kill, crediting `by` if a player is responsible.
    pub fn award_kill(&mut self, by: Option<PlayerSlot>) {
        self.wave.score = self.wave.score.saturating_add(self.config.wave.score_per_kill);
        if let Some(slot) = by {
            if let Some(player) = self.player_mut(slot) {
                player.kills += 1;
            }
        }
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.seed, |hasher| {
            hasher.update_u64(self.clock_ms);
            hasher.update_u8(self.phase as u8);

            for (i, player) in self.players.iter().enumerate() {
                match player {
                    Some(p) => {
                        hasher.update_u8(i as u8 + 1);
                        p.actor.hash_into(hasher);
                        hasher.update_u32(p.kills);
                    }
                    None => hasher.update_u8(0),
                }
            }

            hasher.update_u32(self.enemies.len() as u32);
            for enemy in &self.enemies {
                hasher.update_u32(enemy.id);
                enemy.actor.hash_into(hasher);
                hasher.update_u32(enemy.ai.move_timer);
                hasher.update_u32(enemy.ai.fire_cooldown);
            }
            hasher.update_u32(self.next_enemy_id);

            hasher.update_bool(self.power_up.active);
            hasher.update_rect(self.power_up.rect);
            hasher.update_u8(self.power_up.kind as u8);
            hasher.update_u64(self.power_up.spawned_at);
            hasher.update_u64(self.power_up.last_spawn_at);

            hasher.update_u32(self.wave.wave);
            hasher.update_u32(self.wave.score);

            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================
