//! Wave and Spawn Director
//!
//! Enemy placement by rejection sampling over interior grid cells, and
//! the wave-completion policy.

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::config::{EnemyConfig, WaveConfig};
use crate::core::rect::Rect;
use crate::core::rng::DeterministicRng;
use crate::game::actor::{EnemyActor, EnemyId, PlayerSlot};
use crate::game::ai::{wander_heading, EnemyAi};
use crate::game::events::GameEvent;
use crate::game::map::ObstacleField;
use crate::game::state::World;

/// Wave counter and shared score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveState {
    /// Current wave, starting at 1
    pub wave: u32,
    /// Kills plus clear bonuses, shared by both players
    pub score: u32,
}

impl Default for WaveState {
    fn default() -> Self {
        Self { wave: 1, score: 0 }
    }
}

impl WaveState {
    /// Advance the wave if no enemies remain. Returns whether it did.
    ///
    /// The caller spawns the next wave.
    pub fn check_completion(&mut self, live_enemies: usize, clear_bonus: u32) -> bool {
        if live_enemies > 0 {
            return false;
        }
        self.wave += 1;
        self.score = self.score.saturating_add(clear_bonus);
        true
    }
}

/// Enemies in a wave: `base + wave / 2`, capped.
#[inline]
pub fn spawn_count(wave: u32, config: &WaveConfig) -> u32 {
    (config.base_enemy_count + wave / 2).min(config.max_enemies)
}

/// Everything the spawner needs to know about the players.
pub struct SpawnContext<'a> {
    /// Arena layout
    pub obstacles: &'a ObstacleField,
    /// Hit-boxes of every player in the game; spawn cells must avoid them
    pub player_rects: &'a [Rect],
    /// Whether a second player exists to be targeted
    pub two_players: bool,
}

/// Place the enemies for `wave`.
///
/// Each enemy gets up to `spawn_attempts` random interior cells; an enemy
/// whose attempts all fail is dropped. Cells may be shared between enemies
/// of the same wave.
pub fn spawn_wave(
    wave: u32,
    ctx: &SpawnContext<'_>,
    rng: &mut DeterministicRng,
    wave_config: &WaveConfig,
    enemy_config: &EnemyConfig,
    next_id: &mut EnemyId,
) -> Vec<EnemyActor> {
    let wanted = spawn_count(wave, wave_config);
    let mut enemies = Vec::with_capacity(wanted as usize);

    for _ in 0..wanted {
        let Some(cell) = find_spawn_cell(ctx, rng, wave_config.spawn_attempts) else {
            continue;
        };

        let target = if ctx.two_players {
            rng.choose(&PlayerSlot::ALL).copied()
        } else {
            Some(PlayerSlot::One)
        };
        let heading = wander_heading(rng);

        let ai = EnemyAi::new(target, enemy_config.move_duration_ticks);
        enemies.push(EnemyActor::new(*next_id, cell, heading, ai));
        *next_id += 1;
    }

    if enemies.len() < wanted as usize {
        warn!(wave, wanted, placed = enemies.len(), "could not place every enemy");
    }
    debug!(wave, count = enemies.len(), "wave spawned");

    enemies
}

fn find_spawn_cell(ctx: &SpawnContext<'_>, rng: &mut DeterministicRng, attempts: u32) -> Option<Rect> {
    (0..attempts)
        .map(|_| ObstacleField::random_interior_cell(rng))
        .find(|cell| {
            !ctx.obstacles.blocks(cell) && !ctx.player_rects.iter().any(|p| p.intersects(cell))
        })
}

/// Spawn the current wave into the world.
pub fn populate_wave(world: &mut World) -> u32 {
    let player_rects: Vec<Rect> = world.players.iter().flatten().map(|p| p.rect()).collect();
    let ctx = SpawnContext {
        obstacles: &world.obstacles,
        player_rects: &player_rects,
        two_players: world.players[PlayerSlot::Two.index()].is_some(),
    };

    let enemies = spawn_wave(
        world.wave.wave,
        &ctx,
        &mut world.rng,
        &world.config.wave,
        &world.config.enemy,
        &mut world.next_enemy_id,
    );
    let count = enemies.len() as u32;
    world.enemies = enemies;

    world.push_event(GameEvent::wave_started(world.tick, world.wave.wave, count));
    count
}

/// Wave completion check. Awards the bonus and spawns the next wave when
/// the enemy list is empty.
pub fn advance_wave_if_cleared(world: &mut World) -> bool {
    let cleared = world.wave.wave;
    let bonus = world.config.wave.clear_bonus;
    if !world.wave.check_completion(world.enemies.len(), bonus) {
        return false;
    }

    info!(wave = cleared, score = world.wave.score, "wave cleared");
    world.push_event(GameEvent::wave_cleared(world.tick, cleared, bonus));
    populate_wave(world);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_spawn_count() {
        let config = WaveConfig::default();
        assert_eq!(spawn_count(1, &config), 1);
        assert_eq!(spawn_count(2, &config), 2);
        assert_eq!(spawn_count(3, &config), 2);
        assert_eq!(spawn_count(4, &config), 3);
        assert_eq!(spawn_count(18, &config), 10);
        assert_eq!(spawn_count(20, &config), 10);
        assert_eq!(spawn_count(1000, &config), 10);
    }

    #[test]
    fn test_check_completion() {
        let mut state = WaveState::default();
        assert!(!state.check_completion(2, 500));
        assert_eq!(state, WaveState { wave: 1, score: 0 });

        assert!(state.check_completion(0, 500));
        assert_eq!(state, WaveState { wave: 2, score: 500 });
    }

    #[test]
    fn test_spawn_avoids_obstacles_and_players() {
        let field = ObstacleField::new();
        let players = [Rect::new(40, 720, 40, 40)];
        let ctx = SpawnContext { obstacles: &field, player_rects: &players, two_players: false };
        let mut rng = DeterministicRng::new(31);
        let mut next_id = 0;

        for wave in 1..=20 {
            let enemies = spawn_wave(
                wave,
                &ctx,
                &mut rng,
                &WaveConfig::default(),
                &EnemyConfig::default(),
                &mut next_id,
            );
            assert_eq!(enemies.len() as u32, spawn_count(wave, &WaveConfig::default()));
            for enemy in &enemies {
                assert!(!field.blocks(&enemy.rect()));
                assert!(!enemy.rect().intersects(&players[0]));
                assert_eq!(enemy.ai.target, Some(PlayerSlot::One));
            }
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let field = ObstacleField::new();
        let ctx = SpawnContext { obstacles: &field, player_rects: &[], two_players: true };
        let mut rng = DeterministicRng::new(8);
        let mut next_id = 0;

        let a = spawn_wave(20, &ctx, &mut rng, &WaveConfig::default(), &EnemyConfig::default(), &mut next_id);
        let b = spawn_wave(20, &ctx, &mut rng, &WaveConfig::default(), &EnemyConfig::default(), &mut next_id);
        let ids: BTreeSet<EnemyId> = a.iter().chain(b.iter()).map(|e| e.id).collect();
        assert_eq!(ids.len(), a.len() + b.len());
        assert_eq!(ids.len(), 20);
        assert_eq!(next_id, 20);
    }

    #[test]
    fn test_two_player_targets_both() {
        let field = ObstacleField::new();
        let ctx = SpawnContext { obstacles: &field, player_rects: &[], two_players: true };
        let mut rng = DeterministicRng::new(12);
        let mut next_id = 0;
        let mut seen = [false; 2];

        for _ in 0..10 {
            let enemies = spawn_wave(20, &ctx, &mut rng, &WaveConfig::default(), &EnemyConfig::default(), &mut next_id);
            for enemy in enemies {
                let target = enemy.ai.target.unwrap();
                seen[target.index()] = true;
            }
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_under_spawn_when_no_cell_fits() {
        // A player rect covering the whole interior leaves no valid cell
        let field = ObstacleField::new();
        let players = [Rect::new(40, 40, 720, 720)];
        let ctx = SpawnContext { obstacles: &field, player_rects: &players, two_players: false };
        let mut rng = DeterministicRng::new(4);
        let mut next_id = 0;

        let enemies = spawn_wave(4, &ctx, &mut rng, &WaveConfig::default(), &EnemyConfig::default(), &mut next_id);
        assert!(enemies.is_empty());
        assert_eq!(next_id, 0);
    }
}
