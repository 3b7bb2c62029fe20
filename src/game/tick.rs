//! Authoritative Simulation Tick
//!
//! One fixed step of the arena. The step order below is part of the
//! game's behavior: changing it changes outcomes.
//!
//! 1. Player input and movement, then player projectiles
//! 2. Enemy AI and status timers, then enemy projectiles
//! 3. Enemy shots vs players
//! 4. Player shots vs enemies
//! 5. Purge the dead
//! 6. Wave completion
//! 7. Power-up spawn, expiry and collection
//! 8. Terminal condition

use tracing::info;

use crate::core::fixed::to_fixed;
use crate::core::rect::Rect;
use crate::game::actor::PlayerSlot;
use crate::game::ai::{update_enemy, AiContext};
use crate::game::collision::{check_enemy_shots_on_players, check_player_shots_on_enemies};
use crate::game::events::GameEvent;
use crate::game::input::{PlayerInputBuffer, TickInputs};
use crate::game::powerup::update_power_up;
use crate::game::state::{GamePhase, World};
use crate::game::wave::advance_wave_if_cleared;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the game is over (ended this tick or earlier)
    pub game_over: bool,
}

/// Run one simulation tick.
///
/// # Determinism
///
/// Given the same world and inputs the outcome is identical:
/// - All randomness comes from `world.rng`
/// - Timed effects read the simulation clock, never the wall clock
/// - Players, enemies and shots are visited in a fixed order
pub fn tick(world: &mut World, inputs: &TickInputs) -> TickResult {
    let mut result = TickResult::default();

    if world.is_game_over() {
        result.game_over = true;
        return result;
    }

    // 0. Advance tick counter and clock
    world.tick += 1;
    world.clock_ms += world.config.tick_ms;

    #[cfg(feature = "debug-tracing")]
    tracing::trace!(
        tick = world.tick,
        clock_ms = world.clock_ms,
        enemies = world.enemies.len(),
        "tick start"
    );

    // 1. Players
    apply_inputs(world, inputs);
    update_players(world);

    // 2. Enemies
    update_enemies(world);

    // 3-4. Projectile hits
    process_enemy_hits(world);
    process_player_hits(world);

    // 5. Purge
    purge_dead(world);

    // 6. Wave completion
    advance_wave_if_cleared(world);

    // 7. Power-up lifecycle
    update_power_up(world);

    // 8. End condition
    check_end_conditions(world, &mut result);

    result.events = world.take_events();
    result
}

/// Latch held directions and fire on the fire edge.
fn apply_inputs(world: &mut World, inputs: &TickInputs) {
    let speed = world.config.projectile_speed;
    let mut fired = Vec::new();

    for slot in PlayerSlot::ALL {
        if let Some(player) = world.players[slot.index()].as_mut() {
            if let Some(shot) = player.apply_input(inputs.get(slot), speed) {
                fired.push(shot.owner);
            }
        }
    }

    for shooter in fired {
        world.push_event(GameEvent::shot_fired(world.tick, shooter));
    }
}

/// Move each player, then advance that player's shots.
///
/// Player two moves against player one's already-updated position.
/// Dead players neither move nor block.
fn update_players(world: &mut World) {
    let speed = to_fixed(world.config.player.speed);
    let now = world.clock_ms;

    for slot in PlayerSlot::ALL {
        let other = world.live_player_rect(slot.other());
        let World { players, obstacles, .. } = &mut *world;

        if let Some(player) = players[slot.index()].as_mut() {
            player.update(obstacles, other.as_ref(), speed, now);
            player.actor.advance_projectiles(obstacles);
        }
    }
}

/// Run AI for every enemy, then advance all enemy shots.
fn update_enemies(world: &mut World) {
    let targets: [Option<Rect>; 2] = [
        world.live_player_rect(PlayerSlot::One),
        world.live_player_rect(PlayerSlot::Two),
    ];
    let ctx = AiContext {
        obstacles: &world.obstacles,
        config: &world.config.enemy,
        projectile_speed: world.config.projectile_speed,
        now: world.clock_ms,
    };

    let mut fired = Vec::new();
    for enemy in world.enemies.iter_mut() {
        let target = enemy.ai.target.and_then(|slot| targets[slot.index()]);
        if let Some(shot) = update_enemy(enemy, target, &mut world.rng, &ctx) {
            fired.push(shot.owner);
        }
    }

    for enemy in world.enemies.iter_mut() {
        enemy.actor.advance_projectiles(&world.obstacles);
    }

    for shooter in fired {
        world.push_event(GameEvent::shot_fired(world.tick, shooter));
    }
}

/// Enemy shots on players: damage, spend the shot, grant hit i-frames.
///
/// A shot passing through an invincible player stays in flight.
fn process_enemy_hits(world: &mut World) {
    let hits = check_enemy_shots_on_players(world);
    if hits.is_empty() {
        return;
    }

    let now = world.clock_ms;
    let damage = world.config.player.damage_per_hit;
    let iframes = world.config.player.hit_invincibility_ms;
    let mut events = Vec::new();

    for hit in hits {
        let Some(shot) = world.enemies[hit.enemy_index].actor.projectiles.get_mut(hit.shot_index) else {
            continue;
        };
        let Some(player) = world.players[hit.victim.index()].as_mut() else {
            continue;
        };
        if !shot.active || !player.actor.take_damage(damage) {
            continue;
        }

        shot.deactivate();
        player.actor.activate_invincible(now, iframes);
        events.push(GameEvent::player_hit(world.tick, hit.victim, player.actor.health));

        if !player.is_alive() {
            info!(slot = ?hit.victim, tick = world.tick, "player eliminated");
            events.push(GameEvent::player_eliminated(world.tick, hit.victim));
        }
    }

    for event in events {
        world.push_event(event);
    }
}

/// Player shots on enemies: one hit kills. Each enemy scores once.
fn process_player_hits(world: &mut World) {
    for hit in check_player_shots_on_enemies(world) {
        let enemy_alive = world.enemies[hit.enemy_index].is_alive();
        let Some(shooter) = world.players[hit.shooter.index()].as_mut() else {
            continue;
        };
        let Some(shot) = shooter.actor.projectiles.get_mut(hit.shot_index) else {
            continue;
        };
        if !shot.active || !enemy_alive {
            continue;
        }

        shot.deactivate();
        world.enemies[hit.enemy_index].actor.kill();
        world.award_kill(Some(hit.shooter));
        world.push_event(GameEvent::enemy_destroyed(world.tick, hit.enemy_id, Some(hit.shooter)));
    }
}

/// Drop dead enemies and spent shots. No score is awarded here.
fn purge_dead(world: &mut World) {
    world.enemies.retain(|e| e.is_alive());
    for enemy in world.enemies.iter_mut() {
        enemy.actor.purge_projectiles();
    }
    for player in world.players.iter_mut().flatten() {
        player.actor.purge_projectiles();
    }
}

/// Check if the game should end.
fn check_end_conditions(world: &mut World, result: &mut TickResult) {
    if !world.all_players_down() {
        return;
    }

    world.phase = GamePhase::GameOver;
    result.game_over = true;

    info!(
        tick = world.tick,
        score = world.wave.score,
        wave = world.wave.wave,
        "game over"
    );
    world.push_event(GameEvent::game_over(world.tick, world.wave.score, world.wave.wave));
}

/// Replay a game from recorded inputs.
///
/// Returns the final world and every event produced.
pub fn replay(
    initial: World,
    recordings: &[PlayerInputBuffer],
    tick_count: u32,
) -> (World, Vec<GameEvent>) {
    let mut world = initial;
    let mut all_events = world.take_events();

    for _ in 0..tick_count {
        let next_tick = world.tick + 1;
        let mut inputs = TickInputs::idle();
        for recording in recordings {
            *inputs.get_mut(recording.slot) = recording.get_input_at(next_tick);
        }

        let result = tick(&mut world, &inputs);
        all_events.extend(result.events);

        if result.game_over {
            break;
        }
    }

    (world, all_events)
}
