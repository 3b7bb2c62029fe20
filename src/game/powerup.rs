//! Power-Up Spawning and Collection
//!
//! One global slot. Lifecycle: inactive, then active after a spawn, then
//! back to inactive when collected or when it times out.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::config::{PowerUpConfig, PowerUpWeights};
use crate::core::fixed::GRID_SIZE;
use crate::core::rect::Rect;
use crate::core::rng::DeterministicRng;
use crate::game::actor::{PlayerActor, PlayerSlot};
use crate::game::events::GameEvent;
use crate::game::map::ObstacleField;
use crate::game::state::World;
use crate::game::wave::advance_wave_if_cleared;

/// Power-up effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PowerUpKind {
    /// Restore health
    Health = 0,
    /// Freeze every live enemy
    Freeze = 1,
    /// Temporary invincibility for the collector
    Invincible = 2,
    /// Destroy every live enemy
    Bomb = 3,
}

/// The single power-up slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpSlot {
    /// Pickup hit-box, one interior grid cell
    pub rect: Rect,
    /// Rolled type of the current (or last) power-up
    pub kind: PowerUpKind,
    /// On the field and collectable
    pub active: bool,
    /// When the current (or last) power-up appeared (sim ms)
    pub spawned_at: u64,
    /// Last successful spawn, or game start (sim ms)
    pub last_spawn_at: u64,
}

impl PowerUpSlot {
    /// Inactive slot whose spawn interval starts counting at `now`.
    pub fn new(now: u64) -> Self {
        Self {
            rect: Rect::new(0, 0, GRID_SIZE, GRID_SIZE),
            kind: PowerUpKind::Health,
            active: false,
            spawned_at: 0,
            last_spawn_at: now,
        }
    }

    /// Try to place a power-up. Returns whether one appeared.
    ///
    /// No-op while one is active or until strictly more than the spawn
    /// interval has passed. A cell overlapping an obstacle skips this
    /// attempt; the next tick tries again.
    pub fn try_spawn(
        &mut self,
        now: u64,
        obstacles: &ObstacleField,
        rng: &mut DeterministicRng,
        config: &PowerUpConfig,
    ) -> bool {
        if self.active || now.saturating_sub(self.last_spawn_at) <= config.spawn_interval_ms {
            return false;
        }

        let cell = ObstacleField::random_interior_cell(rng);
        if obstacles.blocks(&cell) {
            return false;
        }

        self.rect = cell;
        self.kind = random_power_up_kind(rng, &config.weights);
        self.active = true;
        self.spawned_at = now;
        self.last_spawn_at = now;
        true
    }

    /// Time out an unclaimed power-up. Returns whether it expired now.
    pub fn expire(&mut self, now: u64, duration_ms: u64) -> bool {
        if self.active && now.saturating_sub(self.spawned_at) > duration_ms {
            self.active = false;
            return true;
        }
        false
    }

    /// First alive player (slot order) whose hit-box overlaps the power-up.
    pub fn claimant(&self, players: &[Option<PlayerActor>; 2]) -> Option<PlayerSlot> {
        if !self.active {
            return None;
        }
        players
            .iter()
            .flatten()
            .find(|p| p.is_alive() && p.rect().intersects(&self.rect))
            .map(|p| p.slot)
    }
}

/// Weighted power-up type roll.
pub fn random_power_up_kind(rng: &mut DeterministicRng, weights: &PowerUpWeights) -> PowerUpKind {
    let table = [
        (PowerUpKind::Health, weights.health),
        (PowerUpKind::Freeze, weights.freeze),
        (PowerUpKind::Invincible, weights.invincible),
        (PowerUpKind::Bomb, weights.bomb),
    ];

    // Overflowing tables fail validation; saturate for unvalidated ones
    let mut roll = rng.next_int(weights.total().unwrap_or(u32::MAX));
    for (kind, weight) in table {
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    PowerUpKind::Bomb
}

// =============================================================================
// WORLD STEPS
// =============================================================================

/// Spawn, expire and collect, in that order.
pub fn update_power_up(world: &mut World) {
    maybe_spawn_power_up(world);
    expire_power_up(world);
    collect_power_up(world);
}

/// Place a power-up once the spawn interval has passed.
pub fn maybe_spawn_power_up(world: &mut World) {
    let now = world.clock_ms;
    let spawned = world.power_up.try_spawn(
        now,
        &world.obstacles,
        &mut world.rng,
        &world.config.power_up,
    );

    if spawned {
        let slot = &world.power_up;
        debug!(kind = ?slot.kind, x = slot.rect.x, y = slot.rect.y, "power-up spawned");
        let event = GameEvent::power_up_spawned(world.tick, slot.kind, slot.rect);
        world.push_event(event);
    }
}

/// Remove an unclaimed power-up after its lifetime.
pub fn expire_power_up(world: &mut World) {
    if world.power_up.expire(world.clock_ms, world.config.power_up.duration_ms) {
        let kind = world.power_up.kind;
        debug!(?kind, "power-up expired");
        world.push_event(GameEvent::power_up_expired(world.tick, kind));
    }
}

/// Apply the power-up to the first eligible player. At most one
/// collection per tick.
pub fn collect_power_up(world: &mut World) -> Option<PlayerSlot> {
    let slot = world.power_up.claimant(&world.players)?;
    let kind = world.power_up.kind;
    world.power_up.active = false;

    debug!(?slot, ?kind, "power-up collected");
    world.push_event(GameEvent::power_up_collected(world.tick, slot, kind));
    apply_power_up(world, slot, kind);

    Some(slot)
}

fn apply_power_up(world: &mut World, slot: PlayerSlot, kind: PowerUpKind) {
    let now = world.clock_ms;
    let config = &world.config;

    match kind {
        PowerUpKind::Health => {
            let amount = config.player.heal_amount;
            if let Some(player) = world.player_mut(slot) {
                player.actor.heal(amount);
            }
        }
        PowerUpKind::Freeze => {
            let duration = config.power_up.freeze_ms;
            for enemy in world.enemies.iter_mut().filter(|e| e.is_alive()) {
                enemy.actor.freeze(now, duration);
            }
        }
        PowerUpKind::Invincible => {
            let duration = config.power_up.invincible_ms;
            if let Some(player) = world.player_mut(slot) {
                player.actor.activate_invincible(now, duration);
            }
        }
        PowerUpKind::Bomb => detonate_bomb(world, slot),
    }
}

/// Kill every live enemy, score each, and re-check the wave right away.
fn detonate_bomb(world: &mut World, slot: PlayerSlot) {
    let mut destroyed = Vec::new();
    for enemy in world.enemies.iter_mut().filter(|e| e.is_alive()) {
        enemy.actor.kill();
        destroyed.push(enemy.id);
    }

    for id in destroyed {
        world.award_kill(Some(slot));
        world.push_event(GameEvent::enemy_destroyed(world.tick, id, Some(slot)));
    }

    world.enemies.retain(|e| e.is_alive());
    advance_wave_if_cleared(world);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::FixedVec2;

    fn fresh_slot() -> PowerUpSlot {
        PowerUpSlot::new(0)
    }

    #[test]
    fn test_spawn_waits_for_interval() {
        let field = ObstacleField::new();
        let config = PowerUpConfig::default();
        let mut rng = DeterministicRng::new(1);
        let mut slot = fresh_slot();

        assert!(!slot.try_spawn(20_000, &field, &mut rng, &config));
        assert!(!slot.active);

        // Keep trying past the interval until a free cell comes up
        let mut now = 20_001;
        while !slot.try_spawn(now, &field, &mut rng, &config) {
            now += 16;
        }
        assert!(slot.active);
        assert_eq!(slot.spawned_at, now);
        assert_eq!(slot.last_spawn_at, now);
        assert!(!field.blocks(&slot.rect));
    }

    #[test]
    fn test_second_spawn_is_noop_while_active() {
        let field = ObstacleField::from_obstacles(Vec::new());
        let config = PowerUpConfig::default();
        let mut rng = DeterministicRng::new(1);
        let mut slot = fresh_slot();

        assert!(slot.try_spawn(20_001, &field, &mut rng, &config));
        let before = slot.clone();
        let rng_before = rng.state();

        assert!(!slot.try_spawn(60_000, &field, &mut rng, &config));
        assert_eq!(slot, before);
        assert_eq!(rng.state(), rng_before);
    }

    #[test]
    fn test_expiry() {
        let field = ObstacleField::from_obstacles(Vec::new());
        let config = PowerUpConfig::default();
        let mut rng = DeterministicRng::new(1);
        let mut slot = fresh_slot();
        slot.try_spawn(20_001, &field, &mut rng, &config);

        assert!(!slot.expire(30_001, config.duration_ms));
        assert!(slot.active);
        assert!(slot.expire(30_002, config.duration_ms));
        assert!(!slot.active);
        assert!(!slot.expire(40_000, config.duration_ms));
    }

    #[test]
    fn test_weighted_kind_distribution() {
        let mut rng = DeterministicRng::new(2024);
        let weights = PowerUpWeights::default();
        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            counts[random_power_up_kind(&mut rng, &weights) as usize] += 1;
        }
        for count in &counts[..3] {
            assert!((2600..3400).contains(count), "counts: {:?}", counts);
        }
        assert!((700..1300).contains(&counts[3]), "counts: {:?}", counts);
    }

    #[test]
    fn test_single_weight_always_wins() {
        let mut rng = DeterministicRng::new(5);
        let weights = PowerUpWeights { health: 0, freeze: 0, invincible: 0, bomb: 1 };
        for _ in 0..100 {
            assert_eq!(random_power_up_kind(&mut rng, &weights), PowerUpKind::Bomb);
        }
    }

    #[test]
    fn test_claimant_priority() {
        let mut slot = fresh_slot();
        slot.active = true;
        slot.rect = Rect::new(400, 400, 40, 40);

        let one = PlayerActor::new(PlayerSlot::One, FixedVec2::from_ints(390, 400), 1000);
        let two = PlayerActor::new(PlayerSlot::Two, FixedVec2::from_ints(410, 400), 1000);
        let players = [Some(one.clone()), Some(two.clone())];
        assert_eq!(slot.claimant(&players), Some(PlayerSlot::One));

        // Dead players can't collect
        let mut dead_one = one;
        dead_one.actor.kill();
        let players = [Some(dead_one), Some(two)];
        assert_eq!(slot.claimant(&players), Some(PlayerSlot::Two));

        slot.active = false;
        assert_eq!(slot.claimant(&players), None);
    }
}
