//! Tanks
//!
//! Player and enemy tanks share one `Actor` core: position, facing,
//! health, timed status effects and their own in-flight projectiles.
//! The two variants differ only in what drives them (held input or the
//! AI director).

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, ARENA_WIDTH, ARENA_HEIGHT, GRID_SIZE, fixed_clamp, from_int};
use crate::core::hash::StateHasher;
use crate::core::heading::Heading;
use crate::core::rect::Rect;
use crate::core::vec2::FixedVec2;
use crate::game::ai::EnemyAi;
use crate::game::input::{HeldDirections, InputFrame};
use crate::game::map::ObstacleField;
use crate::game::projectile::{Projectile, Shooter};

/// Stable enemy handle, unique within a game.
pub type EnemyId = u32;

/// Player seat. Player one always exists; player two only in two-player mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    /// Spawns bottom-left; wins simultaneous pickups
    One,
    /// Spawns bottom-right; two-player mode only
    Two,
}

impl PlayerSlot {
    /// Both slots in priority order.
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    /// Array index for per-slot storage.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    /// The opposite seat.
    #[inline]
    pub const fn other(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

// =============================================================================
// SHARED ACTOR CORE
// =============================================================================

/// Largest top-left coordinate whose floored hit-box still fits the arena.
const MAX_X: Fixed = from_int(ARENA_WIDTH - GRID_SIZE + 1) - 1;
const MAX_Y: Fixed = from_int(ARENA_HEIGHT - GRID_SIZE + 1) - 1;

/// State shared by every tank.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner (Q16.16)
    pub position: FixedVec2,
    /// Facing; also the direction of the next shot
    pub heading: Heading,
    /// False once health hits 0 or the tank is destroyed
    pub alive: bool,
    /// Current health, never below 0
    pub health: i32,
    /// Heal cap
    pub max_health: i32,
    /// Invincibility expiry (sim ms). `Some` while invincible.
    pub invincible_until: Option<u64>,
    /// Freeze expiry (sim ms). Only ever set on enemies.
    pub frozen_until: Option<u64>,
    /// This actor's own shots still in flight
    pub projectiles: Vec<Projectile>,
}

impl Actor {
    /// Live tank at full health with no effects.
    pub fn new(position: FixedVec2, heading: Heading, max_health: i32) -> Self {
        Self {
            position,
            heading,
            alive: true,
            health: max_health,
            max_health,
            invincible_until: None,
            frozen_until: None,
            projectiles: Vec::new(),
        }
    }

    /// Hit-box: one grid cell at the floored position.
    #[inline]
    pub fn rect(&self) -> Rect {
        let (x, y) = self.position.to_ints();
        Rect::new(x, y, GRID_SIZE, GRID_SIZE)
    }

    /// Hit-box after moving by `delta`.
    #[inline]
    pub fn tentative_rect(&self, delta: FixedVec2) -> Rect {
        let (x, y) = self.position.add(delta).to_ints();
        Rect::new(x, y, GRID_SIZE, GRID_SIZE)
    }

    /// Whether damage is currently ignored.
    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    /// Whether the tank is held in place.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen_until.is_some()
    }

    /// Apply one hit. Returns whether health changed.
    ///
    /// Invincible or dead actors ignore damage. Health bottoms out at 0,
    /// which is also when `alive` flips.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive || self.is_invincible() {
            return false;
        }
        self.health = (self.health - amount).max(0);
        if self.health == 0 {
            self.alive = false;
        }
        true
    }

    /// Restore health, capped at max. Dead actors stay dead.
    pub fn heal(&mut self, amount: i32) {
        if self.alive && self.health < self.max_health {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    /// Immediate death (enemy one-hit kills and bombs).
    pub fn kill(&mut self) {
        self.alive = false;
        self.health = 0;
    }

    /// Grant invincibility until `now + duration_ms`.
    ///
    /// Does nothing while already invincible; the running window is not
    /// extended.
    pub fn activate_invincible(&mut self, now: u64, duration_ms: u64) -> bool {
        if self.is_invincible() {
            return false;
        }
        self.invincible_until = Some(now + duration_ms);
        true
    }

    /// Freeze until `now + duration_ms`. A second freeze restarts the timer.
    pub fn freeze(&mut self, now: u64, duration_ms: u64) {
        self.frozen_until = Some(now + duration_ms);
    }

    /// Clear effects whose expiry `now` has passed.
    pub fn update_status(&mut self, now: u64) {
        if self.invincible_until.is_some_and(|t| now > t) {
            self.invincible_until = None;
        }
        if self.frozen_until.is_some_and(|t| now > t) {
            self.frozen_until = None;
        }
    }

    /// Attempt a whole move. Returns whether it was applied.
    ///
    /// The move is rejected outright (both axes) if the tentative hit-box
    /// overlaps an obstacle or `other`. The position is clamped into the
    /// arena afterwards in either case.
    pub fn try_move(&mut self, delta: FixedVec2, obstacles: &ObstacleField, other: Option<&Rect>) -> bool {
        let next = self.tentative_rect(delta);
        let blocked = obstacles.blocks(&next) || other.is_some_and(|r| r.intersects(&next));

        if !blocked {
            self.position = self.position.add(delta);
        }
        self.clamp_to_arena();

        !blocked
    }

    fn clamp_to_arena(&mut self) {
        self.position.x = fixed_clamp(self.position.x, 0, MAX_X);
        self.position.y = fixed_clamp(self.position.y, 0, MAX_Y);
    }

    /// Fire from the hit-box center in the current heading.
    pub fn fire(&mut self, owner: Shooter, speed: i32) -> Projectile {
        let shot = Projectile::from_muzzle(&self.rect(), self.heading, owner, speed);
        self.projectiles.push(shot);
        shot
    }

    /// Advance every shot and drop the ones that died doing so.
    pub fn advance_projectiles(&mut self, obstacles: &ObstacleField) {
        for shot in &mut self.projectiles {
            shot.advance(obstacles);
        }
        self.purge_projectiles();
    }

    /// Drop inactive shots.
    pub fn purge_projectiles(&mut self) {
        self.projectiles.retain(|p| p.active);
    }

    /// Feed this tank and its shots into the state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_vec2(self.position);
        hasher.update_u8(self.heading as u8);
        hasher.update_bool(self.alive);
        hasher.update_i32(self.health);
        hasher.update_opt_u64(self.invincible_until);
        hasher.update_opt_u64(self.frozen_until);
        hasher.update_u32(self.projectiles.len() as u32);
        for shot in &self.projectiles {
            hasher.update_rect(shot.rect);
            hasher.update_u8(shot.heading as u8);
            hasher.update_bool(shot.active);
            hasher.update_u32(shot.owner.tag());
        }
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// A human-controlled tank.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerActor {
    /// Seat
    pub slot: PlayerSlot,
    /// Tank core
    pub actor: Actor,
    /// Directions held as of the latest input
    pub held: HeldDirections,
    /// Enemies destroyed by this player's shots or bombs
    pub kills: u32,
}

impl PlayerActor {
    /// Player facing up at `position`.
    pub fn new(slot: PlayerSlot, position: FixedVec2, max_health: i32) -> Self {
        Self {
            slot,
            actor: Actor::new(position, Heading::Up, max_health),
            held: HeldDirections::default(),
            kills: 0,
        }
    }

    /// Hit-box.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.actor.rect()
    }

    /// Whether the player is still in play.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.actor.alive
    }

    /// Take this tick's input. Fires immediately on the fire edge.
    ///
    /// Dead players ignore input entirely.
    pub fn apply_input(&mut self, frame: InputFrame, projectile_speed: i32) -> Option<Projectile> {
        if !self.actor.alive {
            return None;
        }
        self.held = frame.held();
        frame
            .fire_pressed()
            .then(|| self.actor.fire(Shooter::Player(self.slot), projectile_speed))
    }

    /// Movement intent from held directions, updating facing.
    pub fn movement_intent(&mut self, speed: Fixed) -> FixedVec2 {
        let (delta, facing) = self.held.movement(speed);
        if let Some(heading) = facing {
            self.actor.heading = heading;
        }
        delta
    }

    /// Per-tick movement and status update.
    pub fn update(&mut self, obstacles: &ObstacleField, other: Option<&Rect>, speed: Fixed, now: u64) {
        if !self.actor.alive {
            return;
        }
        let delta = self.movement_intent(speed);
        self.actor.try_move(delta, obstacles, other);
        self.actor.update_status(now);
    }
}

// =============================================================================
// ENEMY
// =============================================================================

/// An AI-controlled tank.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemyActor {
    /// Stable id
    pub id: EnemyId,
    /// Tank core
    pub actor: Actor,
    /// Director state
    pub ai: EnemyAi,
}

impl EnemyActor {
    /// Enemies have no health model; a single hit kills.
    pub const HEALTH: i32 = 1;

    /// Enemy occupying `cell`.
    pub fn new(id: EnemyId, cell: Rect, heading: Heading, ai: EnemyAi) -> Self {
        Self {
            id,
            actor: Actor::new(FixedVec2::from_ints(cell.x, cell.y), heading, Self::HEALTH),
            ai,
        }
    }

    /// Hit-box.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.actor.rect()
    }

    /// Not yet destroyed this tick.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.actor.alive
    }

    /// Owner tag for this enemy's shots.
    #[inline]
    pub fn shooter(&self) -> Shooter {
        Shooter::Enemy(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::to_fixed;
    use crate::game::map::Obstacle;
    use proptest::prelude::*;

    fn open_field() -> ObstacleField {
        ObstacleField::from_obstacles(Vec::new())
    }

    #[test]
    fn test_damage_and_death() {
        let mut actor = Actor::new(FixedVec2::from_ints(100, 100), Heading::Up, 300);
        assert!(actor.take_damage(100));
        assert_eq!(actor.health, 200);
        actor.take_damage(100);
        actor.take_damage(100);
        assert_eq!(actor.health, 0);
        assert!(!actor.alive);
        // Dead actors take no further damage
        assert!(!actor.take_damage(100));
        assert_eq!(actor.health, 0);
    }

    #[test]
    fn test_invincibility_blocks_damage() {
        let mut actor = Actor::new(FixedVec2::ZERO, Heading::Up, 1000);
        assert!(actor.activate_invincible(0, 1000));
        assert!(!actor.take_damage(100));
        assert_eq!(actor.health, 1000);
    }

    #[test]
    fn test_invincibility_does_not_refresh() {
        let mut actor = Actor::new(FixedVec2::ZERO, Heading::Up, 1000);
        actor.activate_invincible(0, 1000);
        assert!(!actor.activate_invincible(500, 5000));
        assert_eq!(actor.invincible_until, Some(1000));

        // Cleared only once now exceeds the expiry
        actor.update_status(1000);
        assert!(actor.is_invincible());
        actor.update_status(1001);
        assert!(!actor.is_invincible());
    }

    #[test]
    fn test_freeze_refreshes() {
        let mut actor = Actor::new(FixedVec2::ZERO, Heading::Up, 1);
        actor.freeze(0, 5000);
        actor.freeze(3000, 5000);
        assert_eq!(actor.frozen_until, Some(8000));
        actor.update_status(8001);
        assert!(!actor.is_frozen());
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut actor = Actor::new(FixedVec2::ZERO, Heading::Up, 1000);
        actor.take_damage(100);
        actor.heal(200);
        assert_eq!(actor.health, 1000);
        actor.take_damage(100);
        actor.take_damage(100);
        actor.take_damage(100);
        actor.heal(200);
        assert_eq!(actor.health, 900);
    }

    #[test]
    fn test_move_rejected_by_obstacle() {
        let field = ObstacleField::new();
        let mut actor = Actor::new(FixedVec2::from_ints(40, 720), Heading::Left, 1000);
        // One step left overlaps the stone border
        assert!(!actor.try_move(FixedVec2::from_ints(-3, 0), &field, None));
        assert_eq!(actor.position, FixedVec2::from_ints(40, 720));
    }

    #[test]
    fn test_move_rejected_whole_not_sliding() {
        let field = ObstacleField::new();
        let mut actor = Actor::new(FixedVec2::from_ints(40, 400), Heading::Up, 1000);
        // Diagonal: the y part alone would be free
        assert!(!actor.try_move(FixedVec2::from_ints(-3, -3), &field, None));
        assert_eq!(actor.position, FixedVec2::from_ints(40, 400));
    }

    #[test]
    fn test_move_rejected_by_other_player() {
        let other = Rect::new(82, 400, 40, 40);
        let mut actor = Actor::new(FixedVec2::from_ints(40, 400), Heading::Right, 1000);
        assert!(!actor.try_move(FixedVec2::from_ints(3, 0), &open_field(), Some(&other)));
        assert!(actor.try_move(FixedVec2::from_ints(2, 0), &open_field(), Some(&other)));
        assert_eq!(actor.rect().x, 42);
    }

    #[test]
    fn test_move_clamped_to_arena() {
        let mut actor = Actor::new(FixedVec2::from_ints(1, 758), Heading::Left, 1000);
        assert!(actor.try_move(FixedVec2::from_ints(-3, 3), &open_field(), None));
        assert_eq!(actor.rect(), Rect::new(0, 760, 40, 40));
    }

    #[test]
    fn test_fractional_positions_floor() {
        let mut actor = Actor::new(FixedVec2::from_ints(100, 100), Heading::Right, 1000);
        actor.try_move(FixedVec2::new(to_fixed(1.5), 0), &open_field(), None);
        assert_eq!(actor.rect().x, 101);
        actor.try_move(FixedVec2::new(to_fixed(1.5), 0), &open_field(), None);
        assert_eq!(actor.rect().x, 103);
    }

    #[test]
    fn test_fire_and_purge() {
        let mut actor = Actor::new(FixedVec2::from_ints(100, 100), Heading::Down, 1000);
        let shot = actor.fire(Shooter::Player(PlayerSlot::One), 5);
        assert_eq!(shot.rect, Rect::new(115, 115, 10, 10));
        assert_eq!(actor.projectiles.len(), 1);

        actor.projectiles[0].deactivate();
        actor.purge_projectiles();
        assert!(actor.projectiles.is_empty());
    }

    #[test]
    fn test_player_input_fire_and_facing() {
        let mut player = PlayerActor::new(PlayerSlot::One, FixedVec2::from_ints(400, 400), 1000);
        let frame = InputFrame::holding(Heading::Up)
            .with_held(Heading::Left)
            .with_fire();

        let shot = player.apply_input(frame, 5);
        // Shot leaves with the heading from before this tick's movement
        assert_eq!(shot.map(|s| s.heading), Some(Heading::Up));

        player.update(&open_field(), None, to_fixed(3.0), 0);
        assert_eq!(player.actor.heading, Heading::Left);
        assert_eq!(player.rect(), Rect::new(397, 397, 40, 40));
    }

    #[test]
    fn test_dead_player_ignores_input() {
        let mut player = PlayerActor::new(PlayerSlot::Two, FixedVec2::from_ints(400, 400), 1000);
        player.actor.kill();
        assert!(player.apply_input(InputFrame::fire(), 5).is_none());
        assert!(player.actor.projectiles.is_empty());
    }

    proptest! {
        #[test]
        fn prop_blocked_move_leaves_position(
            ox in 0i32..760,
            oy in 0i32..760,
            px in 0i32..760,
            py in 0i32..760,
            dx in -5i32..=5,
            dy in -5i32..=5,
        ) {
            let obstacle = Rect::new(ox, oy, 40, 40);
            let field = ObstacleField::from_obstacles(vec![Obstacle { rect: obstacle, breakable: false }]);
            let mut actor = Actor::new(FixedVec2::from_ints(px, py), Heading::Up, 1000);
            let delta = FixedVec2::from_ints(dx, dy);
            let tentative = actor.tentative_rect(delta);

            let moved = actor.try_move(delta, &field, None);
            if tentative.intersects(&obstacle) {
                prop_assert!(!moved);
                prop_assert_eq!(actor.position, FixedVec2::from_ints(px, py));
            }
            prop_assert!(Rect::ARENA.contains_rect(&actor.rect()));
        }

        #[test]
        fn prop_health_stays_in_bounds(ops in prop::collection::vec(0u8..3, 0..60)) {
            let mut actor = Actor::new(FixedVec2::ZERO, Heading::Up, 1000);
            let mut now = 0u64;
            for op in ops {
                let before = actor.health;
                match op {
                    0 => {
                        actor.take_damage(100);
                        prop_assert!(actor.health <= before);
                    }
                    1 => actor.heal(200),
                    _ => {
                        actor.activate_invincible(now, 1000);
                        now += 400;
                        actor.update_status(now);
                    }
                }
                prop_assert!(actor.health >= 0 && actor.health <= 1000);
                prop_assert_eq!(actor.alive, actor.health > 0);
            }
        }
    }
}
