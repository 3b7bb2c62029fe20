//! Projectiles
//!
//! Straight-line shots. A projectile only knows about the obstacle field;
//! hits on tanks are resolved by the tick.

use serde::{Serialize, Deserialize};

use crate::core::fixed::PROJECTILE_SIZE;
use crate::core::heading::Heading;
use crate::core::rect::Rect;
use crate::game::actor::{EnemyId, PlayerSlot};
use crate::game::map::ObstacleField;

/// Who fired a projectile. Used for hit filtering and score attribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shooter {
    /// Fired by a player; can only hit enemies
    Player(PlayerSlot),
    /// Fired by an enemy; can only hit players
    Enemy(EnemyId),
}

impl Shooter {
    /// Hash tag: 0/1 for players, 2 + id for enemies.
    pub fn tag(self) -> u32 {
        match self {
            Shooter::Player(slot) => slot.index() as u32,
            Shooter::Enemy(id) => 2 + id,
        }
    }
}

/// A shot travelling in a straight line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    /// Hit-box (10x10)
    pub rect: Rect,
    /// Travel direction, fixed at launch
    pub heading: Heading,
    /// Units per tick
    pub speed: i32,
    /// Cleared on leaving the arena, hitting an obstacle or landing a hit
    pub active: bool,
    /// Who fired it
    pub owner: Shooter,
}

impl Projectile {
    /// Create an active projectile with its top-left at `(x, y)`.
    pub fn spawn(x: i32, y: i32, heading: Heading, owner: Shooter, speed: i32) -> Self {
        Self {
            rect: Rect::new(x, y, PROJECTILE_SIZE, PROJECTILE_SIZE),
            heading,
            speed,
            active: true,
            owner,
        }
    }

    /// Projectile centered on a shooter's hit-box.
    pub fn from_muzzle(shooter: &Rect, heading: Heading, owner: Shooter, speed: i32) -> Self {
        let (cx, cy) = shooter.center();
        let half = PROJECTILE_SIZE / 2;
        Self::spawn(cx - half, cy - half, heading, owner, speed)
    }

    /// Move one step. Returns whether the projectile is still active.
    ///
    /// Deactivates on the first obstacle overlap, or once the top-left
    /// corner leaves the arena.
    pub fn advance(&mut self, obstacles: &ObstacleField) -> bool {
        if !self.active {
            return false;
        }

        let (dx, dy) = self.heading.step(self.speed);
        self.rect = self.rect.translated(dx, dy);

        if obstacles.blocks(&self.rect) || !self.in_arena() {
            self.active = false;
        }

        self.active
    }

    /// Mark as spent. Never reversed.
    #[inline]
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    #[inline]
    fn in_arena(&self) -> bool {
        let arena = Rect::ARENA;
        self.rect.x >= arena.x
            && self.rect.x <= arena.right()
            && self.rect.y >= arena.y
            && self.rect.y <= arena.bottom()
    }
}
