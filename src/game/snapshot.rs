//! Read-only view of the world for presentation layers.
//!
//! Built after each tick. Holds plain data only, no references into the
//! simulation.

use serde::Serialize;

use crate::core::heading::Heading;
use crate::core::rect::Rect;
use crate::game::actor::{Actor, EnemyId, PlayerSlot};
use crate::game::map::Obstacle;
use crate::game::powerup::PowerUpKind;
use crate::game::projectile::Projectile;
use crate::game::state::World;

/// One shot in flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectileView {
    /// Shot hit-box
    pub rect: Rect,
    /// Travel direction
    pub heading: Heading,
    /// False once the shot has hit something this tick
    pub active: bool,
}

impl From<&Projectile> for ProjectileView {
    fn from(shot: &Projectile) -> Self {
        Self { rect: shot.rect, heading: shot.heading, active: shot.active }
    }
}

/// Drawable state of one tank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActorView {
    /// Tank hit-box
    pub rect: Rect,
    /// Facing
    pub heading: Heading,
    /// Whether the tank is still in play
    pub alive: bool,
    /// Current health
    pub health: i32,
    /// Invincibility active (draw the shield)
    pub invincible: bool,
    /// Frozen by a power-up
    pub frozen: bool,
    /// The tank's own shots
    pub projectiles: Vec<ProjectileView>,
}

impl From<&Actor> for ActorView {
    fn from(actor: &Actor) -> Self {
        Self {
            rect: actor.rect(),
            heading: actor.heading,
            alive: actor.alive,
            health: actor.health,
            invincible: actor.is_invincible(),
            frozen: actor.is_frozen(),
            projectiles: actor.projectiles.iter().map(ProjectileView::from).collect(),
        }
    }
}

/// A player tank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    /// Seat
    pub slot: PlayerSlot,
    /// Enemies credited to this player
    pub kills: u32,
    /// Shared tank state
    #[serde(flatten)]
    pub tank: ActorView,
}

/// An enemy tank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnemyView {
    /// Stable enemy id
    pub id: EnemyId,
    /// Shared tank state
    #[serde(flatten)]
    pub tank: ActorView,
}

/// The power-up slot. Draw only while `active`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PowerUpView {
    /// Whether a power-up is on the field
    pub active: bool,
    /// Pickup hit-box (stale while inactive)
    pub rect: Rect,
    /// Current or last rolled type
    pub kind: PowerUpKind,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Last completed tick
    pub tick: u32,
    /// Simulation clock (ms)
    pub clock_ms: u64,
    /// Players present in this mode, slot order
    pub players: Vec<PlayerView>,
    /// Enemies still in the world
    pub enemies: Vec<EnemyView>,
    /// Power-up slot
    pub power_up: PowerUpView,
    /// Static obstacles, layout order
    pub obstacles: Vec<Obstacle>,
    /// Shared score
    pub score: u32,
    /// Current wave
    pub wave: u32,
    /// Terminal condition reached
    pub game_over: bool,
}

impl Snapshot {
    /// Copy the drawable state out of `world`.
    pub fn capture(world: &World) -> Self {
        let players = world
            .players
            .iter()
            .flatten()
            .map(|p| PlayerView { slot: p.slot, kills: p.kills, tank: ActorView::from(&p.actor) })
            .collect();

        let enemies = world
            .enemies
            .iter()
            .map(|e| EnemyView { id: e.id, tank: ActorView::from(&e.actor) })
            .collect();

        Self {
            tick: world.tick,
            clock_ms: world.clock_ms,
            players,
            enemies,
            power_up: PowerUpView {
                active: world.power_up.active,
                rect: world.power_up.rect,
                kind: world.power_up.kind,
            },
            obstacles: world.obstacles.all().to_vec(),
            score: world.score(),
            wave: world.wave_number(),
            game_over: world.is_game_over(),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
