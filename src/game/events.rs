//! Game Events
//!
//! Everything observable that happens during a tick, in the order it
//! happened. The presentation layer maps events to sounds and effects;
//! replays compare them.

use serde::{Serialize, Deserialize};

use crate::core::rect::Rect;
use crate::game::actor::{EnemyId, PlayerSlot};
use crate::game::powerup::PowerUpKind;
use crate::game::projectile::Shooter;

/// Priority for event ordering within a tick.
///
/// Lower value = earlier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Shots, hits and deaths
    Combat = 0,
    /// Power-up lifecycle
    Pickup = 1,
    /// Wave progression
    Wave = 2,
    /// Lowest priority
    Other = 255,
}

/// Fire-and-forget sound triggers for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// Any tank fired
    Shot,
    /// A hit, a kill or an elimination
    Explosion,
    /// A power-up was picked up
    PowerUp,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A tank fired
    ShotFired {
        /// Tank that fired
        shooter: Shooter,
    },

    /// An enemy shot landed on a player
    PlayerHit {
        /// Player that was hit
        slot: PlayerSlot,
        /// Health left after the hit
        health: i32,
    },

    /// Enemy destroyed by a player shot (`by`) or a bomb
    EnemyDestroyed {
        /// Destroyed enemy
        enemy: EnemyId,
        /// Player credited with the kill
        by: Option<PlayerSlot>,
    },

    /// Player health reached zero
    PlayerEliminated {
        /// Eliminated player
        slot: PlayerSlot,
    },

    /// A power-up appeared in the arena
    PowerUpSpawned {
        /// Rolled type
        kind: PowerUpKind,
        /// Pickup hit-box
        position: Rect,
    },

    /// Power-up timed out unclaimed
    PowerUpExpired {
        /// Type that went unclaimed
        kind: PowerUpKind,
    },

    /// A player drove over the power-up
    PowerUpCollected {
        /// Collecting player
        slot: PlayerSlot,
        /// Applied type
        kind: PowerUpKind,
    },

    /// All enemies of a wave are gone
    WaveCleared {
        /// Wave that was cleared
        wave: u32,
        /// Score bonus awarded
        bonus: u32,
    },

    /// A new wave spawned `enemies` tanks
    WaveStarted {
        /// New wave number
        wave: u32,
        /// Enemies actually placed
        enemies: u32,
    },

    /// Terminal condition reached
    GameOver {
        /// Final score
        score: u32,
        /// Wave reached
        wave: u32,
    },
}

/// A game event with timing and priority.
///
/// Equality covers the whole event. Use [`GameEvent::sort_key`] to order
/// events within a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Ordering priority
    pub priority: EventPriority,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, priority: EventPriority, data: GameEventData) -> Self {
        Self { tick, priority, data }
    }

    /// A tank fired.
    pub fn shot_fired(tick: u32, shooter: Shooter) -> Self {
        Self::new(tick, EventPriority::Combat, GameEventData::ShotFired { shooter })
    }

    /// An enemy shot landed on a player.
    pub fn player_hit(tick: u32, slot: PlayerSlot, health: i32) -> Self {
        Self::new(tick, EventPriority::Combat, GameEventData::PlayerHit { slot, health })
    }

    /// An enemy was destroyed.
    pub fn enemy_destroyed(tick: u32, enemy: EnemyId, by: Option<PlayerSlot>) -> Self {
        Self::new(tick, EventPriority::Combat, GameEventData::EnemyDestroyed { enemy, by })
    }

    /// A player's health reached zero.
    pub fn player_eliminated(tick: u32, slot: PlayerSlot) -> Self {
        Self::new(tick, EventPriority::Combat, GameEventData::PlayerEliminated { slot })
    }

    /// A power-up spawned.
    pub fn power_up_spawned(tick: u32, kind: PowerUpKind, position: Rect) -> Self {
        Self::new(tick, EventPriority::Pickup, GameEventData::PowerUpSpawned { kind, position })
    }

    /// A power-up timed out.
    pub fn power_up_expired(tick: u32, kind: PowerUpKind) -> Self {
        Self::new(tick, EventPriority::Pickup, GameEventData::PowerUpExpired { kind })
    }

    /// A power-up was collected.
    pub fn power_up_collected(tick: u32, slot: PlayerSlot, kind: PowerUpKind) -> Self {
        Self::new(tick, EventPriority::Pickup, GameEventData::PowerUpCollected { slot, kind })
    }

    /// A wave was cleared.
    pub fn wave_cleared(tick: u32, wave: u32, bonus: u32) -> Self {
        Self::new(tick, EventPriority::Wave, GameEventData::WaveCleared { wave, bonus })
    }

    /// A wave started.
    pub fn wave_started(tick: u32, wave: u32, enemies: u32) -> Self {
        Self::new(tick, EventPriority::Wave, GameEventData::WaveStarted { wave, enemies })
    }

    /// The game ended.
    pub fn game_over(tick: u32, score: u32, wave: u32) -> Self {
        Self::new(tick, EventPriority::Other, GameEventData::GameOver { score, wave })
    }

    /// Ordering key: tick, then priority. Stable sorts keep emission
    /// order inside a class.
    pub fn sort_key(&self) -> (u32, EventPriority) {
        (self.tick, self.priority)
    }

    /// Sound to play for this event, if any.
    ///
    /// Expiry and wave changes are silent.
    pub fn audio_cue(&self) -> Option<AudioCue> {
        match self.data {
            GameEventData::ShotFired { .. } => Some(AudioCue::Shot),
            GameEventData::PlayerHit { .. }
            | GameEventData::EnemyDestroyed { .. }
            | GameEventData::PlayerEliminated { .. } => Some(AudioCue::Explosion),
            GameEventData::PowerUpCollected { .. } => Some(AudioCue::PowerUp),
            GameEventData::PowerUpSpawned { .. }
            | GameEventData::PowerUpExpired { .. }
            | GameEventData::WaveCleared { .. }
            | GameEventData::WaveStarted { .. }
            | GameEventData::GameOver { .. } => None,
        }
    }
}
