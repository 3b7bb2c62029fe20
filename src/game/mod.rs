//! Game Logic Module
//!
//! All arena simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `input`: Input frames, held directions, recording
//! - `map`: Fixed obstacle layout
//! - `projectile`: Shots and their flight
//! - `actor`: Tank movement, health and status timers
//! - `ai`: Enemy wander/seek behavior
//! - `collision`: Projectile hit detection
//! - `powerup`: Power-up spawning and collection
//! - `wave`: Enemy waves and scoring
//! - `state`: The `World` and game lifecycle
//! - `tick`: Authoritative simulation step and replay
//! - `events`: Game events for presentation and verification
//! - `snapshot`: Read-only per-tick output

pub mod input;
pub mod map;
pub mod projectile;
pub mod actor;
pub mod ai;
pub mod collision;
pub mod powerup;
pub mod wave;
pub mod state;
pub mod tick;
pub mod events;
pub mod snapshot;

// Re-export key types
pub use input::{InputFrame, InputDelta, PlayerInputBuffer, TickInputs};
pub use actor::{EnemyId, PlayerSlot};
pub use state::{World, GameMode, GamePhase};
pub use tick::{tick, replay, TickResult};
pub use events::{AudioCue, GameEvent, GameEventData};
pub use snapshot::Snapshot;
