//! # Tank Arena
//!
//! Deterministic simulation core for a top-down tank arena game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        TANK ARENA                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - 2D vector with fixed-point                │
//! │  ├── rect.rs     - Integer AABB hit-boxes                    │
//! │  ├── heading.rs  - Four-way facing                           │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── input.rs    - Input frames and recording                │
//! │  ├── map.rs      - Obstacle field                            │
//! │  ├── actor.rs    - Tank movement and status                  │
//! │  ├── ai.rs       - Enemy behavior                            │
//! │  ├── powerup.rs  - Power-up lifecycle                        │
//! │  ├── wave.rs     - Waves and scoring                         │
//! │  ├── state.rs    - The World                                 │
//! │  ├── tick.rs     - Authoritative simulation step             │
//! │  └── snapshot.rs - Read-only output for rendering            │
//! │                                                              │
//! │  config.rs       - Layered configuration                     │
//! │  runtime.rs      - Fixed-rate runner (wall clock)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - Positions are fixed-point; hit-boxes are whole units
//! - Timed effects use the simulation clock, not the wall clock
//! - All randomness from one seeded Xorshift128+ owned by the World
//!
//! Given identical inputs and RNG seed, the simulation produces
//! **identical results** on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod config;
pub mod runtime;

// Re-export commonly used types
pub use core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use core::vec2::FixedVec2;
pub use core::rect::Rect;
pub use core::heading::Heading;
pub use core::rng::DeterministicRng;
pub use config::{ConfigError, GameConfig};
pub use game::input::{InputFrame, InputDelta, PlayerInputBuffer, TickInputs};
pub use game::state::{GameMode, World};
pub use game::snapshot::Snapshot;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
