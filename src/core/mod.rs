//! Core deterministic primitives.
//!
//! Fixed-point math, geometry, headings, seeded randomness and state
//! hashing. Nothing in here knows about tanks.

pub mod fixed;
pub mod vec2;
pub mod rect;
pub mod heading;
pub mod rng;
pub mod hash;

// Re-export core types
pub use fixed::{Fixed, FIXED_ONE, FIXED_SCALE, GRID_SIZE};
pub use vec2::FixedVec2;
pub use rect::Rect;
pub use heading::Heading;
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash};
