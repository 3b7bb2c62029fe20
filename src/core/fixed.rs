//! Q16.16 Fixed-Point Arithmetic
//!
//! Tank positions are tracked with sub-unit precision so that fractional
//! speeds (the player's 3.0 units/tick is exact, but tuned configs may not
//! be) accumulate without drift. Hit-boxes are always derived by flooring
//! to whole arena units.
//!
//! ## Format: Q16.16
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  [S][IIIIIIIIIIIIIIII][FFFFFFFFFFFFFFFF]                    │
//! │   │  └──── 16 bits ────┘└──── 16 bits ────┘                 │
//! │   └─ Sign bit                                               │
//! │                                                             │
//! │  Range: -32768.0 to +32767.99998 (approx)                   │
//! │  The 800x800 arena uses well under 2% of the range.         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

/// Q16.16 fixed-point number stored as i32.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE;

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1;

// =============================================================================
// ARENA GEOMETRY (whole units)
// =============================================================================

/// Arena width in units.
pub const ARENA_WIDTH: i32 = 800;

/// Arena height in units.
pub const ARENA_HEIGHT: i32 = 800;

/// Size of one grid cell. Tanks, obstacles and power-ups are one cell.
pub const GRID_SIZE: i32 = 40;

/// Grid columns (20)
pub const MAP_COLS: i32 = ARENA_WIDTH / GRID_SIZE;

/// Grid rows (20)
pub const MAP_ROWS: i32 = ARENA_HEIGHT / GRID_SIZE;

/// Projectile hit-box edge length.
pub const PROJECTILE_SIZE: i32 = 10;

// =============================================================================
// CORE OPERATIONS
// =============================================================================

/// Convert a float to fixed-point.
///
/// Only used when loading configuration, never inside the tick loop.
///
/// # Example
/// ```
/// use tank_arena::core::fixed::{to_fixed, FIXED_ONE};
/// const MY_VALUE: i32 = to_fixed(2.5);
/// assert_eq!(MY_VALUE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Whole units to fixed-point.
#[inline]
pub const fn from_int(i: i32) -> Fixed {
    i << FIXED_SCALE
}

/// Floor a fixed-point value to whole units.
///
/// Arithmetic shift rounds toward negative infinity, which matches the
/// rect derivation for every position the arena clamp allows.
#[inline]
pub const fn to_int(f: Fixed) -> i32 {
    f >> FIXED_SCALE
}

/// Convert fixed-point to float for display.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

/// Clamp a fixed-point number to a range.
#[inline]
pub fn fixed_clamp(value: Fixed, min: Fixed, max: Fixed) -> Fixed {
    value.max(min).min(max)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_constants() {
        assert_eq!(FIXED_ONE, 65536);
        assert_eq!(FIXED_HALF, 32768);
        assert_eq!(MAP_COLS, 20);
        assert_eq!(MAP_ROWS, 20);
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(1.0), FIXED_ONE);
        assert_eq!(to_fixed(0.5), FIXED_HALF);
        assert_eq!(to_fixed(3.0), from_int(3));
        assert_eq!(to_fixed(-1.0), -FIXED_ONE);
    }

    #[test]
    fn test_to_int_floors() {
        assert_eq!(to_int(from_int(720)), 720);
        assert_eq!(to_int(from_int(40) + FIXED_HALF), 40);
        assert_eq!(to_int(-FIXED_HALF), -1);
    }

    #[test]
    fn test_fixed_clamp() {
        assert_eq!(fixed_clamp(from_int(900), 0, from_int(760)), from_int(760));
        assert_eq!(fixed_clamp(from_int(-3), 0, from_int(760)), 0);
        assert_eq!(fixed_clamp(from_int(400), 0, from_int(760)), from_int(400));
    }

    #[test]
    fn test_arena_fits_range() {
        // Largest coordinate must not overflow Q16.16
        assert!((ARENA_WIDTH as i64) << FIXED_SCALE < i32::MAX as i64);
    }
}
