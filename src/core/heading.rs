//! Discrete facing directions.

use serde::{Serialize, Deserialize};

/// One of the four facing directions.
///
/// Discriminants match the classic encoding (0 up, 1 left, 2 down, 3 right)
/// so that a uniform roll in `0..4` maps straight onto a heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Heading {
    /// Toward y = 0
    #[default]
    Up = 0,
    /// Toward x = 0
    Left = 1,
    /// Toward the bottom edge
    Down = 2,
    /// Toward the right edge
    Right = 3,
}

impl Heading {
    /// All headings in index order.
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Left, Heading::Down, Heading::Right];

    /// Heading from its index (wraps modulo 4).
    #[inline]
    pub const fn from_index(index: u32) -> Heading {
        Self::ALL[(index % 4) as usize]
    }

    /// Unit step on each axis (screen coordinates, +Y down).
    #[inline]
    pub const fn unit(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Left => (-1, 0),
            Heading::Down => (0, 1),
            Heading::Right => (1, 0),
        }
    }

    /// Step of `speed` whole units in this heading.
    #[inline]
    pub const fn step(self, speed: i32) -> (i32, i32) {
        let (ux, uy) = self.unit();
        (ux * speed, uy * speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index() {
        assert_eq!(Heading::from_index(0), Heading::Up);
        assert_eq!(Heading::from_index(1), Heading::Left);
        assert_eq!(Heading::from_index(2), Heading::Down);
        assert_eq!(Heading::from_index(3), Heading::Right);
        assert_eq!(Heading::from_index(7), Heading::Right);
    }

    #[test]
    fn test_step() {
        assert_eq!(Heading::Up.step(5), (0, -5));
        assert_eq!(Heading::Left.step(2), (-2, 0));
        assert_eq!(Heading::Down.step(5), (0, 5));
        assert_eq!(Heading::Right.step(2), (2, 0));
    }
}
