use serde::{Deserialize, Serialize};

/// One of the eight compass offsets between neighboring tiles.
///
/// `dx` is -1 for west and 1 for east, `dy` is -1 for south and 1 for north.
///
/// # Examples
///
/// ```
/// use tilecover_types::direction::Direction;
///
/// assert_eq!(Direction::West.offset(), (-1, 0));
/// assert_eq!(Direction::North.dy(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl Direction {
    /// All eight directions, clockwise from north-west.
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
    ];

    /// The `(dx, dy)` pair for this direction.
    pub const fn offset(self) -> (i8, i8) {
        match self {
            Direction::NorthWest => (-1, 1),
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn dx(self) -> i8 {
        self.offset().0
    }

    pub const fn dy(self) -> i8 {
        self.offset().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_unique_unit_steps() {
        for (i, a) in Direction::ALL.iter().enumerate() {
            let (dx, dy) = a.offset();
            assert!((-1..=1).contains(&dx) && (-1..=1).contains(&dy));
            assert_ne!((dx, dy), (0, 0));
            for b in &Direction::ALL[i + 1..] {
                assert_ne!(a.offset(), b.offset());
            }
        }
    }

    #[test]
    fn test_components_match_offset() {
        for d in Direction::ALL {
            assert_eq!((d.dx(), d.dy()), d.offset());
        }
        assert_eq!(Direction::SouthWest.dx(), -1);
        assert_eq!(Direction::SouthWest.dy(), -1);
    }
}
