//! Cardinal facing and the vectors derived from it.

use serde::{Deserialize, Serialize};

/// Horizontal field-of-view factor: length of the camera plane relative to the
/// facing vector. 0.66 gives roughly a 66° view.
pub const FOV_SCALE: f64 = 0.66;

/// One of the four cardinal facings, numbered clockwise from north.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Up the grid, towards row 0.
    North = 0,
    /// Towards higher columns.
    #[default]
    East = 1,
    /// Towards higher rows.
    South = 2,
    /// Towards column 0.
    West = 3,
}

impl Direction {
    /// All facings in clockwise order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Numeric index 0..=3.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Facing for any integer, wrapping with floored modulo.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    /// Rotates by `quarter_turns` clockwise (negative for counter-clockwise).
    pub fn rotate(self, quarter_turns: i32) -> Self {
        Self::from_index(self.index() as i32 + quarter_turns)
    }

    /// Rotates 90° clockwise.
    pub fn turn_right(self) -> Self {
        self.rotate(1)
    }

    /// Rotates 90° counter-clockwise.
    pub fn turn_left(self) -> Self {
        self.rotate(-1)
    }

    /// The opposite facing.
    pub fn reverse(self) -> Self {
        self.rotate(2)
    }

    /// Unit grid step for this facing; y grows southwards.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Facing vector used by the raycaster.
    pub fn vector(self) -> (f64, f64) {
        let (dx, dy) = self.delta();
        (dx as f64, dy as f64)
    }

    /// Camera plane: perpendicular to the facing, pointing to the viewer's right,
    /// scaled by [`FOV_SCALE`].
    pub fn camera_plane(self) -> (f64, f64) {
        let (dx, dy) = self.vector();
        (-dy * FOV_SCALE, dx * FOV_SCALE)
    }

    /// Rotation in degrees, clockwise from north.
    pub fn degrees(self) -> f32 {
        f32::from(self.index()) * 90.0
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_turns_return_to_start() {
        for dir in Direction::ALL {
            let right = (0..4).fold(dir, |d, _| d.turn_right());
            let left = (0..4).fold(dir, |d, _| d.turn_left());
            assert_eq!(right, dir);
            assert_eq!(left, dir);
        }
    }

    #[test]
    fn test_turns_wrap_with_floored_modulo() {
        assert_eq!(Direction::North.turn_left(), Direction::West);
        assert_eq!(Direction::West.turn_right(), Direction::North);
        assert_eq!(Direction::from_index(-1), Direction::West);
        assert_eq!(Direction::from_index(-6), Direction::South);
        assert_eq!(Direction::from_index(9), Direction::East);
    }

    #[test]
    fn test_camera_planes() {
        assert_eq!(Direction::North.camera_plane(), (FOV_SCALE, 0.0));
        assert_eq!(Direction::East.camera_plane(), (0.0, FOV_SCALE));
        assert_eq!(Direction::South.camera_plane(), (-FOV_SCALE, 0.0));
        assert_eq!(Direction::West.camera_plane(), (0.0, -FOV_SCALE));
    }
}
