//! Block faces: the six axis directions plus the degenerate [`Face::Center`].

use glam::{DVec3, IVec3};
use std::fmt;

/// An axis-aligned direction out of a grid cell.
///
/// Axis convention: north is `-z`, south is `+z`, east is `+x`, west is
/// `-x`, up is `+y`, down is `-y`. [`Face::Center`] denotes "no direction"
/// (the cell itself).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    /// `-z`.
    North,
    /// `+x`.
    East,
    /// `+z`.
    South,
    /// `-x`.
    West,
    /// `+y`.
    Up,
    /// `-y`.
    Down,
    /// No direction.
    Center,
}

impl Face {
    /// The six real block sides, in canonical order.
    pub const SIDES: [Face; 6] = [
        Face::North,
        Face::East,
        Face::South,
        Face::West,
        Face::Up,
        Face::Down,
    ];

    /// The four horizontal sides, clockwise from north.
    pub const HORIZONTAL: [Face; 4] = [Face::North, Face::East, Face::South, Face::West];

    /// Integer cell offset of this face.
    pub const fn offset(self) -> IVec3 {
        match self {
            Face::North => IVec3::new(0, 0, -1),
            Face::East => IVec3::new(1, 0, 0),
            Face::South => IVec3::new(0, 0, 1),
            Face::West => IVec3::new(-1, 0, 0),
            Face::Up => IVec3::new(0, 1, 0),
            Face::Down => IVec3::new(0, -1, 0),
            Face::Center => IVec3::new(0, 0, 0),
        }
    }

    /// Unit direction vector of this face (zero for [`Face::Center`]).
    pub fn direction(self) -> DVec3 {
        self.offset().as_dvec3()
    }

    /// The face pointing the other way.
    pub const fn opposite(self) -> Face {
        match self {
            Face::North => Face::South,
            Face::East => Face::West,
            Face::South => Face::North,
            Face::West => Face::East,
            Face::Up => Face::Down,
            Face::Down => Face::Up,
            Face::Center => Face::Center,
        }
    }

    /// Whether this is one of the four horizontal sides.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Face::North | Face::East | Face::South | Face::West)
    }

    /// The face along the dominant axis of a motion vector.
    ///
    /// Ties prefer x over z over y. A zero (or non-finite) vector maps to
    /// [`Face::Center`].
    pub fn from_motion(motion: DVec3) -> Face {
        if !motion.is_finite() || motion == DVec3::ZERO {
            return Face::Center;
        }
        let a = motion.abs();
        if a.x >= a.y && a.x >= a.z {
            if motion.x > 0.0 {
                Face::East
            } else {
                Face::West
            }
        } else if a.z >= a.y {
            if motion.z > 0.0 {
                Face::South
            } else {
                Face::North
            }
        } else if motion.y > 0.0 {
            Face::Up
        } else {
            Face::Down
        }
    }

    /// Lowercase name, also used as a junction label by the built-in tracks.
    pub const fn name(self) -> &'static str {
        match self {
            Face::North => "north",
            Face::East => "east",
            Face::South => "south",
            Face::West => "west",
            Face::Up => "up",
            Face::Down => "down",
            Face::Center => "center",
        }
    }

    /// Parse a name produced by [`Face::name`].
    pub fn from_name(name: &str) -> Option<Face> {
        Face::SIDES
            .into_iter()
            .chain(std::iter::once(Face::Center))
            .find(|f| f.name() == name)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for face in Face::SIDES {
            assert_eq!(face.opposite().opposite(), face);
            assert_eq!(face.offset() + face.opposite().offset(), IVec3::ZERO);
        }
    }

    #[test]
    fn from_motion_picks_dominant_axis() {
        assert_eq!(Face::from_motion(DVec3::new(0.2, -1.0, 0.1)), Face::Down);
        assert_eq!(Face::from_motion(DVec3::new(-3.0, 1.0, 2.0)), Face::West);
        assert_eq!(Face::from_motion(DVec3::new(0.0, 0.0, 0.5)), Face::South);
        assert_eq!(Face::from_motion(DVec3::ZERO), Face::Center);
        assert_eq!(Face::from_motion(DVec3::new(f64::NAN, 0.0, 0.0)), Face::Center);
    }

    #[test]
    fn from_motion_tie_prefers_x() {
        assert_eq!(Face::from_motion(DVec3::new(1.0, 1.0, 1.0)), Face::East);
    }

    #[test]
    fn names_round_trip() {
        for face in Face::SIDES {
            assert_eq!(Face::from_name(face.name()), Some(face));
        }
        assert_eq!(Face::from_name("1"), None);
    }
}
