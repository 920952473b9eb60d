//! Shapes of a regular rail and the paths they produce.

use glam::DVec3;
use trackway_core::Face;
use trackway_path::MovementPath;

/// Height of the path above the rail cell's floor.
pub const RAIL_HEIGHT: f64 = 1.0 / 16.0;

/// The ten shapes a regular rail can take. The discriminant is the value
/// stored in the rail cell's state bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum RailShape {
    /// Straight, north to south.
    NorthSouth = 0,
    /// Straight, east to west.
    EastWest = 1,
    /// Slope rising towards the east.
    AscendingEast = 2,
    /// Slope rising towards the west.
    AscendingWest = 3,
    /// Slope rising towards the north.
    AscendingNorth = 4,
    /// Slope rising towards the south.
    AscendingSouth = 5,
    /// Curve joining south and east.
    SouthEast = 6,
    /// Curve joining south and west.
    SouthWest = 7,
    /// Curve joining north and west.
    NorthWest = 8,
    /// Curve joining north and east.
    NorthEast = 9,
}

impl RailShape {
    /// All shapes, in state order.
    pub const ALL: [RailShape; 10] = [
        RailShape::NorthSouth,
        RailShape::EastWest,
        RailShape::AscendingEast,
        RailShape::AscendingWest,
        RailShape::AscendingNorth,
        RailShape::AscendingSouth,
        RailShape::SouthEast,
        RailShape::SouthWest,
        RailShape::NorthWest,
        RailShape::NorthEast,
    ];

    /// Decode from cell state bits. Only the low four bits are used.
    pub fn from_state(state: u16) -> Option<RailShape> {
        Self::ALL.get(usize::from(state & 0xF)).copied()
    }

    /// Cell state bits encoding this shape.
    pub const fn state(self) -> u16 {
        self as u16
    }

    /// The two faces the rail connects. For slopes the low end comes first.
    pub const fn ends(self) -> (Face, Face) {
        match self {
            RailShape::NorthSouth => (Face::North, Face::South),
            RailShape::EastWest => (Face::East, Face::West),
            RailShape::AscendingEast => (Face::West, Face::East),
            RailShape::AscendingWest => (Face::East, Face::West),
            RailShape::AscendingNorth => (Face::South, Face::North),
            RailShape::AscendingSouth => (Face::North, Face::South),
            RailShape::SouthEast => (Face::South, Face::East),
            RailShape::SouthWest => (Face::South, Face::West),
            RailShape::NorthWest => (Face::North, Face::West),
            RailShape::NorthEast => (Face::North, Face::East),
        }
    }

    /// Whether the rail is a slope.
    pub const fn is_ascending(self) -> bool {
        matches!(
            self,
            RailShape::AscendingEast
                | RailShape::AscendingWest
                | RailShape::AscendingNorth
                | RailShape::AscendingSouth
        )
    }

    /// Whether the rail is a curve.
    pub const fn is_curve(self) -> bool {
        matches!(
            self,
            RailShape::SouthEast | RailShape::SouthWest | RailShape::NorthWest | RailShape::NorthEast
        )
    }

    /// The flat shape joining two horizontal faces, if any.
    pub fn connecting(a: Face, b: Face) -> Option<RailShape> {
        Self::ALL.into_iter().find(|s| {
            !s.is_ascending() && {
                let (x, y) = s.ends();
                (x, y) == (a, b) || (y, x) == (a, b)
            }
        })
    }

    /// The path through a rail of this shape, from the first end to the
    /// second, relative to the rail cell.
    pub fn path(self) -> MovementPath {
        let (a, b) = self.ends();
        if self.is_ascending() {
            MovementPath::line(edge(a, RAIL_HEIGHT), edge(b, 1.0 + RAIL_HEIGHT))
        } else if self.is_curve() {
            MovementPath::new([
                edge(a, RAIL_HEIGHT),
                DVec3::new(0.5, RAIL_HEIGHT, 0.5),
                edge(b, RAIL_HEIGHT),
            ])
        } else {
            MovementPath::line(edge(a, RAIL_HEIGHT), edge(b, RAIL_HEIGHT))
        }
    }

    /// Short lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            RailShape::NorthSouth => "north_south",
            RailShape::EastWest => "east_west",
            RailShape::AscendingEast => "ascending_east",
            RailShape::AscendingWest => "ascending_west",
            RailShape::AscendingNorth => "ascending_north",
            RailShape::AscendingSouth => "ascending_south",
            RailShape::SouthEast => "south_east",
            RailShape::SouthWest => "south_west",
            RailShape::NorthWest => "north_west",
            RailShape::NorthEast => "north_east",
        }
    }
}

/// Midpoint of a horizontal cell edge at height `y`.
fn edge(face: Face, y: f64) -> DVec3 {
    let d = face.direction();
    DVec3::new(0.5 + 0.5 * d.x, y, 0.5 + 0.5 * d.z)
}
