//! Track bounding boxes and enter-direction derivation.

use glam::DVec3;
use trackway_core::Face;

/// Axis-aligned box around a track piece, relative to its cell.
///
/// Used to work out the direction a vehicle was travelling when it
/// entered the piece: the motion is traced backwards from the current
/// position until it leaves the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackAabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl TrackAabb {
    /// The full 1×1×1 cell.
    pub const BLOCK: TrackAabb = TrackAabb {
        min: DVec3::ZERO,
        max: DVec3::ONE,
    };

    /// A box from two corners, in any order.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Whether a cell-relative point lies inside the box (inclusive).
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Direction of travel at the moment a vehicle at `position` moving
    /// along `motion` entered the box.
    ///
    /// Traces backwards along `-motion`; the axis whose entry plane is
    /// reached first determines the face. The result is the direction of
    /// travel (moving east through the west side yields [`Face::East`]).
    /// Zero motion yields [`Face::Center`].
    pub fn enter_face(&self, position: DVec3, motion: DVec3) -> Face {
        let mut best: Option<(f64, Face)> = None;
        let axes = [
            (position.x, motion.x, self.min.x, self.max.x, Face::East, Face::West),
            (position.z, motion.z, self.min.z, self.max.z, Face::South, Face::North),
            (position.y, motion.y, self.min.y, self.max.y, Face::Up, Face::Down),
        ];
        for (p, m, lo, hi, pos_face, neg_face) in axes {
            if m == 0.0 || !m.is_finite() {
                continue;
            }
            let (t, face) = if m > 0.0 {
                ((p - lo) / m, pos_face)
            } else {
                ((p - hi) / m, neg_face)
            };
            let t = t.max(0.0);
            if best.is_none_or(|(bt, _)| t < bt) {
                best = Some((t, face));
            }
        }
        best.map_or(Face::Center, |(_, face)| face)
    }
}

impl Default for TrackAabb {
    fn default() -> Self {
        Self::BLOCK
    }
}
