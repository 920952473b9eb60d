//! Positions with motion, in world-absolute or cell-relative coordinates.

use glam::DVec3;
use trackway_core::{Face, GridCell, WorldId};

/// A point in space plus the motion vector through it.
///
/// The `absolute` flag records whether `position` is in world coordinates
/// or relative to the minimum corner of some track cell. Conversions take
/// the reference cell explicitly; a position never remembers which cell it
/// is relative to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackPosition {
    /// Location, interpreted according to [`is_absolute`](Self::is_absolute).
    pub position: DVec3,
    /// Motion vector. Not required to be normalized.
    pub motion: DVec3,
    absolute: bool,
}

impl TrackPosition {
    /// A world-absolute position.
    pub fn absolute(position: DVec3, motion: DVec3) -> Self {
        Self {
            position,
            motion,
            absolute: true,
        }
    }

    /// A position relative to a track cell's minimum corner.
    pub fn relative(position: DVec3, motion: DVec3) -> Self {
        Self {
            position,
            motion,
            absolute: false,
        }
    }

    /// Whether `position` is in world coordinates.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Convert to world coordinates, treating the current value as relative
    /// to `cell`. No-op if already absolute.
    pub fn make_absolute(&mut self, cell: GridCell) {
        if !self.absolute {
            self.position += cell.origin();
            self.absolute = true;
        }
    }

    /// Convert to coordinates relative to `cell`. No-op if already relative.
    pub fn make_relative(&mut self, cell: GridCell) {
        if self.absolute {
            self.position -= cell.origin();
            self.absolute = false;
        }
    }

    /// A copy relative to `cell`.
    pub fn to_relative(mut self, cell: GridCell) -> Self {
        self.make_relative(cell);
        self
    }

    /// A copy in world coordinates, treating a relative value as relative to `cell`.
    pub fn to_absolute(mut self, cell: GridCell) -> Self {
        self.make_absolute(cell);
        self
    }

    /// The cell containing an absolute position.
    pub fn cell(&self, world: WorldId) -> GridCell {
        debug_assert!(self.absolute, "cell() of a relative position");
        GridCell::containing(world, self.position)
    }

    /// Point the motion along a face, keeping its magnitude at 1.
    pub fn set_motion_face(&mut self, face: Face) {
        self.motion = face.direction();
    }

    /// Nudge the position `distance` units along the motion direction.
    ///
    /// Used to step across the boundary of the current cell after
    /// landing exactly on it. A zero motion leaves the position unchanged.
    pub fn small_advance(&mut self, distance: f64) {
        self.position += self.motion.normalize_or_zero() * distance;
    }
}

impl Default for TrackPosition {
    fn default() -> Self {
        Self::absolute(DVec3::ZERO, DVec3::ZERO)
    }
}
