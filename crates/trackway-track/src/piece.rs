//! A concrete piece of track: one descriptor at one cell.

use std::hash::{Hash, Hasher};

use trackway_core::{GridCell, WorldId};

use crate::descriptor::Descriptor;
use crate::track_type::TrackType;

/// One track-type descriptor bound to one grid cell.
///
/// Pieces are values: two pieces are equal when they name the same
/// descriptor at the same cell. They carry no reference to the cache that
/// produced them, so a piece may outlive a cache invalidation; check
/// [`is_active`](Self::is_active) before trusting a stale one.
#[derive(Clone, Debug)]
pub struct TrackPiece {
    descriptor: Descriptor,
    cell: GridCell,
}

impl TrackPiece {
    /// Bind `descriptor` to `cell`.
    pub fn new(descriptor: Descriptor, cell: GridCell) -> Self {
        Self { descriptor, cell }
    }

    /// The descriptor.
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// The track cell.
    pub fn cell(&self) -> GridCell {
        self.cell
    }

    /// World of the track cell.
    pub fn world(&self) -> WorldId {
        self.cell.world
    }

    /// The underlying implementation (unguarded).
    pub fn track_type(&self) -> &dyn TrackType {
        self.descriptor.track_type()
    }

    /// Whether the descriptor is still registered.
    pub fn is_active(&self) -> bool {
        self.descriptor.is_active()
    }
}

impl PartialEq for TrackPiece {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell && self.descriptor == other.descriptor
    }
}

impl Eq for TrackPiece {}

impl Hash for TrackPiece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.descriptor.hash(state);
        self.cell.hash(state);
    }
}
