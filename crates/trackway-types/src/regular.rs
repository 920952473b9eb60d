//! Regular and detector rails.

use std::sync::{Arc, LazyLock};

use glam::DVec3;
use smallvec::{smallvec, SmallVec};
use trackway_core::{CellData, Face, GridCell, MaterialId, WorldAccess};
use trackway_path::TrackAabb;
use trackway_track::{
    Capabilities, Junction, NavigationState, PathLogic, TrackLogic, TrackLookup, TrackPiece,
    TrackTexture, TrackType,
};

use crate::materials::{self, DETECTOR_RAIL, RAIL};
use crate::shape::{RailShape, RAIL_HEIGHT};

static SHAPE_LOGIC: LazyLock<Vec<Arc<dyn TrackLogic>>> = LazyLock::new(|| {
    RailShape::ALL
        .into_iter()
        .map(|shape| PathLogic::shared(shape.path()))
        .collect()
});

/// A rail lying on top of a solid block, shaped by its cell state.
///
/// Junctions are named after the faces the rail connects (`"north"`,
/// `"east"`, ...). Signals hang in a column starting two cells below the
/// rail, under its support block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegularTrack {
    material: MaterialId,
    detector: bool,
}

impl RegularTrack {
    /// Plain rail.
    pub const fn plain() -> Self {
        Self {
            material: RAIL,
            detector: false,
        }
    }

    /// Detector rail. Cannot curve and uses block activation.
    pub const fn detector() -> Self {
        Self {
            material: DETECTOR_RAIL,
            detector: true,
        }
    }

    fn shape_of(&self, data: CellData) -> Option<RailShape> {
        if data.material != self.material {
            return None;
        }
        RailShape::from_state(data.state).filter(|s| !(self.detector && s.is_curve()))
    }
}

impl TrackType for RegularTrack {
    fn name(&self) -> &str {
        if self.detector {
            "detector"
        } else {
            "regular"
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SIMPLE.with_physics()
    }

    fn is_track_data(&self, data: CellData) -> bool {
        self.shape_of(data).is_some()
    }

    /// A vehicle near the top of a slope is already in the cell above it.
    fn track_cells(&self, world: &dyn WorldAccess, position: GridCell) -> SmallVec<[GridCell; 2]> {
        let below = position.offset(Face::Down);
        match self.shape_of(world.cell_data(below)) {
            Some(shape) if shape.is_ascending() => smallvec![position, below],
            _ => smallvec![position],
        }
    }

    fn logic(&self, state: &NavigationState, world: &dyn WorldAccess) -> Arc<dyn TrackLogic> {
        let shape = state
            .track_cell()
            .and_then(|cell| self.shape_of(world.cell_data(cell)));
        match shape {
            Some(shape) => SHAPE_LOGIC[usize::from(shape.state())].clone(),
            None => trackway_track::air_logic(),
        }
    }

    fn bounding_box(&self, state: &NavigationState) -> TrackAabb {
        // Flat rails are entered through a slab; slopes through the full block.
        let ascending = state.cached_logic().is_some_and(|logic| {
            logic
                .path()
                .points()
                .windows(2)
                .any(|w| (w[1].y - w[0].y).abs() > 0.5)
        });
        if ascending {
            TrackAabb::BLOCK
        } else {
            TrackAabb::new(DVec3::ZERO, DVec3::new(1.0, 2.0 * RAIL_HEIGHT, 1.0))
        }
    }

    fn junctions(&self, lookup: &TrackLookup, piece: &TrackPiece) -> Vec<Junction> {
        let Some(shape) = self.shape_of(lookup.world().cell_data(piece.cell())) else {
            return Vec::new();
        };
        let path = shape.path();
        let (a, b) = shape.ends();
        match (path.start(), path.end()) {
            (Some(start), Some(end)) => vec![Junction::new(a.name(), start), Junction::new(b.name(), end)],
            _ => Vec::new(),
        }
    }

    /// Reshape the rail so it connects the two junction faces. Slopes and
    /// unknown names are left alone; detector rails only switch straight.
    fn switch_junction(&self, world: &dyn WorldAccess, cell: GridCell, from: &Junction, to: &Junction) {
        let data = world.cell_data(cell);
        let Some(current) = self.shape_of(data) else {
            return;
        };
        if current.is_ascending() {
            return;
        }
        let (Some(a), Some(b)) = (Face::from_name(from.name()), Face::from_name(to.name())) else {
            return;
        };
        let Some(next) = RailShape::connecting(a, b) else {
            return;
        };
        if (self.detector && next.is_curve()) || next == current {
            return;
        }
        if !world.set_cell_data(cell, data.with_state(next.state())) {
            tracing::warn!(%cell, shape = next.name(), "rail reshape refused by world");
        }
    }

    fn sign_column_direction(&self, _cell: GridCell) -> Option<Face> {
        Some(Face::Down)
    }

    fn sign_column_start(&self, cell: GridCell) -> Option<GridCell> {
        Some(cell.relative(0, -2, 0))
    }

    fn spawn_location(&self, cell: GridCell, _orientation: Face) -> DVec3 {
        cell.origin() + DVec3::new(0.5, RAIL_HEIGHT, 0.5)
    }

    fn is_rails_supported(&self, world: &dyn WorldAccess, cell: GridCell) -> bool {
        materials::is_solid(world.cell_data(cell.offset(Face::Down)).material)
    }

    fn has_block_activation(&self, _cell: GridCell) -> bool {
        self.detector
    }

    fn texture(&self, _cell: GridCell) -> TrackTexture {
        let name = if self.detector { "detector_rail" } else { "rail" };
        TrackTexture::default().with_face(Face::Up, name)
    }
}
