//! Vertical rails climbing a wall.

use std::sync::{Arc, LazyLock};

use glam::DVec3;
use trackway_core::{CellData, Face, GridCell, WorldAccess};
use trackway_track::{
    Capabilities, Junction, NavigationState, PathLogic, TrackLogic, TrackLookup, TrackPiece,
    TrackTexture, TrackType,
};

use crate::materials::{self, VERTICAL_RAIL};

/// Distance of the path from the wall it is mounted on.
const WALL_OFFSET: f64 = 0.2;

static WALL_LOGIC: LazyLock<Vec<Arc<dyn TrackLogic>>> = LazyLock::new(|| {
    Face::HORIZONTAL
        .into_iter()
        .map(|wall| PathLogic::shared(VerticalTrack::path_for(wall)))
        .collect()
});

/// A rail running straight up a solid wall.
///
/// Membership needs the world: the cell must hold a vertical rail *and*
/// the wall it is mounted on must be solid. State bits 0-1 select the wall
/// face, in [`Face::HORIZONTAL`] order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerticalTrack;

impl VerticalTrack {
    /// Face of the wall the rail is mounted on.
    pub fn wall(data: CellData) -> Face {
        Face::HORIZONTAL[usize::from(data.state & 0b11)]
    }

    fn path_for(wall: Face) -> trackway_path::MovementPath {
        let d = wall.direction();
        let x = 0.5 + (0.5 - WALL_OFFSET) * d.x;
        let z = 0.5 + (0.5 - WALL_OFFSET) * d.z;
        trackway_path::MovementPath::line(DVec3::new(x, 0.0, z), DVec3::new(x, 1.0, z))
    }
}

impl TrackType for VerticalTrack {
    fn name(&self) -> &str {
        "vertical"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SIMPLE.with_world_context()
    }

    fn is_track_data(&self, data: CellData) -> bool {
        data.material == VERTICAL_RAIL
    }

    fn is_track_at(&self, world: &dyn WorldAccess, cell: GridCell) -> bool {
        let data = world.cell_data(cell);
        self.is_track_data(data)
            && materials::is_solid(world.cell_data(cell.offset(Self::wall(data))).material)
    }

    fn logic(&self, state: &NavigationState, world: &dyn WorldAccess) -> Arc<dyn TrackLogic> {
        match state.track_cell().map(|cell| world.cell_data(cell)) {
            Some(data) if self.is_track_data(data) => {
                let idx = usize::from(data.state & 0b11);
                WALL_LOGIC[idx].clone()
            }
            _ => trackway_track::air_logic(),
        }
    }

    fn junctions(&self, lookup: &TrackLookup, piece: &TrackPiece) -> Vec<Junction> {
        let data = lookup.world().cell_data(piece.cell());
        let path = Self::path_for(Self::wall(data));
        match (path.start(), path.end()) {
            (Some(start), Some(end)) => vec![
                Junction::new(Face::Down.name(), start),
                Junction::new(Face::Up.name(), end),
            ],
            _ => Vec::new(),
        }
    }

    fn spawn_location(&self, cell: GridCell, orientation: Face) -> DVec3 {
        let wall = if orientation.is_horizontal() { orientation } else { Face::North };
        let p = Self::path_for(wall).points()[0];
        cell.origin() + DVec3::new(p.x, 0.5, p.z)
    }

    fn texture(&self, _cell: GridCell) -> TrackTexture {
        TrackTexture::default().with_face(Face::Center, "vertical_rail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::STONE;
    use trackway_core::WorldId;
    use trackway_test_utils::MockWorld;

    const W: WorldId = WorldId(0);

    #[test]
    fn needs_a_solid_wall() {
        let world = MockWorld::new();
        let cell = GridCell::new(W, 0, 0, 0);
        // State 1: wall to the east.
        world.set(cell, CellData::new(VERTICAL_RAIL, 1));
        assert!(!VerticalTrack.is_track_at(&world, cell));
        world.set(cell.offset(Face::East), CellData::new(STONE, 0));
        assert!(VerticalTrack.is_track_at(&world, cell));
        assert!(VerticalTrack.capabilities().needs_world_context());
    }

    #[test]
    fn path_hugs_the_wall() {
        let path = VerticalTrack::path_for(Face::East);
        let start = path.start().unwrap();
        let end = path.end().unwrap();
        assert_eq!(start.position, DVec3::new(0.8, 0.0, 0.5));
        assert_eq!(start.motion, -DVec3::Y);
        assert_eq!(end.motion, DVec3::Y);
    }
}
