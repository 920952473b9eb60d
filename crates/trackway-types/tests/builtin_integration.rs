//! Integration test: the built-in track types on a small hand-built layout.

use std::sync::Arc;

use glam::DVec3;
use trackway_core::{CellData, Face, GridCell, PhysicsEvent, WorldId};
use trackway_test_utils::{MockSignals, MockWorld};
use trackway_track::{PhysicsOutcome, TrackConfig, TrackLookup, TrackPiece, TypeRegistry};
use trackway_types::materials::{DETECTOR_RAIL, RAIL, STONE, VERTICAL_RAIL};
use trackway_types::{register_builtins, RailShape};

const W: WorldId = WorldId(0);

fn cell(x: i32, y: i32, z: i32) -> GridCell {
    GridCell::new(W, x, y, z)
}

fn rail(shape: RailShape) -> CellData {
    CellData::new(RAIL, shape.state())
}

/// Flat rails at x = 0..=3, a slope up at x = 4, and a flat rail at
/// (5, 1) on top of a stone block.
fn layout() -> (Arc<MockWorld>, TrackLookup) {
    let world = Arc::new(MockWorld::new());
    for x in 0..=4 {
        world.set(cell(x, -1, 0), CellData::new(STONE, 0));
    }
    for x in 0..=3 {
        world.set(cell(x, 0, 0), rail(RailShape::EastWest));
    }
    world.set(cell(4, 0, 0), rail(RailShape::AscendingEast));
    world.set(cell(5, 0, 0), CellData::new(STONE, 0));
    world.set(cell(5, 1, 0), rail(RailShape::EastWest));

    let registry = Arc::new(TypeRegistry::new());
    register_builtins(&registry).unwrap();
    let lookup = TrackLookup::new(registry, world.clone(), TrackConfig::default()).unwrap();
    (world, lookup)
}

fn walk(lookup: &TrackLookup, from: TrackPiece, exit: Face) -> Vec<GridCell> {
    let mut piece = from;
    let mut visited = vec![piece.cell()];
    while let Some(j) = lookup
        .junctions(&piece)
        .into_iter()
        .find(|j| j.name() == exit.name())
    {
        let Some(next) = lookup.take_junction(&piece, &j) else {
            break;
        };
        piece = next.piece().unwrap().clone();
        visited.push(piece.cell());
        assert!(visited.len() < 32, "walk did not terminate");
    }
    visited
}

#[test]
fn walks_east_up_the_slope() {
    let (_, lookup) = layout();
    let start = lookup.find_piece(W, DVec3::new(0.5, 0.1, 0.5)).unwrap();
    assert_eq!(start.descriptor().name(), "regular");
    let visited = walk(&lookup, start, Face::East);
    assert_eq!(
        visited,
        [cell(0, 0, 0), cell(1, 0, 0), cell(2, 0, 0), cell(3, 0, 0), cell(4, 0, 0), cell(5, 1, 0)]
    );
}

#[test]
fn walks_west_down_the_slope() {
    let (_, lookup) = layout();
    let top = lookup.find_piece(W, DVec3::new(5.5, 1.1, 0.5)).unwrap();
    let visited = walk(&lookup, top, Face::West);
    assert_eq!(visited.first(), Some(&cell(5, 1, 0)));
    assert_eq!(visited[1], cell(4, 0, 0));
    assert_eq!(visited.last(), Some(&cell(0, 0, 0)));
}

#[test]
fn vehicle_above_slope_resolves_to_slope() {
    let (_, lookup) = layout();
    let piece = lookup.find_piece(W, DVec3::new(4.9, 1.02, 0.5)).unwrap();
    assert_eq!(piece.cell(), cell(4, 0, 0));
}

#[test]
fn switching_a_junction_reshapes_the_rail() {
    let (world, lookup) = layout();
    let c = cell(0, 0, 3);
    world.set(c.offset(Face::Down), CellData::new(STONE, 0));
    world.set(c, rail(RailShape::NorthSouth));
    let piece = lookup.find_piece(W, DVec3::new(0.5, 0.1, 3.5)).unwrap();

    let junctions = lookup.junctions(&piece);
    let north = junctions.iter().find(|j| j.name() == "north").unwrap().clone();
    let to = trackway_track::Junction::new("east", *north.position());
    lookup.switch_junction(&piece, &north, &to);
    assert_eq!(world.get(c), rail(RailShape::NorthEast));

    let names: Vec<_> = lookup
        .junctions(&piece)
        .iter()
        .map(|j| j.name().to_owned())
        .collect();
    assert_eq!(names, ["north", "east"]);
}

#[test]
fn vertical_rails_climb_a_wall() {
    let (world, lookup) = layout();
    for y in 0..3 {
        world.set(cell(11, y, 0), CellData::new(STONE, 0));
        // State 1: wall to the east.
        world.set(cell(10, y, 0), CellData::new(VERTICAL_RAIL, 1));
    }
    let bottom = lookup.find_piece(W, DVec3::new(10.8, 0.5, 0.5)).unwrap();
    assert_eq!(bottom.descriptor().name(), "vertical");
    let visited = walk(&lookup, bottom, Face::Up);
    assert_eq!(visited, [cell(10, 0, 0), cell(10, 1, 0), cell(10, 2, 0)]);

    // Without its wall, a vertical rail is not track.
    world.clear(cell(11, 1, 0));
    assert!(lookup.track_type_at(cell(10, 1, 0)).is_none());
}

#[test]
fn detector_rail_uses_block_activation() {
    let (world, lookup) = layout();
    let c = cell(0, 0, 8);
    world.set(c, CellData::new(DETECTOR_RAIL, RailShape::EastWest.state()));
    let piece = lookup.find_piece(W, DVec3::new(0.5, 0.1, 8.5)).unwrap();
    assert_eq!(piece.descriptor().name(), "detector");
    assert!(lookup.has_block_activation(&piece));
}

#[test]
fn removing_support_makes_rail_unsupported() {
    let (world, lookup) = layout();
    let mut event = PhysicsEvent::new(cell(2, 0, 0), Some(cell(2, -1, 0)));
    assert!(matches!(
        lookup.dispatch_block_physics(&mut event),
        PhysicsOutcome::Handled { .. }
    ));
    world.clear(cell(2, -1, 0));
    match lookup.dispatch_block_physics(&mut event) {
        PhysicsOutcome::Unsupported { descriptor } => assert_eq!(descriptor.name(), "regular"),
        other => panic!("expected Unsupported, got {other:?}"),
    }
}

#[test]
fn signals_hang_below_the_support_block() {
    let (_, lookup) = layout();
    let mut signals = MockSignals::new();
    signals.place(cell(1, -2, 0), 11, Face::West);
    let piece = lookup.find_piece(W, DVec3::new(1.5, 0.1, 0.5)).unwrap();
    let found = lookup.discover_signs(&piece, &signals);
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|t| t.handle().map(|h| h.0) == Some(11)));
}
