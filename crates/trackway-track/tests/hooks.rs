//! Integration test: physics, placement, and vehicle hook forwarding.

use std::sync::Arc;

use glam::DVec3;
use trackway_core::{CellData, Face, GridCell, PhysicsEvent, WorldId};
use trackway_path::TrackAabb;
use trackway_test_utils::fixtures::{FixedPathTrack, FIXTURE_RAIL};
use trackway_test_utils::{MockVehicle, MockWorld};
use trackway_track::{
    Descriptor, NavigationState, Origin, PhysicsOutcome, TrackConfig, TrackLookup, TypeRegistry,
};

const W: WorldId = WorldId(0);

fn setup(track: FixedPathTrack) -> (Arc<MockWorld>, TrackLookup, Descriptor) {
    let registry = Arc::new(TypeRegistry::new());
    let world = Arc::new(MockWorld::new());
    world.set(GridCell::new(W, 0, 0, 0), CellData::new(FIXTURE_RAIL, 0));
    let d = Descriptor::new(track, Origin::Host);
    registry.register(&d, false).unwrap();
    let lookup = TrackLookup::new(registry, world.clone(), TrackConfig::default()).unwrap();
    (world, lookup, d)
}

#[test]
fn physics_is_delivered_to_supported_track() {
    let track = FixedPathTrack::straight_x("phys").with_physics(true);
    let calls = track.counters();
    let (_, lookup, d) = setup(track);
    let mut event = PhysicsEvent::new(GridCell::new(W, 0, 0, 0), None);
    assert_eq!(
        lookup.dispatch_block_physics(&mut event),
        PhysicsOutcome::Handled { descriptor: d }
    );
    assert_eq!(calls.physics(), 1);
    assert!(event.is_cancelled());
}

#[test]
fn unsupported_track_is_reported() {
    let track = FixedPathTrack::straight_x("phys").with_physics(false);
    let calls = track.counters();
    let (_, lookup, d) = setup(track);
    let mut event = PhysicsEvent::new(GridCell::new(W, 0, 0, 0), Some(GridCell::new(W, 0, -1, 0)));
    assert_eq!(
        lookup.dispatch_block_physics(&mut event),
        PhysicsOutcome::Unsupported { descriptor: d }
    );
    assert_eq!(calls.physics(), 0);
}

#[test]
fn physics_skips_types_without_the_capability() {
    let track = FixedPathTrack::straight_x("plain");
    let calls = track.counters();
    let (_, lookup, _) = setup(track);
    let mut event = PhysicsEvent::new(GridCell::new(W, 0, 0, 0), None);
    assert_eq!(lookup.dispatch_block_physics(&mut event), PhysicsOutcome::Ignored);
    assert_eq!(calls.physics(), 0);
}

#[test]
fn placement_notifies_and_refreshes_cache() {
    let track = FixedPathTrack::straight_x("placed");
    let calls = track.counters();
    let (world, lookup, d) = setup(track);
    let cell = GridCell::new(W, 1, 0, 0);
    let pos = DVec3::new(1.5, 0.1, 0.5);
    assert!(lookup.find_piece(W, pos).is_none());

    world.set(cell, CellData::new(FIXTURE_RAIL, 0));
    assert_eq!(lookup.dispatch_block_placed(cell), Some(d));
    assert_eq!(calls.placed(), 1);
    assert!(lookup.find_piece(W, pos).is_some());
    assert_eq!(lookup.dispatch_block_placed(GridCell::new(W, 9, 9, 9)), None);
}

#[test]
fn vehicle_hooks_forward_and_default() {
    let track = FixedPathTrack::straight_x("veh");
    let calls = track.counters();
    let (_, lookup, _) = setup(track);
    let piece = lookup.find_piece(W, DVec3::new(0.5, 0.1, 0.5)).unwrap();
    let vehicle = MockVehicle::new(42);

    lookup.pre_move(&piece, &vehicle);
    lookup.post_move(&piece, &vehicle);
    assert_eq!(calls.moves(), 2);
    assert!(lookup.collide(&piece, &vehicle, Face::North));
    assert!(lookup.block_collision(&piece, &vehicle, GridCell::new(W, 1, 0, 0), Face::West));
    assert!(!lookup.head_on_collision(&piece, &vehicle, GridCell::new(W, 1, 0, 0)));
    assert!(!lookup.has_block_activation(&piece));
    assert!(!lookup.upside_down(&piece));
    assert!(lookup.texture(&piece).is_empty());
    assert_eq!(lookup.sign_trigger_directions(&piece, GridCell::new(W, 0, -1, 0), Face::North).len(), 6);
    assert_eq!(
        lookup.spawn_location(&piece, Face::East),
        Some(DVec3::new(0.5, 0.0625, 0.5))
    );
}

#[test]
fn bounding_box_defaults_to_block() {
    let (_, lookup, _) = setup(FixedPathTrack::straight_x("box"));
    let state = NavigationState::new(W);
    assert_eq!(lookup.bounding_box(&state), TrackAabb::BLOCK);
}
