//! Movement path compliance test helpers.
//!
//! Invariants every well-formed [`MovementPath`] satisfies, checked
//! against each path shape under test.

use crate::path::MovementPath;

/// Assert that the start and end anchors lie on the path.
pub fn assert_anchors_on_path(path: &MovementPath) {
    for anchor in [path.start(), path.end()].into_iter().flatten() {
        let info = path.proximity(anchor.position, anchor.motion);
        assert!(
            info.distance < 1e-9,
            "anchor {:?} is {} away from its own path",
            anchor.position,
            info.distance
        );
    }
}

/// Assert that every vertex of the path has zero proximity distance.
pub fn assert_points_have_zero_distance(path: &MovementPath) {
    for p in path.points() {
        let d = path.proximity(*p, glam::DVec3::ZERO).distance;
        assert!(d < 1e-9, "vertex {p:?} measured {d} from its path");
    }
}
