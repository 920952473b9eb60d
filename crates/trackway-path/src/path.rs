//! The traversable polyline through a track piece.

use glam::DVec3;
use smallvec::SmallVec;

use crate::position::TrackPosition;
use crate::proximity::ProximityInfo;

/// Ordered geometric description of the line a vehicle follows through
/// a track piece.
///
/// Points are relative to the track cell's minimum corner. A path with no
/// points is empty: the piece offers no movement (air). The start and end
/// anchors carry a motion vector pointing *out* of the path, so stepping
/// a tiny distance along it leaves the piece through that end.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovementPath {
    points: SmallVec<[DVec3; 4]>,
}

impl MovementPath {
    /// The empty path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A path through the given points, in order.
    pub fn new(points: impl IntoIterator<Item = DVec3>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// A straight path from `start` to `end`.
    pub fn line(start: DVec3, end: DVec3) -> Self {
        Self::new([start, end])
    }

    /// Whether the path has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The path's points, relative to the track cell.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Total polyline length.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Anchor at the first point, motion pointing away from the path.
    pub fn start(&self) -> Option<TrackPosition> {
        let first = *self.points.first()?;
        let motion = match self.points.get(1) {
            Some(&next) => (first - next).normalize_or_zero(),
            None => DVec3::ZERO,
        };
        Some(TrackPosition::relative(first, motion))
    }

    /// Anchor at the last point, motion pointing away from the path.
    pub fn end(&self) -> Option<TrackPosition> {
        let n = self.points.len();
        let last = *self.points.last()?;
        let motion = if n >= 2 {
            (last - self.points[n - 2]).normalize_or_zero()
        } else {
            DVec3::ZERO
        };
        Some(TrackPosition::relative(last, motion))
    }

    /// Nearest point on the path to `point` (cell-relative).
    pub fn closest_point(&self, point: DVec3) -> Option<DVec3> {
        self.nearest(point).map(|(closest, _)| closest)
    }

    /// Proximity of a cell-relative point and motion vector to this path.
    ///
    /// Distance is measured to the nearest point of the nearest segment;
    /// deviation is taken from that segment's tangent. An empty path is
    /// [`ProximityInfo::UNREACHABLE`].
    pub fn proximity(&self, point: DVec3, motion: DVec3) -> ProximityInfo {
        match self.nearest(point) {
            None => ProximityInfo::UNREACHABLE,
            Some((closest, tangent)) => ProximityInfo::new(
                point.distance(closest),
                ProximityInfo::deviation_between(tangent, motion),
            ),
        }
    }

    /// Nearest point and the tangent of the segment it lies on.
    fn nearest(&self, point: DVec3) -> Option<(DVec3, DVec3)> {
        match self.points.as_slice() {
            [] => None,
            [only] => Some((*only, DVec3::ZERO)),
            points => {
                let mut best: Option<(f64, DVec3, DVec3)> = None;
                for w in points.windows(2) {
                    let closest = closest_on_segment(w[0], w[1], point);
                    let d2 = point.distance_squared(closest);
                    // Strict less-than: the earliest segment wins ties.
                    if best.is_none_or(|(bd2, _, _)| d2 < bd2) {
                        best = Some((d2, closest, w[1] - w[0]));
                    }
                }
                best.map(|(_, closest, tangent)| (closest, tangent))
            }
        }
    }
}

fn closest_on_segment(a: DVec3, b: DVec3, p: DVec3) -> DVec3 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    fn straight_x() -> MovementPath {
        MovementPath::line(DVec3::new(0.0, 0.0625, 0.5), DVec3::new(1.0, 0.0625, 0.5))
    }

    fn curve() -> MovementPath {
        MovementPath::new([
            DVec3::new(0.5, 0.0625, 0.0),
            DVec3::new(0.5, 0.0625, 0.5),
            DVec3::new(1.0, 0.0625, 0.5),
        ])
    }

    #[test]
    fn empty_path_has_no_anchors() {
        let p = MovementPath::empty();
        assert!(p.is_empty());
        assert!(p.start().is_none());
        assert!(p.end().is_none());
        assert_eq!(p.proximity(DVec3::ZERO, DVec3::X), ProximityInfo::UNREACHABLE);
    }

    #[test]
    fn anchors_point_outward() {
        let p = straight_x();
        let s = p.start().unwrap();
        let e = p.end().unwrap();
        assert!(!s.is_absolute());
        assert_eq!(s.motion, DVec3::NEG_X);
        assert_eq!(e.motion, DVec3::X);
        assert_eq!(e.position, DVec3::new(1.0, 0.0625, 0.5));
    }

    #[test]
    fn proximity_measures_perpendicular_distance() {
        let p = straight_x();
        let near = p.proximity(DVec3::new(0.3, 0.0625, 1.5), DVec3::X);
        assert!((near.distance - 1.0).abs() < 1e-12);
        assert_eq!(near.deviation, 0.0);
    }

    #[test]
    fn proximity_uses_nearest_segment_tangent() {
        let p = curve();
        let info = p.proximity(DVec3::new(0.9, 0.0625, 0.5), DVec3::X);
        assert!(info.distance < 1e-12);
        assert_eq!(info.deviation, 0.0);
        let crossing = p.proximity(DVec3::new(0.5, 0.0625, 0.1), DVec3::X);
        assert_eq!(crossing.deviation, 1.0);
    }

    #[test]
    fn length_of_curve() {
        assert!((curve().length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn compliance_straight_and_curve() {
        compliance::assert_anchors_on_path(&straight_x());
        compliance::assert_points_have_zero_distance(&straight_x());
        compliance::assert_anchors_on_path(&curve());
        compliance::assert_points_have_zero_distance(&curve());
    }

    proptest! {
        #[test]
        fn closest_point_is_no_farther_than_any_vertex(
            x in -2.0f64..3.0, y in -2.0f64..3.0, z in -2.0f64..3.0,
        ) {
            let p = curve();
            let q = DVec3::new(x, y, z);
            let d = q.distance(p.closest_point(q).unwrap());
            for v in p.points() {
                prop_assert!(d <= q.distance(*v) + 1e-12);
            }
        }
    }
}
