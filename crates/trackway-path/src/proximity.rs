//! Proximity of a query point and direction to a movement path.

use std::cmp::Ordering;

/// Weight of directional deviation relative to distance.
///
/// Deviation lies in `[0, 1]`, so alignment can outweigh at most a tenth
/// of a cell of distance.
pub const ALIGNMENT_WEIGHT: f64 = 0.1;

/// How close a point and direction are to a [`MovementPath`](crate::MovementPath).
///
/// Ordered by `distance + ALIGNMENT_WEIGHT * deviation` using
/// [`f64::total_cmp`], which makes the ordering total and deterministic
/// for identical inputs. Lower is closer.
#[derive(Clone, Copy, Debug)]
pub struct ProximityInfo {
    /// Distance from the query point to the nearest point on the path.
    pub distance: f64,
    /// `1 - |cos θ|` between the nearest segment's tangent and the query
    /// motion, in `[0, 1]`. Zero when either vector is degenerate.
    pub deviation: f64,
}

impl ProximityInfo {
    /// Proximity to a path with no points: farther than anything else.
    pub const UNREACHABLE: ProximityInfo = ProximityInfo {
        distance: f64::INFINITY,
        deviation: 1.0,
    };

    /// Construct from raw measurements. Deviation is clamped to `[0, 1]`.
    pub fn new(distance: f64, deviation: f64) -> Self {
        Self {
            distance,
            deviation: deviation.clamp(0.0, 1.0),
        }
    }

    /// Deviation between a segment tangent and a motion vector.
    pub fn deviation_between(tangent: glam::DVec3, motion: glam::DVec3) -> f64 {
        let t = tangent.normalize_or_zero();
        let m = motion.normalize_or_zero();
        if t == glam::DVec3::ZERO || m == glam::DVec3::ZERO {
            return 0.0;
        }
        (1.0 - t.dot(m).abs()).clamp(0.0, 1.0)
    }

    /// The combined ordering key.
    pub fn score(&self) -> f64 {
        self.distance + ALIGNMENT_WEIGHT * self.deviation
    }
}

impl PartialEq for ProximityInfo {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ProximityInfo {}

impl PartialOrd for ProximityInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProximityInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score().total_cmp(&other.score())
    }
}
