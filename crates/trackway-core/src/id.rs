//! Strongly-typed identifiers and the [`GridCell`] coordinate type.

use glam::{DVec3, IVec3};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a world (dimension) that grid cells live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(pub u32);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WorldId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies the material occupying a grid cell (rail, stone, air, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u16);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for MaterialId {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// Opaque identity of a vehicle, forwarded into track hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to a trackside trigger entity owned by a signal source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerHandle(pub u64);

impl fmt::Display for TriggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counter for unique [`DescriptorId`] allocation.
static DESCRIPTOR_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a track-type descriptor.
///
/// Allocated from a monotonic atomic counter via [`DescriptorId::next`].
/// Two descriptors wrapping identical implementations still receive
/// different IDs; descriptor identity is instance identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId(u64);

impl DescriptorId {
    /// Allocate a fresh, unique descriptor ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(DESCRIPTOR_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Edge length (in cells) of a loadable world region, as a bit shift.
pub const REGION_SHIFT: u32 = 4;

/// A column region of 16×16 cells, the unit of world load/unload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionPos {
    /// World the region belongs to.
    pub world: WorldId,
    /// Region x index (`cell.x >> 4`).
    pub x: i32,
    /// Region z index (`cell.z >> 4`).
    pub z: i32,
}

impl RegionPos {
    /// Construct a region position.
    pub const fn new(world: WorldId, x: i32, z: i32) -> Self {
        Self { world, x, z }
    }
}

impl fmt::Display for RegionPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[{}, {}]", self.world, self.x, self.z)
    }
}

/// One voxel position in a world.
///
/// Identity type: two cells are equal iff world and all three integer
/// coordinates are equal. The cell spans `[x, x + 1) × [y, y + 1) × [z, z + 1)`
/// in world space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    /// World the cell belongs to.
    pub world: WorldId,
    /// X coordinate (east is positive).
    pub x: i32,
    /// Y coordinate (up is positive).
    pub y: i32,
    /// Z coordinate (south is positive).
    pub z: i32,
}

impl GridCell {
    /// Construct a cell from its coordinates.
    pub const fn new(world: WorldId, x: i32, y: i32, z: i32) -> Self {
        Self { world, x, y, z }
    }

    /// The cell containing a world-space position.
    pub fn containing(world: WorldId, position: DVec3) -> Self {
        let p = position.floor();
        Self::new(world, p.x as i32, p.y as i32, p.z as i32)
    }

    /// The cell offset by an integer delta.
    pub fn relative(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.world, self.x + dx, self.y + dy, self.z + dz)
    }

    /// The neighbouring cell across `face`. [`Face::Center`](crate::Face::Center)
    /// returns the cell itself.
    pub fn offset(self, face: crate::Face) -> Self {
        let d = face.offset();
        self.relative(d.x, d.y, d.z)
    }

    /// Integer coordinates as a vector.
    pub fn coords(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    /// World-space position of the cell's minimum corner.
    pub fn origin(self) -> DVec3 {
        DVec3::new(self.x as f64, self.y as f64, self.z as f64)
    }

    /// World-space position of the cell's center.
    pub fn center(self) -> DVec3 {
        self.origin() + DVec3::splat(0.5)
    }

    /// The load/unload region containing this cell.
    pub fn region(self) -> RegionPos {
        RegionPos::new(self.world, self.x >> REGION_SHIFT, self.z >> REGION_SHIFT)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:({}, {}, {})", self.world, self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Face;
    use proptest::prelude::*;

    const W: WorldId = WorldId(0);

    #[test]
    fn containing_floors_negative_coordinates() {
        let cell = GridCell::containing(W, DVec3::new(-0.25, 3.99, -7.0));
        assert_eq!(cell, GridCell::new(W, -1, 3, -7));
    }

    #[test]
    fn offset_follows_face_convention() {
        let c = GridCell::new(W, 0, 0, 0);
        assert_eq!(c.offset(Face::North), GridCell::new(W, 0, 0, -1));
        assert_eq!(c.offset(Face::East), GridCell::new(W, 1, 0, 0));
        assert_eq!(c.offset(Face::Down), GridCell::new(W, 0, -1, 0));
        assert_eq!(c.offset(Face::Center), c);
    }

    #[test]
    fn region_of_negative_cell() {
        let c = GridCell::new(W, -1, 64, 17);
        assert_eq!(c.region(), RegionPos::new(W, -1, 1));
    }

    #[test]
    fn descriptor_ids_are_unique() {
        let a = DescriptorId::next();
        let b = DescriptorId::next();
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn center_is_contained(x in -1000i32..1000, y in -64i32..320, z in -1000i32..1000) {
            let cell = GridCell::new(W, x, y, z);
            prop_assert_eq!(GridCell::containing(W, cell.center()), cell);
            prop_assert_eq!(GridCell::containing(W, cell.origin()), cell);
        }
    }
}
