//! Per-cell data as read from the world.

use crate::id::MaterialId;

/// The precomputed content of a single grid cell.
///
/// Simple track types decide membership from this value alone, without
/// a world round-trip. `state` is a material-specific packed value
/// (rail shape, facing, powered bit, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellData {
    /// Material occupying the cell.
    pub material: MaterialId,
    /// Material-specific state bits.
    pub state: u16,
}

impl CellData {
    /// Empty cell.
    pub const AIR: CellData = CellData::new(MaterialId(0), 0);

    /// Construct cell data.
    pub const fn new(material: MaterialId, state: u16) -> Self {
        Self { material, state }
    }

    /// Same material, different state.
    pub const fn with_state(self, state: u16) -> Self {
        Self::new(self.material, state)
    }

    /// Whether the cell is empty.
    pub fn is_air(&self) -> bool {
        self.material == Self::AIR.material
    }
}

impl Default for CellData {
    fn default() -> Self {
        Self::AIR
    }
}
