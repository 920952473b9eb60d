//! Material identifiers understood by the built-in track types.

use trackway_core::{CellData, MaterialId};

/// Empty cell.
pub const AIR: MaterialId = CellData::AIR.material;
/// Generic solid block.
pub const STONE: MaterialId = MaterialId(1);
/// Wooden planks, solid.
pub const PLANKS: MaterialId = MaterialId(5);
/// Detector rail: a regular rail that reports block activation.
pub const DETECTOR_RAIL: MaterialId = MaterialId(28);
/// Vertical rail mounted against a wall. State bits 0-1 select the wall.
pub const VERTICAL_RAIL: MaterialId = MaterialId(65);
/// Regular rail. State holds the [`RailShape`](crate::RailShape).
pub const RAIL: MaterialId = MaterialId(66);

/// Whether a material is a rail of any kind.
pub fn is_rail(material: MaterialId) -> bool {
    matches!(material, RAIL | DETECTOR_RAIL | VERTICAL_RAIL)
}

/// Whether a material can support a rail or hold a vertical rail.
pub fn is_solid(material: MaterialId) -> bool {
    material != AIR && !is_rail(material)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rails_and_air_are_not_solid() {
        assert!(is_solid(STONE));
        assert!(is_solid(PLANKS));
        assert!(!is_solid(AIR));
        assert!(!is_solid(RAIL));
        assert!(!is_solid(VERTICAL_RAIL));
    }
}
