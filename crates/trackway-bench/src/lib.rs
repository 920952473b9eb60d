//! Benchmark profiles and utilities for the Trackway framework.
//!
//! - [`GridWorld`]: a dense, read-only square of rails on stone
//! - [`rail_grid_profile`]: a lookup over a [`GridWorld`] with the built-in
//!   track types registered
//! - [`query_positions`]: deterministic vehicle positions over the grid

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use glam::DVec3;
use trackway_core::{CellData, GridCell, WorldAccess, WorldId};
use trackway_track::{TrackConfig, TrackLookup, TypeRegistry};
use trackway_types::materials::{RAIL, STONE};
use trackway_types::RailShape;

/// World used by every profile.
pub const BENCH_WORLD: WorldId = WorldId(0);

/// A `size` x `size` square of east-west rails at y = 0 on a stone floor.
///
/// Every fourth row (z % 4 == 3) is left empty so lookups also exercise
/// misses.
pub struct GridWorld {
    size: i32,
}

impl GridWorld {
    /// A grid with `size` cells per side.
    pub fn new(size: i32) -> Self {
        Self { size }
    }

    fn in_bounds(&self, cell: GridCell) -> bool {
        cell.world == BENCH_WORLD
            && (0..self.size).contains(&cell.x)
            && (0..self.size).contains(&cell.z)
    }
}

impl WorldAccess for GridWorld {
    fn cell_data(&self, cell: GridCell) -> CellData {
        if !self.in_bounds(cell) {
            return CellData::AIR;
        }
        match cell.y {
            -1 => CellData::new(STONE, 0),
            0 if cell.z % 4 != 3 => CellData::new(RAIL, RailShape::EastWest.state()),
            _ => CellData::AIR,
        }
    }

    fn set_cell_data(&self, _cell: GridCell, _data: CellData) -> bool {
        false
    }
}

/// A lookup over a [`GridWorld`] of the given size, with the built-in track
/// types registered.
pub fn rail_grid_profile(size: i32, config: TrackConfig) -> TrackLookup {
    let registry = Arc::new(TypeRegistry::from_config(&config));
    trackway_types::register_builtins(&registry).expect("fresh registry accepts builtins");
    TrackLookup::new(registry, Arc::new(GridWorld::new(size)), config)
        .expect("benchmark config is valid")
}

/// `n` deterministic positions just above the rail plane of a `size` grid.
pub fn query_positions(n: u64, size: i32) -> Vec<DVec3> {
    let size = size as u64;
    (0..n)
        .map(|i| {
            let x = i.wrapping_mul(6364136223846793007) % (size * 16);
            let z = i.wrapping_mul(1442695040888963407) % (size * 16);
            DVec3::new(x as f64 / 16.0, 0.1, z as f64 / 16.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_resolves_rails_and_misses_gaps() {
        let lookup = rail_grid_profile(8, TrackConfig::default());
        assert!(lookup.find_piece(BENCH_WORLD, DVec3::new(2.5, 0.1, 0.5)).is_some());
        assert!(lookup.find_piece(BENCH_WORLD, DVec3::new(2.5, 0.1, 3.5)).is_none());
    }

    #[test]
    fn query_positions_are_in_bounds() {
        for p in query_positions(500, 10) {
            assert!((0.0..10.0).contains(&p.x));
            assert!((0.0..10.0).contains(&p.z));
        }
    }
}
