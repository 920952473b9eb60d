//! Walk a short rail line through its junctions, logging each step.
//!
//! Run with `RUST_LOG=debug` to see registry and cache activity.

use std::sync::Arc;

use glam::DVec3;
use trackway::prelude::*;
use trackway::types::materials::{RAIL, STONE};
use trackway::types::{register_builtins, RailShape};
use trackway_test_utils::MockWorld;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let w = WorldId(0);
    let world = Arc::new(MockWorld::new());
    for x in 0..8 {
        world.set(GridCell::new(w, x, -1, 0), CellData::new(STONE, 0));
        world.set(GridCell::new(w, x, 0, 0), CellData::new(RAIL, RailShape::EastWest.state()));
    }

    let registry = Arc::new(TypeRegistry::new());
    register_builtins(&registry)?;
    let lookup = TrackLookup::new(registry, world, TrackConfig::default())?;

    let mut piece = lookup
        .find_piece(w, DVec3::new(0.5, 0.1, 0.5))
        .ok_or("no track at the origin")?;
    loop {
        tracing::info!(cell = %piece.cell(), track = piece.descriptor().name(), "on track");
        let Some(east) = lookup.junctions(&piece).into_iter().find(|j| j.name() == "east") else {
            break;
        };
        let Some(next) = lookup.take_junction(&piece, &east) else {
            break;
        };
        let Some(next_piece) = next.piece() else {
            break;
        };
        piece = next_piece.clone();
    }

    let stats = lookup.stats();
    tracing::info!(hits = stats.hits, misses = stats.misses, "done");
    Ok(())
}
