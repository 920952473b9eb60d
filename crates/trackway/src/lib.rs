//! Trackway: pluggable track-type resolution for vehicles moving through
//! voxel worlds.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Trackway sub-crates. For most users, adding `trackway` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::{Arc, Mutex};
//!
//! use trackway::prelude::*;
//! use trackway::types::{materials, RailShape};
//!
//! // A tiny world: a map from cells to their data.
//! #[derive(Default)]
//! struct World(Mutex<HashMap<GridCell, CellData>>);
//!
//! impl WorldAccess for World {
//!     fn cell_data(&self, cell: GridCell) -> CellData {
//!         self.0.lock().unwrap().get(&cell).copied().unwrap_or(CellData::AIR)
//!     }
//!     fn set_cell_data(&self, cell: GridCell, data: CellData) -> bool {
//!         self.0.lock().unwrap().insert(cell, data);
//!         true
//!     }
//! }
//!
//! let w = WorldId(0);
//! let world = Arc::new(World::default());
//! for x in 0..3 {
//!     let rail = CellData::new(materials::RAIL, RailShape::EastWest.state());
//!     world.set_cell_data(GridCell::new(w, x, 0, 0), rail);
//! }
//!
//! let registry = Arc::new(TypeRegistry::new());
//! trackway::types::register_builtins(&registry).unwrap();
//! let lookup = TrackLookup::new(registry, world, TrackConfig::default()).unwrap();
//!
//! let piece = lookup.find_piece(w, glam::DVec3::new(0.5, 0.1, 0.5)).unwrap();
//! let east = lookup
//!     .junctions(&piece)
//!     .into_iter()
//!     .find(|j| j.name() == "east")
//!     .unwrap();
//! let next = lookup.take_junction(&piece, &east).unwrap();
//! assert_eq!(next.track_cell(), Some(GridCell::new(w, 1, 0, 0)));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `trackway-core` | Grid cells, faces, IDs, errors, collaborator traits |
//! | [`path`] | `trackway-path` | Positions, movement paths, proximity, bounding boxes |
//! | [`track`] | `trackway-track` | Track-type trait, registry, lookup, junctions, signals |
//! | [`types`] | `trackway-types` | Built-in regular, detector, and vertical rails |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid cells, faces, IDs, and collaborator traits (`trackway-core`).
///
/// Hosts implement [`core::WorldAccess`], [`core::SignalSource`], and
/// [`core::Vehicle`] to plug their world into the resolver.
pub use trackway_core as core;

/// Geometry (`trackway-path`).
///
/// [`path::MovementPath`] and its proximity metric drive disambiguation
/// between overlapping track pieces.
pub use trackway_path as path;

/// Track types and resolution (`trackway-track`).
///
/// The [`track::TrackType`] trait is the main extension point; the
/// [`track::TypeRegistry`] holds active types and [`track::TrackLookup`]
/// resolves them against a world.
pub use trackway_track as track;

/// Built-in track types (`trackway-types`).
pub use trackway_types as types;

/// Common imports for typical Trackway usage.
///
/// ```rust
/// use trackway::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use trackway_core::{
        CellData, Face, GridCell, MaterialId, PhysicsEvent, SignalSource, Vehicle, VehicleId,
        WorldAccess, WorldId,
    };

    // Errors
    pub use trackway_core::{ConfigError, RegistryError};

    // Geometry
    pub use trackway_path::{MovementPath, TrackAabb, TrackPosition};

    // Track types and resolution
    pub use trackway_track::{
        Capabilities, Descriptor, Junction, NavigationState, Origin, PathLogic, PhysicsOutcome,
        SignalTrigger, TrackConfig, TrackLogic, TrackLookup, TrackPiece, TrackType, TypeRegistry,
    };
}
