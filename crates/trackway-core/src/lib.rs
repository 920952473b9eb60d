//! Core types and traits for the Trackway track resolution framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Trackway workspace:
//! grid cells and identifiers, block faces, cell data, error types, and
//! the traits through which external collaborators (world access, signal
//! sources, vehicles) are consumed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod event;
pub mod face;
pub mod id;
pub mod traits;

pub use cell::CellData;
pub use error::{ConfigError, RegistryError};
pub use event::PhysicsEvent;
pub use face::Face;
pub use id::{DescriptorId, GridCell, MaterialId, RegionPos, TriggerHandle, VehicleId, WorldId};
pub use traits::{SignalSource, TriggerSite, Vehicle, WorldAccess};
