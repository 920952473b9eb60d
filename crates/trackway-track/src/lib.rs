//! Track-type registry, lookup cache, and junction graph for Trackway.
//!
//! The [`TrackType`] trait is the extension point: one implementation per
//! kind of track, most hooks optional. Implementations are wrapped in a
//! [`Descriptor`] and registered with a [`TypeRegistry`]. A [`TrackLookup`]
//! resolves which [`TrackPiece`] governs a vehicle at a position, walks
//! junctions between pieces, and discovers trackside signals.
//!
//! Every call into a track type goes through [`TypeRegistry::guard`]: a
//! panicking third-party implementation is logged and disabled instead of
//! taking the simulation down with it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod capability;
pub mod config;
pub mod descriptor;
pub mod fault;
pub mod hooks;
pub mod junction;
pub mod logic;
pub mod lookup;
pub mod piece;
pub mod registry;
pub mod signal;
pub mod state;
pub mod track_type;

pub use capability::Capabilities;
pub use config::TrackConfig;
pub use descriptor::{Descriptor, Origin};
pub use fault::TrackFault;
pub use hooks::PhysicsOutcome;
pub use junction::Junction;
pub use logic::{air_logic, PathLogic, TrackLogic};
pub use lookup::{LookupStats, TrackLookup};
pub use piece::TrackPiece;
pub use registry::TypeRegistry;
pub use signal::{Facet, SignalTrigger, TriggerSource};
pub use state::NavigationState;
pub use track_type::{TrackTexture, TrackType};
