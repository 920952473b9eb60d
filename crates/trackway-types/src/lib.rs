//! Built-in track types for the Trackway framework.
//!
//! - [`RegularTrack`]: plain and detector rails in ten [`RailShape`]s,
//!   with face-named junctions that can be switched.
//! - [`VerticalTrack`]: rails climbing a solid wall.
//!
//! [`register_builtins`] installs all of them into a
//! [`TypeRegistry`](trackway_track::TypeRegistry).

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod builtins;
pub mod materials;
pub mod regular;
pub mod shape;
pub mod vertical;

pub use builtins::{builtin_track_types, register_builtins, BuiltinEntry};
pub use regular::RegularTrack;
pub use shape::{RailShape, RAIL_HEIGHT};
pub use vertical::VerticalTrack;
