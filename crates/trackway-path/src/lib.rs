//! Track geometry for Trackway.
//!
//! This crate defines the geometric vocabulary that track types speak:
//!
//! - [`TrackPosition`]: a position plus motion vector, either world-absolute
//!   or relative to a track cell.
//! - [`MovementPath`]: the traversable polyline through a track piece, with
//!   start/end anchors and a proximity query.
//! - [`ProximityInfo`]: the total order used to pick between candidate
//!   pieces sharing a cell.
//! - [`TrackAabb`]: a track piece's bounding box, used to derive the
//!   direction a vehicle entered the piece from.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod aabb;
pub mod path;
pub mod position;
pub mod proximity;

#[cfg(test)]
pub(crate) mod compliance;

pub use aabb::TrackAabb;
pub use path::MovementPath;
pub use position::TrackPosition;
pub use proximity::{ProximityInfo, ALIGNMENT_WEIGHT};
