//! Traits through which external collaborators are consumed.
//!
//! The track core never owns world storage, trigger entities, or
//! vehicles. It reads and writes through these narrow interfaces.

use crate::cell::CellData;
use crate::face::Face;
use crate::id::{GridCell, RegionPos, TriggerHandle, VehicleId};

/// Read/write access to voxel world content.
///
/// Implementations may span several worlds; the world is part of every
/// [`GridCell`]. Writes take `&self` because world storage is shared with
/// the host and mutated through interior mutability.
pub trait WorldAccess {
    /// Read the data of a cell. Unloaded or out-of-range cells read as
    /// [`CellData::AIR`].
    fn cell_data(&self, cell: GridCell) -> CellData;

    /// Overwrite the data of a cell.
    ///
    /// Returns `false` if the write was refused (unloaded region,
    /// read-only world).
    fn set_cell_data(&self, cell: GridCell, data: CellData) -> bool;

    /// Whether a region is currently loaded.
    ///
    /// Default: every region is loaded.
    fn is_region_loaded(&self, region: RegionPos) -> bool {
        let _ = region;
        true
    }
}

/// A trigger entity encountered while walking a column of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TriggerSite {
    /// Handle owned by the signal source.
    pub handle: TriggerHandle,
    /// Cell the trigger occupies.
    pub cell: GridCell,
    /// Direction the trigger faces.
    pub facing: Face,
}

/// Source of trackside trigger entities.
pub trait SignalSource {
    /// Walk from `start` along `direction`, invoking `visit` for every
    /// trigger encountered, in walk order.
    ///
    /// How far the walk extends is up to the source.
    fn for_each_trigger_in_column(
        &self,
        start: GridCell,
        direction: Face,
        visit: &mut dyn FnMut(TriggerSite),
    );
}

/// A vehicle (or one member of a vehicle group).
///
/// The core never inspects vehicles. It forwards the reference into
/// track hooks unchanged.
pub trait Vehicle {
    /// Opaque identity of the vehicle.
    fn vehicle_id(&self) -> VehicleId;
}
