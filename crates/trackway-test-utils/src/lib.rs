//! Test utilities and mock types for Trackway development.
//!
//! Provides mock implementations of the collaborator traits
//! ([`WorldAccess`], [`SignalSource`], [`Vehicle`]) plus reusable track
//! types in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use trackway_core::{
    CellData, Face, GridCell, RegionPos, SignalSource, TriggerHandle, TriggerSite, Vehicle,
    VehicleId, WorldAccess,
};

/// Mock implementation of [`WorldAccess`].
///
/// Backed by a `HashMap<GridCell, CellData>`; unset cells read as air.
/// Mutable through `&self` so a world already shared with a lookup can
/// still be edited by the test.
#[derive(Default)]
pub struct MockWorld {
    cells: RefCell<HashMap<GridCell, CellData>>,
    unloaded: RefCell<HashSet<RegionPos>>,
    writes: Cell<usize>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data of a cell.
    pub fn set(&self, cell: GridCell, data: CellData) {
        self.cells.borrow_mut().insert(cell, data);
    }

    /// Reset a cell to air.
    pub fn clear(&self, cell: GridCell) {
        self.cells.borrow_mut().remove(&cell);
    }

    /// Data of a cell as stored, without going through [`WorldAccess`].
    pub fn get(&self, cell: GridCell) -> CellData {
        self.cells.borrow().get(&cell).copied().unwrap_or(CellData::AIR)
    }

    /// Mark a region unloaded: its cells read as air and refuse writes.
    pub fn unload(&self, region: RegionPos) {
        self.unloaded.borrow_mut().insert(region);
    }

    /// Mark a region loaded again.
    pub fn load(&self, region: RegionPos) {
        self.unloaded.borrow_mut().remove(&region);
    }

    /// Number of successful writes through [`WorldAccess::set_cell_data`].
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl WorldAccess for MockWorld {
    fn cell_data(&self, cell: GridCell) -> CellData {
        if !self.is_region_loaded(cell.region()) {
            return CellData::AIR;
        }
        self.get(cell)
    }

    fn set_cell_data(&self, cell: GridCell, data: CellData) -> bool {
        if !self.is_region_loaded(cell.region()) {
            return false;
        }
        self.set(cell, data);
        self.writes.set(self.writes.get() + 1);
        true
    }

    fn is_region_loaded(&self, region: RegionPos) -> bool {
        !self.unloaded.borrow().contains(&region)
    }
}

/// Mock implementation of [`SignalSource`].
///
/// Triggers are placed per cell. A column walk visits consecutive cells
/// and stops at the first cell without a trigger, or after `max_depth`
/// cells.
pub struct MockSignals {
    triggers: HashMap<GridCell, (TriggerHandle, Face)>,
    max_depth: usize,
    walks: Cell<usize>,
}

impl MockSignals {
    pub fn new() -> Self {
        Self {
            triggers: HashMap::new(),
            max_depth: 8,
            walks: Cell::new(0),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Place a trigger with handle `handle` facing `facing` at `cell`.
    pub fn place(&mut self, cell: GridCell, handle: u64, facing: Face) {
        self.triggers.insert(cell, (TriggerHandle(handle), facing));
    }

    /// Number of column walks performed.
    pub fn walk_count(&self) -> usize {
        self.walks.get()
    }
}

impl Default for MockSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for MockSignals {
    fn for_each_trigger_in_column(
        &self,
        start: GridCell,
        direction: Face,
        visit: &mut dyn FnMut(TriggerSite),
    ) {
        self.walks.set(self.walks.get() + 1);
        let mut cell = start;
        for _ in 0..self.max_depth {
            let Some(&(handle, facing)) = self.triggers.get(&cell) else {
                break;
            };
            visit(TriggerSite {
                handle,
                cell,
                facing,
            });
            cell = cell.offset(direction);
        }
    }
}

/// Mock implementation of [`Vehicle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockVehicle(pub VehicleId);

impl MockVehicle {
    pub fn new(id: u64) -> Self {
        Self(VehicleId(id))
    }
}

impl Vehicle for MockVehicle {
    fn vehicle_id(&self) -> VehicleId {
        self.0
    }
}
