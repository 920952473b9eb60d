//! Events forwarded from the host world into track hooks.

use crate::id::GridCell;

/// A block physics update at a cell.
///
/// Dispatched to track types that declare physics handling. A hook may
/// cancel the event to suppress the host's default physics for the cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhysicsEvent {
    /// Cell receiving the physics update.
    pub cell: GridCell,
    /// Neighbouring cell whose change triggered the update, if known.
    pub source: Option<GridCell>,
    cancelled: bool,
}

impl PhysicsEvent {
    /// A fresh, uncancelled event.
    pub fn new(cell: GridCell, source: Option<GridCell>) -> Self {
        Self {
            cell,
            source,
            cancelled: false,
        }
    }

    /// Suppress the host's default handling.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether a hook cancelled the event.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
