//! The mutable navigation state of a vehicle moving over track.

use std::fmt;
use std::sync::Arc;

use glam::DVec3;
use trackway_core::{Face, GridCell, VehicleId, WorldId};
use trackway_path::TrackPosition;

use crate::descriptor::Descriptor;
use crate::logic::TrackLogic;
use crate::piece::TrackPiece;

/// Where a vehicle is, how it moves, and which piece governs it.
///
/// Resolution ([`TrackLookup::resolve`](crate::TrackLookup::resolve))
/// rewrites the position to absolute coordinates, initializes the enter
/// face, and binds a piece. The logic of the bound piece is cached on the
/// state and dropped whenever the piece changes.
#[derive(Clone)]
pub struct NavigationState {
    world: WorldId,
    piece: Option<TrackPiece>,
    position: TrackPosition,
    enter_face: Face,
    vehicle: Option<VehicleId>,
    logic: Option<Arc<dyn TrackLogic>>,
}

impl NavigationState {
    /// An empty state in `world`: origin, no motion, no piece.
    pub fn new(world: WorldId) -> Self {
        Self {
            world,
            piece: None,
            position: TrackPosition::default(),
            enter_face: Face::Center,
            vehicle: None,
            logic: None,
        }
    }

    /// A state at an absolute world position with the given motion.
    pub fn at(world: WorldId, position: DVec3, motion: DVec3) -> Self {
        let mut state = Self::new(world);
        state.position = TrackPosition::absolute(position, motion);
        state
    }

    /// A state bound to `piece`, positioned at the piece's cell origin.
    pub fn for_piece(piece: TrackPiece) -> Self {
        let mut state = Self::new(piece.world());
        state.position = TrackPosition::relative(DVec3::ZERO, DVec3::ZERO);
        state.piece = Some(piece);
        state
    }

    /// World the state lives in.
    pub fn world(&self) -> WorldId {
        self.world
    }

    /// The bound piece, if any.
    pub fn piece(&self) -> Option<&TrackPiece> {
        self.piece.as_ref()
    }

    /// Bind (or clear) the piece. Drops cached logic.
    pub fn set_piece(&mut self, piece: Option<TrackPiece>) {
        if let Some(p) = &piece {
            self.world = p.world();
        }
        self.piece = piece;
        self.logic = None;
    }

    /// Descriptor of the bound piece, or [`Descriptor::none`].
    pub fn track_type(&self) -> Descriptor {
        self.piece
            .as_ref()
            .map_or_else(Descriptor::none, |p| p.descriptor().clone())
    }

    /// Cell of the bound piece.
    pub fn track_cell(&self) -> Option<GridCell> {
        self.piece.as_ref().map(TrackPiece::cell)
    }

    /// Current position.
    pub fn position(&self) -> &TrackPosition {
        &self.position
    }

    /// Mutable position.
    pub fn position_mut(&mut self) -> &mut TrackPosition {
        &mut self.position
    }

    /// Replace the position.
    pub fn set_position(&mut self, position: TrackPosition) {
        self.position = position;
    }

    /// Current motion vector.
    pub fn motion(&self) -> DVec3 {
        self.position.motion
    }

    /// Replace the motion vector.
    pub fn set_motion(&mut self, motion: DVec3) {
        self.position.motion = motion;
    }

    /// Point the motion along a face.
    pub fn set_motion_face(&mut self, face: Face) {
        self.position.set_motion_face(face);
    }

    /// Convert the position to world coordinates, using the bound piece's
    /// cell as the reference for a relative position.
    ///
    /// Returns `false` if the position is relative and no piece is bound.
    pub fn make_position_absolute(&mut self) -> bool {
        if self.position.is_absolute() {
            return true;
        }
        match self.track_cell() {
            Some(cell) => {
                self.position.make_absolute(cell);
                true
            }
            None => false,
        }
    }

    /// Cell containing the (absolute) position.
    pub fn position_cell(&self) -> GridCell {
        self.position.cell(self.world)
    }

    /// Position relative to the bound piece's cell, or to the position's
    /// own cell when no piece is bound.
    pub fn rail_position(&self) -> TrackPosition {
        if !self.position.is_absolute() {
            return self.position;
        }
        let cell = self.track_cell().unwrap_or_else(|| self.position_cell());
        self.position.to_relative(cell)
    }

    /// Face through which the vehicle entered the current piece.
    pub fn enter_face(&self) -> Face {
        self.enter_face
    }

    /// Override the enter face.
    pub fn set_enter_face(&mut self, face: Face) {
        self.enter_face = face;
    }

    /// The vehicle this state belongs to, if any.
    pub fn vehicle(&self) -> Option<VehicleId> {
        self.vehicle
    }

    /// Attach a vehicle.
    pub fn set_vehicle(&mut self, vehicle: Option<VehicleId>) {
        self.vehicle = vehicle;
    }

    /// Logic cached for the currently bound piece.
    pub fn cached_logic(&self) -> Option<&Arc<dyn TrackLogic>> {
        self.logic.as_ref()
    }

    pub(crate) fn set_cached_logic(&mut self, logic: Option<Arc<dyn TrackLogic>>) {
        self.logic = logic;
    }
}

impl fmt::Debug for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationState")
            .field("world", &self.world)
            .field("piece", &self.piece)
            .field("position", &self.position)
            .field("enter_face", &self.enter_face)
            .field("vehicle", &self.vehicle)
            .field("has_logic", &self.logic.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: WorldId = WorldId(1);

    #[test]
    fn relative_position_needs_a_piece() {
        let mut s = NavigationState::new(W);
        s.set_position(TrackPosition::relative(DVec3::splat(0.5), DVec3::X));
        assert!(!s.make_position_absolute());
        assert!(!s.position().is_absolute());
    }

    #[test]
    fn rail_position_falls_back_to_position_cell() {
        let s = NavigationState::at(W, DVec3::new(3.25, 1.5, -0.75), DVec3::X);
        let rel = s.rail_position();
        assert!(!rel.is_absolute());
        assert!((rel.position - DVec3::new(0.25, 0.5, 0.25)).length() < 1e-12);
        assert_eq!(s.position_cell(), GridCell::new(W, 3, 1, -1));
    }

    #[test]
    fn unbound_state_reports_none_type() {
        let s = NavigationState::new(W);
        assert!(s.track_type().is_none());
        assert_eq!(s.track_cell(), None);
    }
}
