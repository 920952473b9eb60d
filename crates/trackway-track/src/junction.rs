//! Junctions: named exits of a piece, and walking between pieces.

use trackway_core::Face;
use trackway_path::TrackPosition;

use crate::lookup::TrackLookup;
use crate::piece::TrackPiece;
use crate::state::NavigationState;
use crate::track_type::TrackType;

/// A named exit from a track piece.
///
/// The position is relative to the piece's cell; its motion points out of
/// the piece.
#[derive(Clone, Debug, PartialEq)]
pub struct Junction {
    name: String,
    position: TrackPosition,
}

impl Junction {
    /// A junction called `name` leaving at `position`.
    pub fn new(name: impl Into<String>, position: TrackPosition) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }

    /// Label, unique within one piece.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exit position and outward motion.
    pub fn position(&self) -> &TrackPosition {
        &self.position
    }
}

/// Junctions `"1"` and `"2"` at the start and end of the path a vehicle
/// dropped onto the piece would follow. Empty when that path is empty.
pub fn default_junctions<T>(track: &T, lookup: &TrackLookup, piece: &TrackPiece) -> Vec<Junction>
where
    T: TrackType + ?Sized,
{
    let cell = piece.cell();
    let mut probe = NavigationState::for_piece(piece.clone());
    probe.set_position(TrackPosition::absolute(
        track.spawn_location(cell, Face::Down),
        Face::Down.direction(),
    ));
    let rel = probe.rail_position();
    let enter = track.bounding_box(&probe).enter_face(rel.position, rel.motion);
    probe.set_enter_face(enter);

    let logic = track.logic(&probe, lookup.world());
    let path = logic.path();
    match (path.start(), path.end()) {
        (Some(start), Some(end)) => vec![Junction::new("1", start), Junction::new("2", end)],
        _ => Vec::new(),
    }
}

/// Step out of `piece` through `junction` and resolve where that lands.
///
/// `None` when nothing resolves there, or when it resolves back to `piece`
/// itself (a junction that loops onto its own piece is not an exit).
pub fn default_take_junction(
    lookup: &TrackLookup,
    piece: &TrackPiece,
    junction: &Junction,
) -> Option<NavigationState> {
    let mut position = *junction.position();
    position.make_absolute(piece.cell());
    position.small_advance(lookup.config().junction_advance);

    let mut state = NavigationState::new(piece.world());
    state.set_position(position);
    let next = lookup.resolve(&mut state)?;
    if next == *piece {
        return None;
    }
    Some(state)
}

impl TrackLookup {
    /// Junctions of `piece`. Empty if the track type faults.
    pub fn junctions(&self, piece: &TrackPiece) -> Vec<Junction> {
        self.registry()
            .guard(piece.descriptor(), "junctions", |t| t.junctions(self, piece))
            .unwrap_or_default()
    }

    /// Leave `piece` through `junction`.
    ///
    /// The result is never bound to `piece` itself, even if a custom
    /// track type returns such a state.
    pub fn take_junction(&self, piece: &TrackPiece, junction: &Junction) -> Option<NavigationState> {
        self.registry()
            .guard(piece.descriptor(), "take_junction", |t| {
                t.take_junction(self, piece, junction)
            })
            .flatten()
            .filter(|state| state.piece().is_some_and(|p| p != piece))
    }

    /// Make `to` the active junction of `piece` instead of `from`.
    pub fn switch_junction(&self, piece: &TrackPiece, from: &Junction, to: &Junction) {
        let world = self.world();
        let switched = self.registry().guard(piece.descriptor(), "switch_junction", |t| {
            t.switch_junction(world, piece.cell(), from, to)
        });
        if switched.is_some() {
            self.invalidate_cell(piece.cell());
        }
    }
}
