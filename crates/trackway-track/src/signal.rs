//! Discovery of trackside signals activated by a piece.

use trackway_core::{Face, SignalSource, TriggerHandle, TriggerSite};

use crate::lookup::TrackLookup;
use crate::piece::TrackPiece;
use crate::track_type::TrackType;

/// Which side of a trigger was discovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facet {
    /// The face the trigger points at.
    Front,
    /// The opposite face.
    Back,
}

/// Where a trigger comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriggerSource {
    /// A trigger entity in the world.
    World(TriggerSite),
    /// A trigger with no world entity, supplied by a track type.
    Virtual {
        /// Free-form label for the trigger.
        label: String,
    },
}

/// One signal trigger activated by vehicles on a piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalTrigger {
    source: TriggerSource,
    facet: Facet,
    piece: TrackPiece,
    directions: &'static [Face],
}

impl SignalTrigger {
    /// A trigger backed by a world entity.
    pub fn real(site: TriggerSite, facet: Facet, piece: TrackPiece, directions: &'static [Face]) -> Self {
        Self {
            source: TriggerSource::World(site),
            facet,
            piece,
            directions,
        }
    }

    /// A trigger with no world entity. Activated from any side.
    pub fn virtual_trigger(label: impl Into<String>, piece: TrackPiece) -> Self {
        Self {
            source: TriggerSource::Virtual {
                label: label.into(),
            },
            facet: Facet::Front,
            piece,
            directions: &Face::SIDES,
        }
    }

    /// Origin of the trigger.
    pub fn source(&self) -> &TriggerSource {
        &self.source
    }

    /// Which facet this is.
    pub fn facet(&self) -> Facet {
        self.facet
    }

    /// The piece the trigger belongs to.
    pub fn piece(&self) -> &TrackPiece {
        &self.piece
    }

    /// Travel directions that activate the trigger.
    pub fn directions(&self) -> &'static [Face] {
        self.directions
    }

    /// World entity handle, for real triggers.
    pub fn handle(&self) -> Option<TriggerHandle> {
        match &self.source {
            TriggerSource::World(site) => Some(site.handle),
            TriggerSource::Virtual { .. } => None,
        }
    }

    /// Whether a vehicle moving along `motion` activates the trigger.
    pub fn is_triggered_by(&self, motion: Face) -> bool {
        self.directions.contains(&motion)
    }
}

/// Walk the track type's sign column and report every trigger on it,
/// front facet first and (with
/// [`dual_facet_triggers`](crate::TrackConfig::dual_facet_triggers)) back
/// facet second. The back facet's trigger directions are computed for the
/// reversed facing.
///
/// Nothing is discovered when the track type reports no column start, no
/// direction, or [`Face::Center`].
pub fn default_discover_signs<T>(
    track: &T,
    lookup: &TrackLookup,
    piece: &TrackPiece,
    signals: &dyn SignalSource,
    out: &mut Vec<SignalTrigger>,
) where
    T: TrackType + ?Sized,
{
    let cell = piece.cell();
    let Some(start) = track.sign_column_start(cell) else {
        return;
    };
    let direction = match track.sign_column_direction(cell) {
        None | Some(Face::Center) => return,
        Some(direction) => direction,
    };
    let dual = lookup.config().dual_facet_triggers;
    signals.for_each_trigger_in_column(start, direction, &mut |site: TriggerSite| {
        let front = track.sign_trigger_directions(cell, site.cell, site.facing);
        out.push(SignalTrigger::real(site, Facet::Front, piece.clone(), front));
        if dual {
            let back = track.sign_trigger_directions(cell, site.cell, site.facing.opposite());
            out.push(SignalTrigger::real(site, Facet::Back, piece.clone(), back));
        }
    });
}

impl TrackLookup {
    /// Signals activated by vehicles on `piece`. Empty if the track type
    /// faults, even if some triggers were found before the fault.
    pub fn discover_signs(&self, piece: &TrackPiece, signals: &dyn SignalSource) -> Vec<SignalTrigger> {
        self.registry()
            .guard(piece.descriptor(), "discover_signs", |t| {
                let mut out = Vec::new();
                t.discover_signs(self, piece, signals, &mut out);
                out
            })
            .unwrap_or_default()
    }
}
