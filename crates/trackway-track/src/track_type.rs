//! The [`TrackType`] trait: the pluggable contract for one kind of track.

use std::sync::Arc;

use glam::DVec3;
use smallvec::{smallvec, SmallVec};
use trackway_core::{CellData, Face, GridCell, PhysicsEvent, SignalSource, Vehicle, WorldAccess};
use trackway_path::TrackAabb;

use crate::capability::Capabilities;
use crate::junction::{self, Junction};
use crate::logic::{air_logic, TrackLogic};
use crate::lookup::TrackLookup;
use crate::piece::TrackPiece;
use crate::signal::{self, SignalTrigger};
use crate::state::NavigationState;

/// Editor texture hint for a track piece.
///
/// Opaque to the core: a list of `(face, texture name)` pairs the editor
/// may render. Empty by default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackTexture {
    faces: Vec<(Face, String)>,
}

impl TrackTexture {
    /// Add a texture for a face.
    pub fn with_face(mut self, face: Face, texture: impl Into<String>) -> Self {
        self.faces.push((face, texture.into()));
        self
    }

    /// All `(face, texture)` pairs, in insertion order.
    pub fn faces(&self) -> &[(Face, String)] {
        &self.faces
    }

    /// Whether no texture is set.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// One kind of track behavior.
///
/// Implement the two required methods ([`is_track_data`](Self::is_track_data)
/// and [`spawn_location`](Self::spawn_location)) plus whichever hooks the
/// track customizes; everything else has a default. Implementations that
/// override [`is_track_at`](Self::is_track_at), or the physics hooks, must say
/// so through [`capabilities`](Self::capabilities).
///
/// # Fault isolation
///
/// Implementations may come from untrusted plugins. Every hook is invoked
/// through [`TypeRegistry::guard`](crate::TypeRegistry::guard); a panic is
/// caught, logged, and (for non-host origins) disables the descriptor.
/// Once disabled, a descriptor is never called again, even through pieces
/// bound before the fault.
///
/// [`name`](Self::name) and [`capabilities`](Self::capabilities) are read
/// once, when the descriptor is built; only
/// [`Descriptor::try_new`](crate::Descriptor::try_new) guards them.
///
/// # Examples
///
/// ```
/// use glam::DVec3;
/// use trackway_core::{CellData, Face, GridCell, MaterialId};
/// use trackway_track::TrackType;
///
/// struct Plank;
///
/// impl TrackType for Plank {
///     fn name(&self) -> &str { "plank" }
///
///     fn is_track_data(&self, data: CellData) -> bool {
///         data.material == MaterialId(42)
///     }
///
///     fn spawn_location(&self, cell: GridCell, _orientation: Face) -> DVec3 {
///         cell.center()
///     }
/// }
///
/// assert!(Plank.is_track_data(CellData::new(MaterialId(42), 0)));
/// assert!(!Plank.capabilities().needs_world_context());
/// ```
pub trait TrackType: Send + Sync + 'static {
    /// Human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// Optional behaviors this track type customizes. Read once, when the
    /// descriptor is constructed.
    ///
    /// Default: [`Capabilities::SIMPLE`].
    fn capabilities(&self) -> Capabilities {
        Capabilities::SIMPLE
    }

    /// Membership test from precomputed cell data.
    fn is_track_data(&self, data: CellData) -> bool;

    /// Membership test with full world context. Only consulted when
    /// [`Capabilities::needs_world_context`] is declared.
    ///
    /// Default: reads the cell and calls [`is_track_data`](Self::is_track_data).
    fn is_track_at(&self, world: &dyn WorldAccess, cell: GridCell) -> bool {
        self.is_track_data(world.cell_data(cell))
    }

    /// Cells that may hold a piece of this type governing a vehicle whose
    /// position lies in `position`. Tracks a vehicle hovers over (or hangs
    /// from) return the neighbouring cell here.
    ///
    /// Cached results are invalidated automatically for cells within one
    /// cell of an edit, or in the edited cell's column.
    ///
    /// Default: the position cell itself.
    fn track_cells(&self, _world: &dyn WorldAccess, position: GridCell) -> SmallVec<[GridCell; 2]> {
        smallvec![position]
    }

    /// Movement logic for a state bound to a piece of this type.
    ///
    /// Default: [`air_logic`] (an empty path).
    fn logic(&self, _state: &NavigationState, _world: &dyn WorldAccess) -> Arc<dyn TrackLogic> {
        air_logic()
    }

    /// Bounding box used to derive the enter direction.
    ///
    /// Default: [`TrackAabb::BLOCK`].
    fn bounding_box(&self, _state: &NavigationState) -> TrackAabb {
        TrackAabb::BLOCK
    }

    /// Branches out of a piece.
    ///
    /// Default: the two ends of the path obtained for a downward probe,
    /// labelled `"1"` and `"2"`; nothing for an empty path.
    fn junctions(&self, lookup: &TrackLookup, piece: &TrackPiece) -> Vec<Junction> {
        junction::default_junctions(self, lookup, piece)
    }

    /// The state reached by leaving `piece` through `junction`, or `None`
    /// if there is no track there (or only `piece` itself).
    fn take_junction(
        &self,
        lookup: &TrackLookup,
        piece: &TrackPiece,
        junction: &Junction,
    ) -> Option<NavigationState> {
        junction::default_take_junction(lookup, piece, junction)
    }

    /// Change which junction is active for later traversals.
    ///
    /// Default: no-op.
    fn switch_junction(
        &self,
        _world: &dyn WorldAccess,
        _cell: GridCell,
        _from: &Junction,
        _to: &Junction,
    ) {
    }

    /// Direction to walk from [`sign_column_start`](Self::sign_column_start)
    /// when looking for signals. `None` or [`Face::Center`] disables discovery.
    ///
    /// Default: `None`.
    fn sign_column_direction(&self, _cell: GridCell) -> Option<Face> {
        None
    }

    /// First cell of the signal column.
    ///
    /// Default: the track cell.
    fn sign_column_start(&self, cell: GridCell) -> Option<GridCell> {
        Some(cell)
    }

    /// Travel directions that activate a signal, unless the signal itself
    /// overrides them.
    ///
    /// Default: all six sides.
    fn sign_trigger_directions(
        &self,
        _track_cell: GridCell,
        _sign_cell: GridCell,
        _sign_facing: Face,
    ) -> &'static [Face] {
        &Face::SIDES
    }

    /// Collect the signals activated by vehicles on `piece`.
    ///
    /// Default: walks the sign column (see [`signal::default_discover_signs`]).
    /// Overrides may push virtual triggers that have no world entity.
    fn discover_signs(
        &self,
        lookup: &TrackLookup,
        piece: &TrackPiece,
        signals: &dyn SignalSource,
        out: &mut Vec<SignalTrigger>,
    ) {
        signal::default_discover_signs(self, lookup, piece, signals, out);
    }

    /// Where a vehicle placed on this track at `cell` appears, in world
    /// coordinates.
    fn spawn_location(&self, cell: GridCell, orientation: Face) -> DVec3;

    /// Whether the track at `cell` is still supported. Unsupported track is
    /// broken by the host. Requires [`Capabilities::with_physics`].
    ///
    /// Default: `true`.
    fn is_rails_supported(&self, _world: &dyn WorldAccess, _cell: GridCell) -> bool {
        true
    }

    /// Called one tick after a cell of this type was placed.
    fn on_block_placed(&self, _world: &dyn WorldAccess, _cell: GridCell) {}

    /// Block physics at a cell of this type. Requires
    /// [`Capabilities::with_physics`].
    fn on_block_physics(&self, _world: &dyn WorldAccess, _event: &mut PhysicsEvent) {}

    /// Called right before a vehicle on this track moves.
    fn on_pre_move(&self, _vehicle: &dyn Vehicle) {}

    /// Called right after a vehicle on this track moved.
    fn on_post_move(&self, _vehicle: &dyn Vehicle) {}

    /// A vehicle collided with the track at `cell`. Return `false` to
    /// refuse the collision.
    ///
    /// Default: `true`.
    fn on_collide(&self, _vehicle: &dyn Vehicle, _cell: GridCell, _hit_face: Face) -> bool {
        true
    }

    /// A vehicle on this track hit a block. Return `false` to refuse the
    /// collision.
    ///
    /// Default: `true`.
    fn on_block_collision(
        &self,
        _vehicle: &dyn Vehicle,
        _track_cell: GridCell,
        _hit_cell: GridCell,
        _hit_face: Face,
    ) -> bool {
        true
    }

    /// Whether a vehicle hit a block head-on and must stop.
    ///
    /// Default: `false`.
    fn is_head_on_collision(
        &self,
        _vehicle: &dyn Vehicle,
        _track_cell: GridCell,
        _hit_cell: GridCell,
    ) -> bool {
        false
    }

    /// Whether the track uses block activation (detector plates and the
    /// like) as part of movement.
    ///
    /// Default: `false`.
    fn has_block_activation(&self, _cell: GridCell) -> bool {
        false
    }

    /// Whether the track at `cell` is mounted upside-down.
    ///
    /// Default: `false`.
    fn is_upside_down(&self, _world: &dyn WorldAccess, _cell: GridCell) -> bool {
        false
    }

    /// Editor texture hint.
    fn texture(&self, _cell: GridCell) -> TrackTexture {
        TrackTexture::default()
    }
}
