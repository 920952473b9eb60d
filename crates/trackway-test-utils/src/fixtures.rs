//! Reusable track-type fixtures.
//!
//! - [`FixedPathTrack`]: configurable membership, a fixed path, and call
//!   counters for the hooks tests care about.
//! - [`FaultyTrack`]: panics in one chosen hook.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::DVec3;
use smallvec::{smallvec, SmallVec};
use trackway_core::{CellData, Face, GridCell, MaterialId, PhysicsEvent, Vehicle, WorldAccess};
use trackway_path::{MovementPath, TrackAabb};
use trackway_track::{
    Capabilities, Junction, NavigationState, PathLogic, SignalTrigger, TrackLogic, TrackLookup,
    TrackPiece, TrackType,
};

/// Material used by fixtures that match on cell data.
pub const FIXTURE_RAIL: MaterialId = MaterialId(100);

/// Shared call counters, readable after the track is moved into a
/// descriptor.
#[derive(Clone, Debug, Default)]
pub struct CallCounters {
    pub logic: Arc<AtomicUsize>,
    pub physics: Arc<AtomicUsize>,
    pub placed: Arc<AtomicUsize>,
    pub moves: Arc<AtomicUsize>,
}

impl CallCounters {
    pub fn logic(&self) -> usize {
        self.logic.load(Ordering::SeqCst)
    }

    pub fn physics(&self) -> usize {
        self.physics.load(Ordering::SeqCst)
    }

    pub fn placed(&self) -> usize {
        self.placed.load(Ordering::SeqCst)
    }

    pub fn moves(&self) -> usize {
        self.moves.load(Ordering::SeqCst)
    }
}

/// A track type whose path is the same everywhere.
///
/// Membership is by material ([`FIXTURE_RAIL`] unless overridden), or,
/// after [`at_cells`](Self::at_cells), by an explicit cell set using the
/// world-context capability.
pub struct FixedPathTrack {
    name: String,
    material: MaterialId,
    cells: Option<HashSet<GridCell>>,
    path: MovementPath,
    reach_below: bool,
    supported: Option<bool>,
    sign_direction: Option<Face>,
    sign_start: Option<GridCell>,
    counters: CallCounters,
}

impl FixedPathTrack {
    pub fn new(name: impl Into<String>, path: MovementPath) -> Self {
        Self {
            name: name.into(),
            material: FIXTURE_RAIL,
            cells: None,
            path,
            reach_below: false,
            supported: None,
            sign_direction: None,
            sign_start: None,
            counters: CallCounters::default(),
        }
    }

    /// Straight path along x through the middle of the cell.
    pub fn straight_x(name: impl Into<String>) -> Self {
        Self::new(
            name,
            MovementPath::line(DVec3::new(0.0, 0.0625, 0.5), DVec3::new(1.0, 0.0625, 0.5)),
        )
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = material;
        self
    }

    /// Claim exactly these cells, regardless of cell data.
    pub fn at_cells(mut self, cells: impl IntoIterator<Item = GridCell>) -> Self {
        self.cells = Some(cells.into_iter().collect());
        self
    }

    /// Also govern vehicles positioned one cell above the track.
    pub fn reaching_below(mut self) -> Self {
        self.reach_below = true;
        self
    }

    /// Declare physics handling; `supported` is what `is_rails_supported`
    /// reports.
    pub fn with_physics(mut self, supported: bool) -> Self {
        self.supported = Some(supported);
        self
    }

    pub fn with_sign_column(mut self, direction: Option<Face>) -> Self {
        self.sign_direction = direction;
        self
    }

    /// Start the sign column at a fixed cell instead of the track cell.
    pub fn with_sign_start(mut self, start: GridCell) -> Self {
        self.sign_start = Some(start);
        self
    }

    pub fn counters(&self) -> CallCounters {
        self.counters.clone()
    }
}

impl TrackType for FixedPathTrack {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::SIMPLE;
        if self.cells.is_some() {
            caps = caps.with_world_context();
        }
        if self.supported.is_some() {
            caps = caps.with_physics();
        }
        caps
    }

    fn is_track_data(&self, data: CellData) -> bool {
        data.material == self.material
    }

    fn is_track_at(&self, world: &dyn WorldAccess, cell: GridCell) -> bool {
        match &self.cells {
            Some(cells) => cells.contains(&cell),
            None => self.is_track_data(world.cell_data(cell)),
        }
    }

    fn track_cells(&self, _world: &dyn WorldAccess, position: GridCell) -> SmallVec<[GridCell; 2]> {
        if self.reach_below {
            smallvec![position, position.offset(Face::Down)]
        } else {
            smallvec![position]
        }
    }

    fn logic(&self, _state: &NavigationState, _world: &dyn WorldAccess) -> Arc<dyn TrackLogic> {
        self.counters.logic.fetch_add(1, Ordering::SeqCst);
        PathLogic::shared(self.path.clone())
    }

    fn sign_column_direction(&self, _cell: GridCell) -> Option<Face> {
        self.sign_direction
    }

    fn sign_column_start(&self, cell: GridCell) -> Option<GridCell> {
        Some(self.sign_start.unwrap_or(cell))
    }

    fn spawn_location(&self, cell: GridCell, _orientation: Face) -> DVec3 {
        cell.origin() + DVec3::new(0.5, 0.0625, 0.5)
    }

    fn is_rails_supported(&self, _world: &dyn WorldAccess, _cell: GridCell) -> bool {
        self.supported.unwrap_or(true)
    }

    fn on_block_placed(&self, _world: &dyn WorldAccess, _cell: GridCell) {
        self.counters.placed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_block_physics(&self, _world: &dyn WorldAccess, event: &mut PhysicsEvent) {
        self.counters.physics.fetch_add(1, Ordering::SeqCst);
        event.cancel();
    }

    fn on_pre_move(&self, _vehicle: &dyn Vehicle) {
        self.counters.moves.fetch_add(1, Ordering::SeqCst);
    }

    fn on_post_move(&self, _vehicle: &dyn Vehicle) {
        self.counters.moves.fetch_add(1, Ordering::SeqCst);
    }
}

/// The hook a [`FaultyTrack`] panics in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultyHook {
    Membership,
    TrackCells,
    Logic,
    Junctions,
    DiscoverSigns,
    Collide,
    PreMove,
}

/// Matches [`FIXTURE_RAIL`] cells and panics in one hook.
///
/// `vehicle_calls` counts every entry into the vehicle and geometry hooks
/// (`bounding_box`, `on_pre_move`, `on_post_move`, `on_collide`).
pub struct FaultyTrack {
    pub hook: FaultyHook,
    pub vehicle_calls: Arc<AtomicUsize>,
}

impl FaultyTrack {
    pub fn new(hook: FaultyHook) -> Self {
        Self {
            hook,
            vehicle_calls: Arc::default(),
        }
    }

    /// Handle to the call counter, readable after the track is moved into
    /// a descriptor.
    pub fn vehicle_calls(&self) -> Arc<AtomicUsize> {
        self.vehicle_calls.clone()
    }

    fn maybe_panic(&self, hook: FaultyHook) {
        if self.hook == hook {
            panic!("fixture fault in {hook:?}");
        }
    }
}

impl TrackType for FaultyTrack {
    fn name(&self) -> &str {
        "faulty"
    }

    fn is_track_data(&self, data: CellData) -> bool {
        self.maybe_panic(FaultyHook::Membership);
        data.material == FIXTURE_RAIL
    }

    fn track_cells(&self, _world: &dyn WorldAccess, position: GridCell) -> SmallVec<[GridCell; 2]> {
        self.maybe_panic(FaultyHook::TrackCells);
        smallvec![position]
    }

    fn logic(&self, _state: &NavigationState, _world: &dyn WorldAccess) -> Arc<dyn TrackLogic> {
        self.maybe_panic(FaultyHook::Logic);
        PathLogic::shared(MovementPath::line(DVec3::new(0.5, 0.0, 0.0), DVec3::new(0.5, 0.0, 1.0)))
    }

    fn junctions(&self, lookup: &TrackLookup, piece: &TrackPiece) -> Vec<Junction> {
        self.maybe_panic(FaultyHook::Junctions);
        trackway_track::junction::default_junctions(self, lookup, piece)
    }

    fn sign_column_direction(&self, _cell: GridCell) -> Option<Face> {
        Some(Face::Down)
    }

    fn discover_signs(
        &self,
        lookup: &TrackLookup,
        piece: &TrackPiece,
        signals: &dyn trackway_core::SignalSource,
        out: &mut Vec<SignalTrigger>,
    ) {
        trackway_track::signal::default_discover_signs(self, lookup, piece, signals, out);
        self.maybe_panic(FaultyHook::DiscoverSigns);
    }

    fn spawn_location(&self, cell: GridCell, _orientation: Face) -> DVec3 {
        cell.center()
    }

    fn bounding_box(&self, _state: &NavigationState) -> TrackAabb {
        self.vehicle_calls.fetch_add(1, Ordering::SeqCst);
        TrackAabb::BLOCK
    }

    fn on_pre_move(&self, _vehicle: &dyn Vehicle) {
        self.vehicle_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_panic(FaultyHook::PreMove);
    }

    fn on_post_move(&self, _vehicle: &dyn Vehicle) {
        self.vehicle_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn on_collide(&self, _vehicle: &dyn Vehicle, _cell: GridCell, _hit_face: Face) -> bool {
        self.vehicle_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_panic(FaultyHook::Collide);
        false
    }
}
