//! Per-world lookup cache and the path resolver.
//!
//! [`TrackLookup`] answers "which piece governs a vehicle at this
//! position". Candidate pieces per cell are cached; the cache of a world
//! is discarded whenever the registry generation changes, when the world
//! is dropped, or when a region containing cached cells is (un)loaded.
//!
//! When several candidates exist, each candidate's movement logic is
//! evaluated once and the candidate whose path is nearest the vehicle
//! (and best aligned with its motion) wins.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;

use glam::DVec3;
use indexmap::IndexMap;
use smallvec::SmallVec;
use trackway_core::{CellData, ConfigError, Face, GridCell, RegionPos, WorldAccess, WorldId};
use trackway_path::{ProximityInfo, TrackAabb};

use crate::config::TrackConfig;
use crate::descriptor::Descriptor;
use crate::logic::{air_logic, TrackLogic};
use crate::piece::TrackPiece;
use crate::registry::TypeRegistry;
use crate::state::NavigationState;

type Candidates = SmallVec<[TrackPiece; 2]>;

/// Counters describing cache behavior since construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LookupStats {
    /// Candidate lookups answered from the cache.
    pub hits: u64,
    /// Candidate lookups that queried the registry.
    pub misses: u64,
    /// Times cached entries were discarded.
    pub invalidations: u64,
}

struct WorldCache {
    generation: u64,
    cells: HashMap<GridCell, Candidates>,
}

impl WorldCache {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            cells: HashMap::new(),
        }
    }
}

/// Resolves track pieces for positions in the worlds behind one
/// [`WorldAccess`].
///
/// Single-threaded: the cache uses interior mutability and the lookup is
/// not `Sync`. Share the [`TypeRegistry`] between threads, not the lookup.
///
/// Cache entries are never returned for a registry generation other than
/// the one they were computed under.
pub struct TrackLookup {
    registry: Arc<TypeRegistry>,
    world: Arc<dyn WorldAccess>,
    config: TrackConfig,
    cache: RefCell<IndexMap<WorldId, WorldCache>>,
    stats: Cell<LookupStats>,
}

impl TrackLookup {
    /// Build a lookup over `world`, resolving against `registry`.
    pub fn new(
        registry: Arc<TypeRegistry>,
        world: Arc<dyn WorldAccess>,
        config: TrackConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry,
            world,
            config,
            cache: RefCell::new(IndexMap::new()),
            stats: Cell::new(LookupStats::default()),
        })
    }

    /// The registry resolved against.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The world content.
    pub fn world(&self) -> &dyn WorldAccess {
        self.world.as_ref()
    }

    /// The configuration in effect.
    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// Cache counters.
    pub fn stats(&self) -> LookupStats {
        self.stats.get()
    }

    fn bump(&self, f: impl FnOnce(&mut LookupStats)) {
        let mut s = self.stats.get();
        f(&mut s);
        self.stats.set(s);
    }

    /// Pieces that may govern a vehicle positioned in `cell`, in registry
    /// priority order.
    pub fn candidates(&self, cell: GridCell) -> SmallVec<[TrackPiece; 2]> {
        let generation = self.registry.generation();
        {
            let mut cache = self.cache.borrow_mut();
            let wc = cache
                .entry(cell.world)
                .or_insert_with(|| WorldCache::new(generation));
            if wc.generation != generation {
                if !wc.cells.is_empty() {
                    tracing::debug!(world = %cell.world, generation, "registry changed, dropping lookup cache");
                    self.bump(|s| s.invalidations += 1);
                }
                wc.cells.clear();
                wc.generation = generation;
            }
            if let Some(hit) = wc.cells.get(&cell) {
                self.bump(|s| s.hits += 1);
                return hit.clone();
            }
        }
        self.bump(|s| s.misses += 1);

        // No cache borrow is held while track types run: they may call back
        // into this lookup.
        let found = self.compute_candidates(cell);

        if self.registry.generation() == generation {
            let mut cache = self.cache.borrow_mut();
            if let Some(wc) = cache.get_mut(&cell.world) {
                if wc.generation == generation {
                    if wc.cells.len() >= self.config.max_cached_cells {
                        wc.cells.clear();
                        self.bump(|s| s.invalidations += 1);
                    }
                    tracing::trace!(%cell, count = found.len(), "cached track candidates");
                    wc.cells.insert(cell, found.clone());
                }
            }
        }
        found
    }

    fn compute_candidates(&self, cell: GridCell) -> Candidates {
        let world = self.world();
        let snapshot = self.registry.active_descriptors();
        let mut data: SmallVec<[(GridCell, CellData); 4]> = SmallVec::new();
        let mut found = Candidates::new();
        for d in snapshot.iter() {
            let Some(cells) = self.registry.guard(d, "track_cells", |t| t.track_cells(world, cell))
            else {
                continue;
            };
            for c in cells {
                let cd = match data.iter().find(|(k, _)| *k == c) {
                    Some(&(_, cd)) => cd,
                    None => {
                        let cd = world.cell_data(c);
                        data.push((c, cd));
                        cd
                    }
                };
                if self.registry.test_membership(world, d, c, cd) {
                    let piece = TrackPiece::new(d.clone(), c);
                    if !found.contains(&piece) {
                        found.push(piece);
                    }
                }
            }
        }
        // A descriptor may have faulted (and been removed) mid-scan.
        found.retain(|p| p.is_active());
        found
    }

    /// Resolve the piece governing `state`, bind it, and return it.
    ///
    /// The position is made absolute and the enter face initialized first.
    /// With no candidate the state is unbound; with one it is bound without
    /// evaluating any logic; with several, each candidate's logic is
    /// evaluated exactly once and the nearest path wins (earliest candidate
    /// on a tie). The winner's logic stays cached on the state.
    pub fn resolve(&self, state: &mut NavigationState) -> Option<TrackPiece> {
        if !state.make_position_absolute() {
            tracing::warn!(world = %state.world(), "relative position without a track piece, cannot resolve");
            state.set_piece(None);
            return None;
        }
        self.init_enter_direction(state);

        let mut candidates = self.candidates(state.position_cell());
        match candidates.len() {
            0 => {
                state.set_piece(None);
                None
            }
            1 => {
                let piece = candidates.pop();
                state.set_piece(piece.clone());
                piece
            }
            _ => {
                let mut best: Option<(ProximityInfo, TrackPiece, Arc<dyn TrackLogic>)> = None;
                for piece in candidates {
                    if !piece.is_active() {
                        continue;
                    }
                    state.set_piece(Some(piece.clone()));
                    let Some(logic) = self.try_load_logic(state) else {
                        continue;
                    };
                    let rel = state.rail_position();
                    let info = logic.path().proximity(rel.position, rel.motion);
                    if best.as_ref().is_none_or(|(b, _, _)| info < *b) {
                        best = Some((info, piece, logic));
                    }
                }
                match best {
                    Some((_, piece, logic)) => {
                        state.set_piece(Some(piece.clone()));
                        state.set_cached_logic(Some(logic));
                        Some(piece)
                    }
                    None => {
                        state.set_piece(None);
                        None
                    }
                }
            }
        }
    }

    /// Derive the enter face from the current piece's bounding box (a full
    /// block when unbound or bound to a disabled piece), falling back to the
    /// dominant motion axis.
    pub fn init_enter_direction(&self, state: &mut NavigationState) {
        let rel = state.rail_position();
        let aabb = match state.piece().filter(|p| p.is_active()) {
            Some(p) => self.registry.guard(p.descriptor(), "bounding_box", |t| t.bounding_box(state)),
            None => Some(TrackAabb::BLOCK),
        };
        let face = match aabb {
            Some(aabb) => aabb.enter_face(rel.position, rel.motion),
            None => Face::from_motion(rel.motion),
        };
        state.set_enter_face(face);
    }

    /// Movement logic of the bound piece, evaluated once and cached on the
    /// state. Air logic when unbound or when the track type faults.
    pub fn load_logic(&self, state: &mut NavigationState) -> Arc<dyn TrackLogic> {
        match self.try_load_logic(state) {
            Some(logic) => logic,
            None => {
                let air = air_logic();
                state.set_cached_logic(Some(air.clone()));
                air
            }
        }
    }

    /// Like [`load_logic`](Self::load_logic), but `None` when unbound, when
    /// the piece is no longer active, or on a fault.
    pub fn try_load_logic(&self, state: &mut NavigationState) -> Option<Arc<dyn TrackLogic>> {
        if let Some(logic) = state.cached_logic() {
            return Some(logic.clone());
        }
        let descriptor = state.piece().filter(|p| p.is_active())?.descriptor().clone();
        let world = self.world();
        let logic = self
            .registry
            .guard(&descriptor, "logic", |t| t.logic(state, world))?;
        state.set_cached_logic(Some(logic.clone()));
        Some(logic)
    }

    /// Resolve the piece at an absolute world position, ignoring motion.
    pub fn find_piece(&self, world: WorldId, position: DVec3) -> Option<TrackPiece> {
        let mut state = NavigationState::at(world, position, DVec3::ZERO);
        self.resolve(&mut state)
    }

    /// The first registered descriptor claiming `cell` itself, or
    /// [`Descriptor::none`]. Not cached.
    pub fn track_type_at(&self, cell: GridCell) -> Descriptor {
        let world = self.world();
        self.registry.match_cell(world, cell, world.cell_data(cell))
    }

    /// Drop cached entries around a cell whose content changed: every
    /// entry keyed within one cell of it, every entry listing it as a
    /// candidate, and every empty entry in its vertical column.
    ///
    /// Empty entries elsewhere survive, so a [`track_cells`] reaching
    /// sideways further than one cell needs an explicit
    /// [`invalidate_world`](Self::invalidate_world) after edits.
    ///
    /// [`track_cells`]: crate::TrackType::track_cells
    pub fn invalidate_cell(&self, cell: GridCell) {
        let mut cache = self.cache.borrow_mut();
        let Some(wc) = cache.get_mut(&cell.world) else {
            return;
        };
        let before = wc.cells.len();
        wc.cells.retain(|key, pieces| {
            let d = key.coords() - cell.coords();
            if d.abs().max_element() <= 1 {
                return false;
            }
            if pieces.is_empty() {
                return d.x != 0 || d.z != 0;
            }
            pieces.iter().all(|p| p.cell() != cell)
        });
        if wc.cells.len() != before {
            self.bump(|s| s.invalidations += 1);
        }
    }

    /// A region was loaded: cached misses around it may now be wrong.
    pub fn on_region_loaded(&self, region: RegionPos) {
        self.invalidate_region(region);
    }

    /// A region was unloaded: forget everything cached in it.
    pub fn on_region_unloaded(&self, region: RegionPos) {
        self.invalidate_region(region);
    }

    fn invalidate_region(&self, region: RegionPos) {
        let mut cache = self.cache.borrow_mut();
        let Some(wc) = cache.get_mut(&region.world) else {
            return;
        };
        let before = wc.cells.len();
        wc.cells.retain(|key, pieces| {
            key.region() != region && pieces.iter().all(|p| p.cell().region() != region)
        });
        let dropped = before - wc.cells.len();
        if dropped > 0 {
            tracing::debug!(world = %region.world, x = region.x, z = region.z, dropped, "dropped cached cells for region");
            self.bump(|s| s.invalidations += 1);
        }
    }

    /// Forget everything cached for one world.
    pub fn invalidate_world(&self, world: WorldId) {
        if self.cache.borrow_mut().shift_remove(&world).is_some() {
            self.bump(|s| s.invalidations += 1);
        }
    }

    /// Forget everything.
    pub fn clear(&self) {
        let mut cache = self.cache.borrow_mut();
        if !cache.is_empty() {
            cache.clear();
            self.bump(|s| s.invalidations += 1);
        }
    }

    /// Number of cells cached for `world`.
    pub fn cached_cells(&self, world: WorldId) -> usize {
        self.cache.borrow().get(&world).map_or(0, |wc| wc.cells.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Origin;
    use crate::track_type::TrackType;
    use trackway_core::MaterialId;

    const W: WorldId = WorldId(0);
    const RAIL: MaterialId = MaterialId(7);

    /// Rails along the x axis at y = 0.
    struct Line;

    impl WorldAccess for Line {
        fn cell_data(&self, cell: GridCell) -> CellData {
            if cell.y == 0 && cell.z == 0 {
                CellData::new(RAIL, 0)
            } else {
                CellData::AIR
            }
        }

        fn set_cell_data(&self, _cell: GridCell, _data: CellData) -> bool {
            false
        }
    }

    struct Plain;

    impl TrackType for Plain {
        fn name(&self) -> &str {
            "plain"
        }

        fn is_track_data(&self, data: CellData) -> bool {
            data.material == RAIL
        }

        fn spawn_location(&self, cell: GridCell, _orientation: Face) -> DVec3 {
            cell.center()
        }
    }

    fn setup() -> (Arc<TypeRegistry>, TrackLookup, Descriptor) {
        let reg = Arc::new(TypeRegistry::new());
        let d = Descriptor::new(Plain, Origin::Host);
        reg.register(&d, false).unwrap();
        let lookup = TrackLookup::new(reg.clone(), Arc::new(Line), TrackConfig::default()).unwrap();
        (reg, lookup, d)
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = TrackConfig {
            max_cached_cells: 0,
            ..TrackConfig::default()
        };
        assert!(TrackLookup::new(Arc::new(TypeRegistry::new()), Arc::new(Line), cfg).is_err());
    }

    #[test]
    fn second_lookup_hits_cache() {
        let (_, lookup, d) = setup();
        let cell = GridCell::new(W, 3, 0, 0);
        let first = lookup.candidates(cell);
        assert_eq!(first.as_slice(), &[TrackPiece::new(d, cell)]);
        let second = lookup.candidates(cell);
        assert_eq!(first, second);
        assert_eq!(lookup.stats().hits, 1);
        assert_eq!(lookup.stats().misses, 1);
    }

    #[test]
    fn registry_change_discards_cache() {
        let (reg, lookup, d) = setup();
        let cell = GridCell::new(W, 3, 0, 0);
        assert_eq!(lookup.candidates(cell).len(), 1);
        reg.unregister(&d).unwrap();
        assert!(lookup.candidates(cell).is_empty());
        assert_eq!(lookup.stats().invalidations, 1);
    }

    #[test]
    fn capacity_flushes_world() {
        let reg = Arc::new(TypeRegistry::new());
        let cfg = TrackConfig {
            max_cached_cells: 2,
            ..TrackConfig::default()
        };
        let lookup = TrackLookup::new(reg, Arc::new(Line), cfg).unwrap();
        for x in 0..3 {
            lookup.candidates(GridCell::new(W, x, 0, 0));
        }
        assert_eq!(lookup.cached_cells(W), 1);
    }

    #[test]
    fn region_unload_drops_only_that_region() {
        let (_, lookup, _) = setup();
        let inside = GridCell::new(W, 1, 0, 0);
        let outside = GridCell::new(W, 40, 0, 0);
        lookup.candidates(inside);
        lookup.candidates(outside);
        lookup.on_region_unloaded(inside.region());
        assert_eq!(lookup.cached_cells(W), 1);
        lookup.candidates(outside);
        assert_eq!(lookup.stats().hits, 1);
    }

    #[test]
    fn invalidate_cell_drops_neighbours() {
        let (_, lookup, _) = setup();
        for x in 0..5 {
            lookup.candidates(GridCell::new(W, x, 0, 0));
        }
        lookup.invalidate_cell(GridCell::new(W, 2, 0, 0));
        assert_eq!(lookup.cached_cells(W), 2);
    }

    #[test]
    fn invalidate_cell_drops_empty_entries_in_its_column() {
        let (_, lookup, _) = setup();
        for cell in [
            GridCell::new(W, 2, 3, 0),
            GridCell::new(W, 2, -2, 0),
            GridCell::new(W, 4, 3, 0),
            GridCell::new(W, 2, 5, 0),
        ] {
            assert!(lookup.candidates(cell).is_empty());
        }
        lookup.invalidate_cell(GridCell::new(W, 2, 0, 0));
        assert_eq!(lookup.cached_cells(W), 1);
        let before = lookup.stats().hits;
        lookup.candidates(GridCell::new(W, 4, 3, 0));
        assert_eq!(lookup.stats().hits, before + 1);
    }

    #[test]
    fn resolve_binds_single_candidate_and_finds_enter_face() {
        let (_, lookup, d) = setup();
        let mut state = NavigationState::at(W, DVec3::new(2.5, 0.1, 0.5), DVec3::X);
        let piece = lookup.resolve(&mut state).unwrap();
        assert_eq!(piece.descriptor(), &d);
        assert_eq!(piece.cell(), GridCell::new(W, 2, 0, 0));
        assert_eq!(state.enter_face(), Face::East);
        // Single candidate: no logic evaluated.
        assert!(state.cached_logic().is_none());
    }

    #[test]
    fn resolve_off_track_unbinds() {
        let (_, lookup, _) = setup();
        let mut state = NavigationState::at(W, DVec3::new(2.5, 5.0, 0.5), DVec3::X);
        assert!(lookup.resolve(&mut state).is_none());
        assert!(state.piece().is_none());
        assert!(lookup.load_logic(&mut state).path().is_empty());
    }

    #[test]
    fn track_type_at_is_uncached() {
        let (_, lookup, d) = setup();
        assert_eq!(lookup.track_type_at(GridCell::new(W, 9, 0, 0)), d);
        assert!(lookup.track_type_at(GridCell::new(W, 9, 1, 0)).is_none());
        assert_eq!(lookup.cached_cells(W), 0);
    }
}
