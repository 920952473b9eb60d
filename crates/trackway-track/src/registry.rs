//! The registry of active track types.
//!
//! Readers take a snapshot ([`TypeRegistry::active_descriptors`]) and
//! iterate it without locking; writers build a new list and publish it
//! with a compare-and-swap. A reader therefore sees either the old or the
//! new list in full, never a partial update.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use trackway_core::{CellData, GridCell, RegistryError, WorldAccess};

use crate::config::TrackConfig;
use crate::descriptor::Descriptor;
use crate::fault::TrackFault;

/// Ordered collection of active track-type descriptors.
///
/// Order is match priority: when several descriptors claim a cell, the
/// earliest one wins in [`match_cell`](Self::match_cell). A descriptor is
/// active in at most one registry at a time.
///
/// Every mutation bumps a generation counter; lookup caches compare it to
/// discard stale entries.
pub struct TypeRegistry {
    snapshot: ArcSwap<Vec<Descriptor>>,
    generation: AtomicU64,
    pub(crate) faults: Mutex<VecDeque<TrackFault>>,
    pub(crate) journal_capacity: usize,
}

impl TypeRegistry {
    /// An empty registry with the default fault journal capacity.
    pub fn new() -> Self {
        Self::with_journal_capacity(TrackConfig::default().fault_journal_capacity)
    }

    /// An empty registry keeping at most `capacity` recent faults
    /// (at least one).
    pub fn with_journal_capacity(capacity: usize) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Vec::new()),
            generation: AtomicU64::new(0),
            faults: Mutex::new(VecDeque::new()),
            journal_capacity: capacity.max(1),
        }
    }

    /// An empty registry sized from `config`.
    pub fn from_config(config: &TrackConfig) -> Self {
        Self::with_journal_capacity(config.fault_journal_capacity)
    }

    /// Activate a descriptor.
    ///
    /// With `priority`, the descriptor goes to the front and outranks every
    /// descriptor registered so far; otherwise it is appended.
    pub fn register(&self, descriptor: &Descriptor, priority: bool) -> Result<(), RegistryError> {
        if descriptor.is_none() {
            return Err(RegistryError::NoneDescriptor);
        }
        if descriptor.set_active(true) {
            return Err(RegistryError::AlreadyRegistered {
                name: descriptor.name().to_owned(),
            });
        }
        self.update(|list| {
            if priority {
                list.insert(0, descriptor.clone());
            } else {
                list.push(descriptor.clone());
            }
            true
        });
        tracing::debug!(
            descriptor = descriptor.name(),
            origin = %descriptor.origin(),
            priority,
            "registered track type"
        );
        Ok(())
    }

    /// Deactivate a descriptor.
    ///
    /// Returns `Ok(false)` if it was not registered here. Pinned
    /// descriptors are refused.
    pub fn unregister(&self, descriptor: &Descriptor) -> Result<bool, RegistryError> {
        if descriptor.is_none() {
            return Err(RegistryError::NoneDescriptor);
        }
        if descriptor.is_pinned() && self.contains(descriptor) {
            return Err(RegistryError::Pinned {
                name: descriptor.name().to_owned(),
            });
        }
        let removed = self.update(|list| {
            let before = list.len();
            list.retain(|d| d != descriptor);
            list.len() != before
        });
        if removed {
            descriptor.set_active(false);
            tracing::debug!(descriptor = descriptor.name(), "unregistered track type");
        }
        Ok(removed)
    }

    /// Copy, modify, publish. `edit` returns whether anything changed; an
    /// unchanged list is not republished and the generation stays put.
    fn update(&self, mut edit: impl FnMut(&mut Vec<Descriptor>) -> bool) -> bool {
        loop {
            let cur = self.snapshot.load_full();
            let mut next = (*cur).clone();
            if !edit(&mut next) {
                return false;
            }
            let prev = self.snapshot.compare_and_swap(&cur, Arc::new(next));
            if Arc::ptr_eq(&prev, &cur) {
                self.generation.fetch_add(1, Ordering::AcqRel);
                return true;
            }
        }
    }

    /// Snapshot of the active descriptors, in priority order.
    pub fn active_descriptors(&self) -> Arc<Vec<Descriptor>> {
        self.snapshot.load_full()
    }

    /// Number of active descriptors.
    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    /// Whether no descriptor is active.
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    /// Whether `descriptor` is active in this registry.
    pub fn contains(&self, descriptor: &Descriptor) -> bool {
        self.snapshot.load().iter().any(|d| d == descriptor)
    }

    /// Whether `descriptor` is usable for resolution: the none-descriptor
    /// always is, anything else only while registered here.
    pub fn is_active(&self, descriptor: &Descriptor) -> bool {
        descriptor.is_none() || self.contains(descriptor)
    }

    /// First active descriptor with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<Descriptor> {
        self.snapshot.load().iter().find(|d| d.name() == name).cloned()
    }

    /// Mutation counter. Changes whenever the active list does.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// The descriptor governing `cell`, whose data is `data`: the first
    /// active descriptor that claims it, or [`Descriptor::none`].
    ///
    /// A descriptor that faults while testing is treated as not matching
    /// (and, unless host-supplied, removed).
    pub fn match_cell(&self, world: &dyn WorldAccess, cell: GridCell, data: CellData) -> Descriptor {
        let snapshot = self.active_descriptors();
        snapshot
            .iter()
            .find(|d| self.test_membership(world, d, cell, data))
            .cloned()
            .unwrap_or_else(Descriptor::none)
    }

    /// Guarded membership test of one descriptor.
    ///
    /// Only descriptors declaring
    /// [`needs_world_context`](crate::Capabilities::needs_world_context) see
    /// the world; the rest decide from `data`.
    pub fn test_membership(
        &self,
        world: &dyn WorldAccess,
        descriptor: &Descriptor,
        cell: GridCell,
        data: CellData,
    ) -> bool {
        if descriptor.capabilities().needs_world_context() {
            self.guard(descriptor, "is_track_at", |t| t.is_track_at(world, cell))
        } else {
            self.guard(descriptor, "is_track_data", |t| t.is_track_data(data))
        }
        .unwrap_or(false)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("active", &self.snapshot.load())
            .field("generation", &self.generation())
            .finish()
    }
}
