//! Guarded forwarding of host events into track types.
//!
//! Each forwarder substitutes the hook's default result when the track
//! type faults, so callers never observe a panic.

use glam::DVec3;
use trackway_core::{Face, GridCell, PhysicsEvent, Vehicle};
use trackway_path::TrackAabb;

use crate::descriptor::Descriptor;
use crate::lookup::TrackLookup;
use crate::piece::TrackPiece;
use crate::state::NavigationState;
use crate::track_type::TrackTexture;

/// Result of dispatching a block physics event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhysicsOutcome {
    /// No physics-handling track type claims the cell.
    Ignored,
    /// The event was delivered to this descriptor.
    Handled {
        /// The claiming descriptor.
        descriptor: Descriptor,
    },
    /// The track is no longer supported; the host should break it.
    Unsupported {
        /// The claiming descriptor.
        descriptor: Descriptor,
    },
}

impl TrackLookup {
    /// Deliver a physics event to the first physics-handling descriptor
    /// that claims the cell.
    ///
    /// Descriptors that do not declare
    /// [`with_physics`](crate::Capabilities::with_physics) are never
    /// consulted. Cancelled events are ignored.
    pub fn dispatch_block_physics(&self, event: &mut PhysicsEvent) -> PhysicsOutcome {
        if event.is_cancelled() {
            return PhysicsOutcome::Ignored;
        }
        let world = self.world();
        let registry = self.registry();
        let cell = event.cell;
        let data = world.cell_data(cell);
        let snapshot = registry.active_descriptors();
        let Some(descriptor) = snapshot
            .iter()
            .filter(|d| d.capabilities().handles_physics())
            .find(|d| registry.test_membership(world, d, cell, data))
        else {
            return PhysicsOutcome::Ignored;
        };

        let supported = registry
            .guard(descriptor, "is_rails_supported", |t| t.is_rails_supported(world, cell))
            .unwrap_or(true);
        if !supported {
            self.invalidate_cell(cell);
            return PhysicsOutcome::Unsupported {
                descriptor: descriptor.clone(),
            };
        }
        registry.guard(descriptor, "on_block_physics", |t| t.on_block_physics(world, event));
        PhysicsOutcome::Handled {
            descriptor: descriptor.clone(),
        }
    }

    /// A cell was placed (one tick ago). Drops cache entries around it and
    /// notifies the track type now governing it, if any.
    pub fn dispatch_block_placed(&self, cell: GridCell) -> Option<Descriptor> {
        self.invalidate_cell(cell);
        let descriptor = self.track_type_at(cell);
        if descriptor.is_none() {
            return None;
        }
        let world = self.world();
        self.registry()
            .guard(&descriptor, "on_block_placed", |t| t.on_block_placed(world, cell));
        Some(descriptor)
    }

    /// Forward a pre-move notification.
    pub fn pre_move(&self, piece: &TrackPiece, vehicle: &dyn Vehicle) {
        self.registry()
            .guard(piece.descriptor(), "on_pre_move", |t| t.on_pre_move(vehicle));
    }

    /// Forward a post-move notification.
    pub fn post_move(&self, piece: &TrackPiece, vehicle: &dyn Vehicle) {
        self.registry()
            .guard(piece.descriptor(), "on_post_move", |t| t.on_post_move(vehicle));
    }

    /// Whether the track accepts a collision with `vehicle`. `true` on a fault.
    pub fn collide(&self, piece: &TrackPiece, vehicle: &dyn Vehicle, hit_face: Face) -> bool {
        self.registry()
            .guard(piece.descriptor(), "on_collide", |t| {
                t.on_collide(vehicle, piece.cell(), hit_face)
            })
            .unwrap_or(true)
    }

    /// Whether the track accepts a block collision. `true` on a fault.
    pub fn block_collision(
        &self,
        piece: &TrackPiece,
        vehicle: &dyn Vehicle,
        hit_cell: GridCell,
        hit_face: Face,
    ) -> bool {
        self.registry()
            .guard(piece.descriptor(), "on_block_collision", |t| {
                t.on_block_collision(vehicle, piece.cell(), hit_cell, hit_face)
            })
            .unwrap_or(true)
    }

    /// Whether hitting `hit_cell` stops the vehicle head-on. `false` on a fault.
    pub fn head_on_collision(&self, piece: &TrackPiece, vehicle: &dyn Vehicle, hit_cell: GridCell) -> bool {
        self.registry()
            .guard(piece.descriptor(), "is_head_on_collision", |t| {
                t.is_head_on_collision(vehicle, piece.cell(), hit_cell)
            })
            .unwrap_or(false)
    }

    /// Whether the piece uses block activation.
    pub fn has_block_activation(&self, piece: &TrackPiece) -> bool {
        self.registry()
            .guard(piece.descriptor(), "has_block_activation", |t| {
                t.has_block_activation(piece.cell())
            })
            .unwrap_or(false)
    }

    /// Bounding box of the state's piece; a full block when unbound.
    pub fn bounding_box(&self, state: &NavigationState) -> TrackAabb {
        state
            .piece()
            .and_then(|p| {
                self.registry()
                    .guard(p.descriptor(), "bounding_box", |t| t.bounding_box(state))
            })
            .unwrap_or(TrackAabb::BLOCK)
    }

    /// Whether the piece is mounted upside-down.
    pub fn upside_down(&self, piece: &TrackPiece) -> bool {
        let world = self.world();
        self.registry()
            .guard(piece.descriptor(), "is_upside_down", |t| {
                t.is_upside_down(world, piece.cell())
            })
            .unwrap_or(false)
    }

    /// Editor texture hint; empty on a fault.
    pub fn texture(&self, piece: &TrackPiece) -> TrackTexture {
        self.registry()
            .guard(piece.descriptor(), "texture", |t| t.texture(piece.cell()))
            .unwrap_or_default()
    }

    /// Where a vehicle placed on the piece appears. `None` on a fault.
    pub fn spawn_location(&self, piece: &TrackPiece, orientation: Face) -> Option<DVec3> {
        self.registry()
            .guard(piece.descriptor(), "spawn_location", |t| {
                t.spawn_location(piece.cell(), orientation)
            })
    }

    /// Travel directions activating a signal at `sign_cell`. All sides on a
    /// fault.
    pub fn sign_trigger_directions(
        &self,
        piece: &TrackPiece,
        sign_cell: GridCell,
        sign_facing: Face,
    ) -> &'static [Face] {
        self.registry()
            .guard(piece.descriptor(), "sign_trigger_directions", |t| {
                t.sign_trigger_directions(piece.cell(), sign_cell, sign_facing)
            })
            .unwrap_or(&Face::SIDES)
    }
}
