//! Capability flags a track type declares about itself.

/// Optional behaviors a track type customizes.
///
/// Declared once through [`TrackType::capabilities`](crate::TrackType::capabilities)
/// and frozen into the [`Descriptor`](crate::Descriptor) at construction. The
/// flags gate two optimizations:
///
/// - Without `world_context`, membership is decided from precomputed
///   [`CellData`](trackway_core::CellData) alone, with no world round-trip.
/// - Without `handles_physics`, the descriptor is skipped entirely when
///   block physics events are dispatched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities {
    world_context: bool,
    handles_physics: bool,
}

impl Capabilities {
    /// Cell-data membership test, no physics handling.
    pub const SIMPLE: Capabilities = Capabilities {
        world_context: false,
        handles_physics: false,
    };

    /// Same as [`Capabilities::SIMPLE`].
    pub const fn simple() -> Self {
        Self::SIMPLE
    }

    /// Declare that membership needs the full world, not just the cell's data
    /// (the track type overrides `is_track_at`).
    pub const fn with_world_context(mut self) -> Self {
        self.world_context = true;
        self
    }

    /// Declare that the track type overrides `on_block_physics` or
    /// `is_rails_supported`.
    pub const fn with_physics(mut self) -> Self {
        self.handles_physics = true;
        self
    }

    /// Whether membership testing needs the world ("complex" track type).
    pub const fn needs_world_context(self) -> bool {
        self.world_context
    }

    /// Whether physics events must be dispatched to this track type.
    pub const fn handles_physics(self) -> bool {
        self.handles_physics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_flags_independently() {
        let c = Capabilities::simple();
        assert!(!c.needs_world_context());
        assert!(!c.handles_physics());
        let c = c.with_physics();
        assert!(c.handles_physics());
        assert!(!c.needs_world_context());
        let c = Capabilities::SIMPLE.with_world_context();
        assert!(c.needs_world_context());
        assert!(!c.handles_physics());
    }
}
