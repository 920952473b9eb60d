//! Movement logic produced by a track type for a bound state.

use std::sync::{Arc, LazyLock};

use trackway_path::MovementPath;

/// Movement logic for one navigation state on one piece.
///
/// The core only reads the path; vehicle physics built on top may
/// downcast or extend as needed.
pub trait TrackLogic: Send + Sync {
    /// The path a vehicle follows through the piece, relative to the
    /// piece's cell.
    fn path(&self) -> &MovementPath;
}

/// Logic that is nothing but a fixed path.
#[derive(Clone, Debug, Default)]
pub struct PathLogic {
    path: MovementPath,
}

impl PathLogic {
    /// Logic following `path`.
    pub fn new(path: MovementPath) -> Self {
        Self { path }
    }

    /// Wrap into a shared trait object.
    pub fn shared(path: MovementPath) -> Arc<dyn TrackLogic> {
        Arc::new(Self::new(path))
    }
}

impl TrackLogic for PathLogic {
    fn path(&self) -> &MovementPath {
        &self.path
    }
}

static AIR: LazyLock<Arc<dyn TrackLogic>> = LazyLock::new(|| Arc::new(PathLogic::default()));

/// The logic of "no track": an empty path.
pub fn air_logic() -> Arc<dyn TrackLogic> {
    AIR.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn air_has_empty_path() {
        assert!(air_logic().path().is_empty());
        assert!(Arc::ptr_eq(&air_logic(), &air_logic()));
    }

    #[test]
    fn path_logic_returns_its_path() {
        let path = MovementPath::line(DVec3::ZERO, DVec3::X);
        let logic = PathLogic::shared(path.clone());
        assert_eq!(logic.path(), &path);
    }
}
