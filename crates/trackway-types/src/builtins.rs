//! The table of built-in track types.

use trackway_core::RegistryError;
use trackway_track::{Descriptor, Origin, TypeRegistry};

use crate::regular::RegularTrack;
use crate::vertical::VerticalTrack;

/// One built-in track type and whether it may be unregistered.
#[derive(Clone, Debug)]
pub struct BuiltinEntry {
    /// Host-origin descriptor, pinned unless `removable`.
    pub descriptor: Descriptor,
    /// Whether the descriptor may be unregistered.
    pub removable: bool,
}

impl BuiltinEntry {
    fn new(imp: impl trackway_track::TrackType, removable: bool) -> Self {
        let descriptor = if removable {
            Descriptor::new(imp, Origin::Host)
        } else {
            Descriptor::pinned(imp, Origin::Host)
        };
        Self {
            descriptor,
            removable,
        }
    }
}

/// Fresh descriptors for every built-in track type, in match priority
/// order: vertical (the only one needing world context) first, then the
/// plain rail, then the detector rail.
///
/// The plain rail is the fallback for everything else and cannot be
/// removed.
pub fn builtin_track_types() -> Vec<BuiltinEntry> {
    vec![
        BuiltinEntry::new(VerticalTrack, true),
        BuiltinEntry::new(RegularTrack::plain(), false),
        BuiltinEntry::new(RegularTrack::detector(), true),
    ]
}

/// Register every built-in track type with `registry`, after anything
/// already registered. Returns the registered descriptors.
pub fn register_builtins(registry: &TypeRegistry) -> Result<Vec<Descriptor>, RegistryError> {
    let entries = builtin_track_types();
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        registry.register(&entry.descriptor, false)?;
        out.push(entry.descriptor);
    }
    tracing::debug!(count = out.len(), "registered built-in track types");
    Ok(out)
}
