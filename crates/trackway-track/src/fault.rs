//! Fault isolation around calls into track-type implementations.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use trackway_core::DescriptorId;

use crate::descriptor::{Descriptor, Origin};
use crate::registry::TypeRegistry;
use crate::track_type::TrackType;

/// Record of one caught fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackFault {
    /// Name of the faulting descriptor.
    pub descriptor: String,
    /// Identity of the faulting descriptor.
    pub descriptor_id: DescriptorId,
    /// Who supplied it.
    pub origin: Origin,
    /// The hook that faulted.
    pub hook: &'static str,
    /// Panic payload, if it was a string.
    pub message: String,
    /// Whether the descriptor was unregistered as a result.
    pub disabled: bool,
}

impl fmt::Display for TrackFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "track type '{}' ({}) faulted in {}: {}",
            self.descriptor, self.origin, self.hook, self.message
        )?;
        if self.disabled {
            write!(f, " (disabled)")?;
        }
        Ok(())
    }
}

impl TypeRegistry {
    /// Run `call` against the implementation behind `descriptor`, catching
    /// any panic.
    ///
    /// On a fault the error is logged and journaled, and a descriptor that
    /// is not host-supplied is unregistered. Returns `None` on a fault; the
    /// caller substitutes the hook's default result.
    ///
    /// A descriptor that is not active in this registry is never called:
    /// pieces bound before it was disabled get `None` as well.
    ///
    /// Panics still reach the process panic hook before being caught.
    pub fn guard<R>(
        &self,
        descriptor: &Descriptor,
        hook: &'static str,
        call: impl FnOnce(&dyn TrackType) -> R,
    ) -> Option<R> {
        if !self.is_active(descriptor) {
            return None;
        }
        let imp = descriptor.track_type();
        match catch_unwind(AssertUnwindSafe(|| call(imp))) {
            Ok(value) => Some(value),
            Err(payload) => {
                self.handle_fault(descriptor, hook, panic_message(payload.as_ref()));
                None
            }
        }
    }

    /// Faults recorded so far, oldest first. Bounded by the journal capacity.
    pub fn recent_faults(&self) -> Vec<TrackFault> {
        self.faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    fn handle_fault(&self, descriptor: &Descriptor, hook: &'static str, message: String) {
        // Faults of descriptors not registered here are dropped.
        if !self.contains(descriptor) {
            return;
        }
        let disabled = if descriptor.origin().is_host() {
            false
        } else {
            matches!(self.unregister(descriptor), Ok(true))
        };
        tracing::error!(
            descriptor = descriptor.name(),
            origin = %descriptor.origin(),
            hook,
            disabled,
            "track type faulted: {message}"
        );
        let fault = TrackFault {
            descriptor: descriptor.name().to_owned(),
            descriptor_id: descriptor.id(),
            origin: descriptor.origin().clone(),
            hook,
            message,
            disabled,
        };
        let mut journal = self.faults.lock().unwrap_or_else(|e| e.into_inner());
        if journal.len() == self.journal_capacity {
            journal.pop_front();
        }
        journal.push_back(fault);
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic>".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use trackway_core::{CellData, Face, GridCell};

    struct Bomb;

    impl TrackType for Bomb {
        fn name(&self) -> &str {
            "bomb"
        }

        fn is_track_data(&self, _data: CellData) -> bool {
            panic!("boom")
        }

        fn spawn_location(&self, cell: GridCell, _orientation: Face) -> DVec3 {
            cell.center()
        }
    }

    #[test]
    fn plugin_fault_disables() {
        let reg = TypeRegistry::new();
        let d = Descriptor::new(Bomb, Origin::plugin("demo"));
        reg.register(&d, false).unwrap();
        let out = reg.guard(&d, "is_track_data", |t| t.is_track_data(CellData::AIR));
        assert_eq!(out, None);
        assert!(!reg.contains(&d));
        assert!(!d.is_active());
        let faults = reg.recent_faults();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].message, "boom");
        assert_eq!(faults[0].hook, "is_track_data");
        assert!(faults[0].disabled);
    }

    #[test]
    fn host_fault_is_logged_only() {
        let reg = TypeRegistry::new();
        let d = Descriptor::new(Bomb, Origin::Host);
        reg.register(&d, false).unwrap();
        assert_eq!(reg.guard(&d, "is_track_data", |t| t.is_track_data(CellData::AIR)), None);
        assert!(reg.contains(&d));
        let faults = reg.recent_faults();
        assert_eq!(faults.len(), 1);
        assert!(!faults[0].disabled);
        assert!(faults[0].to_string().contains("host"));
    }

    #[test]
    fn unregistered_descriptor_is_not_called() {
        let reg = TypeRegistry::new();
        let d = Descriptor::new(Bomb, Origin::Unknown);
        let mut called = false;
        let out = reg.guard(&d, "is_track_data", |t| {
            called = true;
            t.is_track_data(CellData::AIR)
        });
        assert_eq!(out, None);
        assert!(!called);
        assert!(reg.recent_faults().is_empty());
    }

    #[test]
    fn disabled_descriptor_is_not_called_again() {
        let reg = TypeRegistry::new();
        let d = Descriptor::new(Bomb, Origin::plugin("demo"));
        reg.register(&d, false).unwrap();
        assert_eq!(reg.guard(&d, "is_track_data", |t| t.is_track_data(CellData::AIR)), None);
        let mut calls = 0;
        for _ in 0..3 {
            let out = reg.guard(&d, "name", |t| {
                calls += 1;
                t.name().len()
            });
            assert_eq!(out, None);
        }
        assert_eq!(calls, 0);
        assert_eq!(reg.recent_faults().len(), 1);
    }

    #[test]
    fn none_descriptor_is_always_callable() {
        let reg = TypeRegistry::new();
        assert_eq!(
            reg.guard(&Descriptor::none(), "is_track_data", |t| t.is_track_data(CellData::AIR)),
            Some(false)
        );
    }

    #[test]
    fn journal_is_bounded() {
        let reg = TypeRegistry::with_journal_capacity(2);
        let d = Descriptor::new(Bomb, Origin::Host);
        reg.register(&d, false).unwrap();
        for hook in ["a", "b", "c"] {
            let _ = reg.guard(&d, hook, |t| t.is_track_data(CellData::AIR));
        }
        let hooks: Vec<_> = reg.recent_faults().iter().map(|f| f.hook).collect();
        assert_eq!(hooks, ["b", "c"]);
    }

    #[test]
    fn success_passes_value_through() {
        let reg = TypeRegistry::new();
        let d = Descriptor::new(Bomb, Origin::Host);
        reg.register(&d, false).unwrap();
        assert_eq!(reg.guard(&d, "name", |t| t.name().len()), Some(4));
    }
}
