//! Tuning knobs for lookup, junction traversal, and fault handling.

use trackway_core::ConfigError;

/// Configuration shared by a [`TrackLookup`](crate::TrackLookup) and the
/// default hook implementations it drives.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackConfig {
    /// Emit a back-facet trigger for every discovered signal, in addition
    /// to the front facet. Default: `true`.
    pub dual_facet_triggers: bool,
    /// Distance a junction exit position is nudged along its motion before
    /// resolving the next piece. Default: `1e-4`.
    pub junction_advance: f64,
    /// Cached cells per world before that world's cache is flushed.
    /// Default: 65536.
    pub max_cached_cells: usize,
    /// Number of recent faults kept for inspection. Default: 32.
    pub fault_journal_capacity: usize,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            dual_facet_triggers: true,
            junction_advance: 1e-4,
            max_cached_cells: 65_536,
            fault_journal_capacity: 32,
        }
    }
}

impl TrackConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Must leave the current cell without skipping the next one.
        let a = self.junction_advance;
        if !a.is_finite() || a <= 0.0 || a >= 0.5 {
            return Err(ConfigError::InvalidJunctionAdvance { value: a });
        }
        if self.max_cached_cells == 0 {
            return Err(ConfigError::ZeroCacheCapacity);
        }
        if self.fault_journal_capacity == 0 {
            return Err(ConfigError::ZeroJournalCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(TrackConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_junction_advance() {
        for value in [0.0, -1e-3, 0.5, f64::NAN, f64::INFINITY] {
            let cfg = TrackConfig {
                junction_advance: value,
                ..TrackConfig::default()
            };
            match cfg.validate() {
                Err(ConfigError::InvalidJunctionAdvance { .. }) => {}
                other => panic!("expected InvalidJunctionAdvance for {value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_zero_capacities() {
        let cfg = TrackConfig {
            max_cached_cells: 0,
            ..TrackConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCacheCapacity));
        let cfg = TrackConfig {
            fault_journal_capacity: 0,
            ..TrackConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroJournalCapacity));
    }
}
