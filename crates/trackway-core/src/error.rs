//! Error types for the Trackway framework, organized by subsystem:
//! registry mutation and configuration validation.
//!
//! Faults in track-type hooks are absent: they are caught at the call
//! boundary and never surface as errors to registry or lookup callers.
//! Only a panic while a descriptor is being built can, through
//! `RegistryError::Construction`.

use std::error::Error;
use std::fmt;

/// Errors from registry mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The descriptor is already active in a registry.
    AlreadyRegistered {
        /// Name of the descriptor.
        name: String,
    },
    /// The none-descriptor can neither be registered nor unregistered.
    NoneDescriptor,
    /// The descriptor was registered as non-removable.
    Pinned {
        /// Name of the descriptor.
        name: String,
    },
    /// The implementation panicked while its name or capabilities were
    /// read.
    Construction {
        /// Who supplied the implementation.
        origin: String,
        /// Panic payload, if it was a string.
        message: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRegistered { name } => {
                write!(f, "track type '{name}' is already registered")
            }
            Self::NoneDescriptor => write!(f, "the none track type cannot be (un)registered"),
            Self::Pinned { name } => write!(f, "track type '{name}' is pinned and cannot be removed"),
            Self::Construction { origin, message } => {
                write!(f, "track type from {origin} faulted during construction: {message}")
            }
        }
    }
}

impl Error for RegistryError {}

/// Errors detected during `TrackConfig::validate()`.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `junction_advance` is NaN, infinite, non-positive, or at least half a cell.
    InvalidJunctionAdvance {
        /// The invalid value.
        value: f64,
    },
    /// `max_cached_cells` is zero.
    ZeroCacheCapacity,
    /// `fault_journal_capacity` is zero.
    ZeroJournalCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJunctionAdvance { value } => {
                write!(f, "junction_advance must be finite and in (0, 0.5), got {value}")
            }
            Self::ZeroCacheCapacity => write!(f, "max_cached_cells must be at least 1"),
            Self::ZeroJournalCapacity => write!(f, "fault_journal_capacity must be at least 1"),
        }
    }
}

impl Error for ConfigError {}
