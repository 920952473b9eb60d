//! Registry entries: a track-type implementation plus its metadata.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use glam::DVec3;
use trackway_core::{CellData, DescriptorId, Face, GridCell, RegistryError};

use crate::capability::Capabilities;
use crate::fault::panic_message;
use crate::track_type::TrackType;

/// Who supplied a track type.
///
/// Decides what happens when the implementation faults: host-supplied
/// types are only logged, everything else is unregistered.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Built into the host.
    Host,
    /// Supplied by a named plugin.
    Plugin(String),
    /// Origin could not be determined.
    Unknown,
}

impl Origin {
    /// A plugin origin.
    pub fn plugin(name: impl Into<String>) -> Self {
        Self::Plugin(name.into())
    }

    /// Whether this is the host itself.
    pub fn is_host(&self) -> bool {
        matches!(self, Self::Host)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => write!(f, "host"),
            Self::Plugin(name) => write!(f, "plugin {name}"),
            Self::Unknown => write!(f, "unknown plugin"),
        }
    }
}

struct DescriptorInner {
    id: DescriptorId,
    name: String,
    origin: Origin,
    caps: Capabilities,
    pinned: bool,
    active: AtomicBool,
    imp: Box<dyn TrackType>,
}

/// A registered (or registrable) track type.
///
/// Cheap to clone; clones share identity. Equality and hashing are by
/// [`DescriptorId`], so two descriptors wrapping equal implementations are
/// still distinct entries.
///
/// Name and capabilities are captured once at construction and never
/// re-queried from the implementation.
#[derive(Clone)]
pub struct Descriptor(Arc<DescriptorInner>);

static NONE: LazyLock<Descriptor> =
    LazyLock::new(|| Descriptor::build(Box::new(NoneTrack), Origin::Host, true));

impl Descriptor {
    /// Wrap an implementation. The descriptor is inactive until registered.
    ///
    /// `name` and `capabilities` are called directly here; a panic in either
    /// propagates to the caller. Use [`try_new`](Self::try_new) for
    /// untrusted implementations.
    pub fn new(imp: impl TrackType, origin: Origin) -> Self {
        Self::build(Box::new(imp), origin, false)
    }

    /// Wrap an implementation that can never be unregistered once active.
    pub fn pinned(imp: impl TrackType, origin: Origin) -> Self {
        Self::build(Box::new(imp), origin, true)
    }

    /// Like [`new`](Self::new), for implementations that may panic while
    /// reporting their name or capabilities. Those two calls run under
    /// `catch_unwind`; a panic is logged and returned as
    /// [`RegistryError::Construction`].
    pub fn try_new(imp: impl TrackType, origin: Origin) -> Result<Self, RegistryError> {
        let imp: Box<dyn TrackType> = Box::new(imp);
        match catch_unwind(AssertUnwindSafe(|| (imp.name().to_owned(), imp.capabilities()))) {
            Ok((name, caps)) => Ok(Self::assemble(imp, origin, false, name, caps)),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(origin = %origin, "track type faulted during construction: {message}");
                Err(RegistryError::Construction {
                    origin: origin.to_string(),
                    message,
                })
            }
        }
    }

    fn build(imp: Box<dyn TrackType>, origin: Origin, pinned: bool) -> Self {
        let name = imp.name().to_owned();
        let caps = imp.capabilities();
        Self::assemble(imp, origin, pinned, name, caps)
    }

    fn assemble(
        imp: Box<dyn TrackType>,
        origin: Origin,
        pinned: bool,
        name: String,
        caps: Capabilities,
    ) -> Self {
        Self(Arc::new(DescriptorInner {
            id: DescriptorId::next(),
            name,
            origin,
            caps,
            pinned,
            active: AtomicBool::new(false),
            imp,
        }))
    }

    /// The "no track" sentinel. Never matches any cell, never registered.
    pub fn none() -> Descriptor {
        NONE.clone()
    }

    /// Unique identity.
    pub fn id(&self) -> DescriptorId {
        self.0.id
    }

    /// Name captured at construction.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Who supplied the implementation.
    pub fn origin(&self) -> &Origin {
        &self.0.origin
    }

    /// Capabilities captured at construction.
    pub fn capabilities(&self) -> Capabilities {
        self.0.caps
    }

    /// Whether unregistering is refused.
    pub fn is_pinned(&self) -> bool {
        self.0.pinned
    }

    /// Whether this is [`Descriptor::none`].
    pub fn is_none(&self) -> bool {
        self.0.id == NONE.0.id
    }

    /// Whether the descriptor is currently registered. The none-descriptor
    /// always reports active.
    pub fn is_active(&self) -> bool {
        self.is_none() || self.0.active.load(Ordering::Acquire)
    }

    /// Flip the active flag; returns the previous value.
    pub(crate) fn set_active(&self, active: bool) -> bool {
        self.0.active.swap(active, Ordering::AcqRel)
    }

    /// The wrapped implementation.
    ///
    /// Calling hooks directly bypasses fault isolation; prefer the guarded
    /// entry points on [`TypeRegistry`](crate::TypeRegistry) and
    /// [`TrackLookup`](crate::TrackLookup).
    pub fn track_type(&self) -> &dyn TrackType {
        self.0.imp.as_ref()
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Descriptor {}

impl Hash for Descriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .field("origin", &self.0.origin)
            .field("active", &self.is_active())
            .finish()
    }
}

struct NoneTrack;

impl TrackType for NoneTrack {
    fn name(&self) -> &str {
        "none"
    }

    fn is_track_data(&self, _data: CellData) -> bool {
        false
    }

    fn spawn_location(&self, cell: GridCell, _orientation: Face) -> DVec3 {
        cell.center()
    }
}
