//! Phase handles and the artifacts they produced.
//!
//! Phases themselves (what they run, when they run) belong to the build
//! graph. This crate only needs their identity: to look up results and to
//! recover the name a project registered a phase under.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::util::types::{TypeInfo, Typed};

static NEXT_PHASE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a build phase.
///
/// Clones share identity. Two handles created separately are never equal,
/// even with the same label.
#[derive(Clone)]
pub struct PhaseHandle {
    inner: Arc<PhaseIdentity>,
}

struct PhaseIdentity {
    id: u64,
    label: Option<String>,
}

impl PhaseHandle {
    /// Create a new, unique phase identity.
    pub fn new() -> Self {
        PhaseHandle {
            inner: Arc::new(PhaseIdentity {
                id: NEXT_PHASE_ID.fetch_add(1, Ordering::Relaxed),
                label: None,
            }),
        }
    }

    /// Create a new phase identity with a label used only for logging.
    pub fn labeled(label: impl Into<String>) -> Self {
        PhaseHandle {
            inner: Arc::new(PhaseIdentity {
                id: NEXT_PHASE_ID.fetch_add(1, Ordering::Relaxed),
                label: Some(label.into()),
            }),
        }
    }

    /// Numeric identity.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Optional label.
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }
}

impl Default for PhaseHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PhaseHandle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for PhaseHandle {}

impl Hash for PhaseHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for PhaseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => write!(f, "Phase#{}({})", self.id(), label),
            None => write!(f, "Phase#{}", self.id()),
        }
    }
}

impl Typed for PhaseHandle {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<PhaseHandle>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Artifacts produced by phases, keyed by phase identity.
///
/// Stored in the context under `_results` by whoever runs the phases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseResults {
    entries: Vec<(PhaseHandle, Vec<PathBuf>)>,
}

impl PhaseResults {
    /// Create an empty result set.
    pub fn new() -> Self {
        PhaseResults::default()
    }

    /// Record artifacts for a phase, appending to any already recorded.
    pub fn add(
        &mut self,
        phase: &PhaseHandle,
        artifacts: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) {
        let artifacts = artifacts.into_iter().map(Into::into);
        match self.entries.iter().position(|(p, _)| p == phase) {
            Some(index) => self.entries[index].1.extend(artifacts),
            None => self.entries.push((phase.clone(), artifacts.collect())),
        }
    }

    /// Artifacts recorded for a phase.
    pub fn get(&self, phase: &PhaseHandle) -> Option<&[PathBuf]> {
        self.entries
            .iter()
            .find(|(p, _)| p == phase)
            .map(|(_, artifacts)| artifacts.as_slice())
    }

    /// Whether any phase has results.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(phase, artifacts)` in recording order.
    pub fn iter(&self) -> impl Iterator<Item = (&PhaseHandle, &[PathBuf])> {
        self.entries.iter().map(|(p, a)| (p, a.as_slice()))
    }

    /// Merge `other` into `self`; entries from `other` append.
    pub fn merge(&mut self, other: &PhaseResults) {
        for (phase, artifacts) in other.iter() {
            self.add(phase, artifacts.iter().cloned());
        }
    }
}
