use alloc::collections::BTreeMap;

use crate::{any::SharedAny, instantiator::ErasedInstantiator, key::ContractKey};

/// When a constructed instance may be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    /// One shared instance for the life of the container.
    Singleton,
    /// A new instance per resolution.
    Transient,
}

/// Construction strategy stored for a contract key.
#[derive(Clone)]
pub(crate) enum Registration {
    /// Pre-built value pinned at registration time, always a singleton.
    Instance(SharedAny),
    /// Deferred construction with the given lifecycle. Zero-dependency
    /// factories and dependency-injecting constructors both land here.
    Instantiator(ErasedInstantiator, Lifecycle),
}

pub(crate) struct Registry {
    entries: BTreeMap<ContractKey, Registration>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Stores an entry for the key, replacing any previous one.
    #[inline]
    pub(crate) fn insert(&mut self, key: ContractKey, registration: Registration) -> Option<Registration> {
        self.entries.insert(key, registration)
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, key: &ContractKey) -> Option<Registration> {
        self.entries.get(key).cloned()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
