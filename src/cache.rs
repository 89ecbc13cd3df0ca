use alloc::collections::BTreeMap;

use crate::{any::SharedAny, key::ContractKey};

/// Already-constructed singletons, keyed by contract.
///
/// Populated lazily on first successful resolution of a singleton entry, or
/// eagerly when an instance is pinned. Cleared only by an explicit container
/// reset.
pub(crate) struct Cache {
    map: BTreeMap<ContractKey, SharedAny>,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { map: BTreeMap::new() }
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, key: &ContractKey) -> Option<SharedAny> {
        self.map.get(key).cloned()
    }

    #[inline]
    pub(crate) fn insert(&mut self, key: ContractKey, value: SharedAny) -> Option<SharedAny> {
        self.map.insert(key, value)
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}
