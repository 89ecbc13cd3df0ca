use alloc::{boxed::Box, sync::Arc, vec::Vec};
use core::any::TypeId;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info_span};

use crate::{
    any::SharedAny,
    cache::Cache,
    dependency_resolver::DependencyResolver,
    errors::ResolveErrorKind,
    injectable::{injectable_instantiator, Injectable},
    instantiator::{erased_instantiator, Instantiator},
    key::ContractKey,
    registry::{Lifecycle, Registration, Registry},
};

/// A dependency-resolution container.
///
/// Registrations map contract keys to construction strategies; singletons
/// constructed through the container are cached for its whole lifetime. The
/// container is an explicit value scoped to whoever constructed it: one per
/// process, or one per test case for isolation. Clones share the same
/// registrations and cache.
///
/// Registration is expected to happen single-threaded during startup;
/// [`Self::resolve`] may then be called concurrently from any number of
/// threads.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    registry: RwLock<Registry>,
    cache: RwLock<Cache>,
    /// Held across the whole "look up, construct, populate cache" sequence
    /// of a cache miss, so racing first resolutions of a lazy singleton
    /// perform exactly one construction.
    build_lock: Mutex<()>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(Registry::new()),
                cache: RwLock::new(Cache::new()),
                build_lock: Mutex::new(()),
            }),
        }
    }

    /// Registers a transient instantiator under its provided contract:
    /// every resolution constructs a new instance.
    pub fn register<Inst, Deps>(&self, instantiator: Inst)
    where
        Inst: Instantiator<Deps> + Send + Sync,
        Inst::Provides: Send + Sync,
        Deps: DependencyResolver<Error = ResolveErrorKind>,
    {
        self.register_keyed(ContractKey::of::<Inst::Provides>(), instantiator);
    }

    /// Same as [`Self::register`], under an explicit contract key.
    pub fn register_keyed<Inst, Deps>(&self, key: ContractKey, instantiator: Inst)
    where
        Inst: Instantiator<Deps> + Send + Sync,
        Inst::Provides: Send + Sync,
        Deps: DependencyResolver<Error = ResolveErrorKind>,
    {
        self.insert_entry(
            key,
            Registration::Instantiator(erased_instantiator(instantiator), Lifecycle::Transient),
        );
    }

    /// Registers a lazy singleton: the instantiator runs on first
    /// resolution and the result is shared afterwards.
    pub fn register_singleton<Inst, Deps>(&self, instantiator: Inst)
    where
        Inst: Instantiator<Deps> + Send + Sync,
        Inst::Provides: Send + Sync,
        Deps: DependencyResolver<Error = ResolveErrorKind>,
    {
        self.register_singleton_keyed(ContractKey::of::<Inst::Provides>(), instantiator);
    }

    /// Same as [`Self::register_singleton`], under an explicit contract key.
    pub fn register_singleton_keyed<Inst, Deps>(&self, key: ContractKey, instantiator: Inst)
    where
        Inst: Instantiator<Deps> + Send + Sync,
        Inst::Provides: Send + Sync,
        Deps: DependencyResolver<Error = ResolveErrorKind>,
    {
        self.insert_entry(
            key,
            Registration::Instantiator(erased_instantiator(instantiator), Lifecycle::Singleton),
        );
    }

    /// Registers `Dep` as a transient contract that constructs itself, see
    /// [`Injectable`].
    pub fn register_injectable<Dep: Injectable>(&self) {
        self.insert_entry(
            ContractKey::of::<Dep>(),
            Registration::Instantiator(injectable_instantiator::<Dep>(), Lifecycle::Transient),
        );
    }

    /// Registers `Dep` as a lazy singleton contract that constructs itself,
    /// see [`Injectable`].
    pub fn register_singleton_injectable<Dep: Injectable>(&self) {
        self.insert_entry(
            ContractKey::of::<Dep>(),
            Registration::Instantiator(injectable_instantiator::<Dep>(), Lifecycle::Singleton),
        );
    }

    /// Pins a pre-built instance as a singleton and places it in the cache
    /// immediately; resolution of the contract never defers to construction.
    pub fn register_instance<Dep>(&self, instance: Dep)
    where
        Dep: Send + Sync + 'static,
    {
        self.register_instance_keyed(ContractKey::of::<Dep>(), instance);
    }

    /// Same as [`Self::register_instance`], under an explicit contract key.
    pub fn register_instance_keyed<Dep>(&self, key: ContractKey, instance: Dep)
    where
        Dep: Send + Sync + 'static,
    {
        debug!(contract = %key, "Register instance");

        let shared: SharedAny = Arc::new(instance);
        self.inner.registry.write().insert(key.clone(), Registration::Instance(shared.clone()));
        self.inner.cache.write().insert(key, shared);
    }

    /// Resolves an instance of the contract `Dep`.
    ///
    /// Singletons are constructed on first resolution and shared afterwards;
    /// transients are constructed anew per call, with the caller holding the
    /// only strong reference to the result. Constructor dependencies are
    /// resolved depth-first in declared order through this same algorithm.
    ///
    /// # Warning
    /// Re-registering a contract does not replace its already-cached
    /// singleton; the cached instance keeps winning until [`Self::reset`].
    ///
    /// # Errors
    /// - [`ResolveErrorKind::NotRegistered`] if the contract has no entry
    /// - [`ResolveErrorKind::CircularDependency`] if the dependency graph
    ///   revisits a contract already on the active resolution path
    /// - [`ResolveErrorKind::Instantiator`] if a factory or one of its
    ///   dependencies failed; the contract stays uncached and the next
    ///   resolution retries construction
    /// - [`ResolveErrorKind::IncorrectType`] if a keyed registration holds a
    ///   value of a different type than `Dep`
    pub fn resolve<Dep>(&self) -> Result<Arc<Dep>, ResolveErrorKind>
    where
        Dep: Send + Sync + 'static,
    {
        self.resolve_keyed(ContractKey::of::<Dep>())
    }

    /// Same as [`Self::resolve`], under an explicit contract key.
    ///
    /// # Errors
    /// See [`Self::resolve`].
    pub fn resolve_keyed<Dep>(&self, key: ContractKey) -> Result<Arc<Dep>, ResolveErrorKind>
    where
        Dep: Send + Sync + 'static,
    {
        let span = info_span!("resolve", contract = %key);
        let _guard = span.enter();

        if let Some(hit) = self.inner.cache.read().get(&key) {
            debug!("Found in cache");
            return downcast_shared(key, hit);
        }

        // Serialize the whole miss path; losers of a first-resolution race
        // find the winner's instance in the cache re-check below.
        let _build_guard = self.inner.build_lock.lock();

        let mut path = ResolvePath::new();
        let shared = self.resolve_shared(key.clone(), &mut path)?;
        downcast_shared(key, shared)
    }

    /// Clears all registrations and cached singletons at once.
    pub fn reset(&self) {
        self.inner.registry.write().clear();
        self.inner.cache.write().clear();

        debug!("Container reset");
    }
}

impl Container {
    fn insert_entry(&self, key: ContractKey, registration: Registration) {
        debug!(contract = %key, "Register");
        self.inner.registry.write().insert(key, registration);
    }

    pub(crate) fn resolve_in_path<Dep>(&self, key: ContractKey, path: &mut ResolvePath) -> Result<Arc<Dep>, ResolveErrorKind>
    where
        Dep: Send + Sync + 'static,
    {
        let shared = self.resolve_shared(key.clone(), path)?;
        downcast_shared(key, shared)
    }

    fn resolve_shared(&self, key: ContractKey, path: &mut ResolvePath) -> Result<SharedAny, ResolveErrorKind> {
        if let Some(hit) = self.inner.cache.read().get(&key) {
            debug!(contract = %key, "Found in cache");
            return Ok(hit);
        }

        if path.contains(&key) {
            let err = ResolveErrorKind::CircularDependency {
                chain: path.chain_with(&key),
            };
            error!("{}", err);
            return Err(err);
        }

        let Some(registration) = self.inner.registry.read().get(&key) else {
            let err = ResolveErrorKind::NotRegistered { key };
            error!("{}", err);
            return Err(err);
        };

        match registration {
            // Pinned instances are already cached; kept for completeness.
            Registration::Instance(value) => Ok(value),
            Registration::Instantiator(instantiator, lifecycle) => {
                path.push(key.clone());
                let built = instantiator.call(self, path);
                path.pop();

                match built {
                    Ok(boxed) => {
                        let shared = SharedAny::from(boxed);
                        if lifecycle == Lifecycle::Singleton {
                            self.inner.cache.write().insert(key.clone(), shared.clone());
                            debug!(contract = %key, "Cached");
                        }
                        Ok(shared)
                    }
                    Err(kind) => {
                        let err = ResolveErrorKind::Instantiator { key, kind };
                        error!("{}", err);
                        Err(err)
                    }
                }
            }
        }
    }
}

fn downcast_shared<Dep>(key: ContractKey, shared: SharedAny) -> Result<Arc<Dep>, ResolveErrorKind>
where
    Dep: Send + Sync + 'static,
{
    let actual = (*shared).type_id();
    shared.downcast::<Dep>().map_err(|_| {
        let err = ResolveErrorKind::IncorrectType {
            key,
            expected: TypeId::of::<Dep>(),
            actual,
        };
        error!("{}", err);
        err
    })
}

/// Contract keys on the active resolution path, outermost first.
#[derive(Default)]
pub(crate) struct ResolvePath(Vec<ContractKey>);

impl ResolvePath {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub(crate) fn push(&mut self, key: ContractKey) {
        self.0.push(key);
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, key: &ContractKey) -> bool {
        self.0.contains(key)
    }

    /// Snapshot of the path with `key` appended, for cycle reports.
    #[must_use]
    pub(crate) fn chain_with(&self, key: &ContractKey) -> Box<[ContractKey]> {
        let mut chain = Vec::with_capacity(self.0.len() + 1);
        chain.extend(self.0.iter().cloned());
        chain.push(key.clone());
        chain.into_boxed_slice()
    }
}
