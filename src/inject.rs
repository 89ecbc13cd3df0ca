use alloc::sync::Arc;

use crate::{
    dependency_resolver::{DependencyResolver, Resolver},
    errors::ResolveErrorKind,
};

/// Shared handle to a dependency, resolved according to the lifecycle its
/// contract was registered with: the cached instance for singletons, a
/// freshly built one for transients.
pub struct Inject<Dep>(pub Arc<Dep>);

impl<Dep: Send + Sync + 'static> DependencyResolver for Inject<Dep> {
    type Error = ResolveErrorKind;

    #[inline]
    fn resolve(resolver: &mut Resolver<'_>) -> Result<Self, Self::Error> {
        resolver.resolve().map(Self)
    }
}
