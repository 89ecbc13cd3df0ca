use alloc::sync::Arc;

use crate::{
    container::{Container, ResolvePath},
    errors::ResolveErrorKind,
    key::ContractKey,
};

/// Borrowed view of an in-flight resolution: the container plus the active
/// dependency path used for cycle detection.
pub struct Resolver<'a> {
    container: &'a Container,
    path: &'a mut ResolvePath,
}

impl<'a> Resolver<'a> {
    #[inline]
    #[must_use]
    pub(crate) fn new(container: &'a Container, path: &'a mut ResolvePath) -> Self {
        Self { container, path }
    }

    /// Resolves the contract `Dep` as a dependency of the instance currently
    /// under construction.
    ///
    /// # Errors
    /// Fails with the same kinds as [`Container::resolve`], including
    /// [`ResolveErrorKind::CircularDependency`] if `Dep` is already on the
    /// active resolution path.
    pub fn resolve<Dep>(&mut self) -> Result<Arc<Dep>, ResolveErrorKind>
    where
        Dep: Send + Sync + 'static,
    {
        self.resolve_keyed(ContractKey::of::<Dep>())
    }

    /// Same as [`Self::resolve`], with an explicit contract key.
    ///
    /// # Errors
    /// See [`Self::resolve`].
    pub fn resolve_keyed<Dep>(&mut self, key: ContractKey) -> Result<Arc<Dep>, ResolveErrorKind>
    where
        Dep: Send + Sync + 'static,
    {
        self.container.resolve_in_path(key, self.path)
    }
}

/// The declared dependencies of an instantiator.
///
/// Tuples resolve element-wise in declaration order, so a constructor's
/// parameter list maps directly onto a tuple of resolvers.
pub trait DependencyResolver: Sized {
    type Error: Into<ResolveErrorKind>;

    fn resolve(resolver: &mut Resolver<'_>) -> Result<Self, Self::Error>;
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: DependencyResolver, )*
        {
            type Error = ResolveErrorKind;

            #[inline]
            #[allow(unused_variables)]
            fn resolve(resolver: &mut Resolver<'_>) -> Result<Self, Self::Error> {
                Ok(($($ty::resolve(resolver).map_err(Into::into)?,)*))
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{DependencyResolver, Resolver};
    use crate::{
        container::{Container, ResolvePath},
        errors::InstantiateErrorKind,
        inject::Inject,
    };

    use alloc::{format, string::{String, ToString}, sync::Arc};
    use core::sync::atomic::{AtomicU8, Ordering};
    use tracing_test::traced_test;

    struct First;
    struct Second;

    #[test]
    #[allow(dead_code)]
    fn test_dependency_resolver_impls() {
        fn resolver<T: DependencyResolver>() {}
        fn resolver_with_dep<Dep: Send + Sync + 'static>() {
            resolver::<Inject<Dep>>();
            resolver::<(Inject<Dep>,)>();
            resolver::<(Inject<Dep>, Inject<Dep>)>();
        }
    }

    #[test]
    #[traced_test]
    fn test_tuple_resolves_in_declared_order() {
        let position = Arc::new(AtomicU8::new(0));
        let first_position = Arc::new(AtomicU8::new(0));
        let second_position = Arc::new(AtomicU8::new(0));

        let container = Container::new();
        container.register({
            let position = position.clone();
            let first_position = first_position.clone();
            move || {
                first_position.store(position.fetch_add(1, Ordering::SeqCst) + 1, Ordering::SeqCst);
                Ok::<_, InstantiateErrorKind>(First)
            }
        });
        container.register({
            let position = position.clone();
            let second_position = second_position.clone();
            move || {
                second_position.store(position.fetch_add(1, Ordering::SeqCst) + 1, Ordering::SeqCst);
                Ok::<_, InstantiateErrorKind>(Second)
            }
        });

        let mut path = ResolvePath::new();
        let mut resolver = Resolver::new(&container, &mut path);
        let _ = <(Inject<First>, Inject<Second>)>::resolve(&mut resolver).unwrap();

        assert_eq!(first_position.load(Ordering::SeqCst), 1);
        assert_eq!(second_position.load(Ordering::SeqCst), 2);
    }
}
