use alloc::{boxed::Box, sync::Arc};
use core::any::Any;
use tracing::debug;

use crate::{
    container::{Container, ResolvePath},
    dependency_resolver::{DependencyResolver, Resolver},
    errors::{InstantiateErrorKind, InstantiatorErrorKind, ResolveErrorKind},
};

/// A factory producing `Provides` from already-resolved dependencies.
///
/// Implemented for closures `FnMut(D1, .., Dn) -> Result<T, E>` where every
/// parameter is a [`DependencyResolver`]: the parameter list is the declared
/// constructor signature, and parameters are resolved in left-to-right order.
/// An arity-0 closure is a plain factory.
///
/// # Warning
/// Declare dependencies as parameters instead of resolving them from a
/// captured [`Container`] handle inside the closure body; a direct
/// [`Container::resolve`] call from within a factory re-enters the container's
/// construction lock.
pub trait Instantiator<Deps>: Clone + 'static
where
    Deps: DependencyResolver,
{
    type Provides: 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&mut self, dependencies: Deps) -> Result<Self::Provides, Self::Error>;
}

pub(crate) type BoxedAny = Box<dyn Any + Send + Sync>;

/// Type-erased instantiator as stored in the registry. Resolves its declared
/// dependencies through the active resolution path, then builds the instance.
#[derive(Clone)]
pub(crate) struct ErasedInstantiator(
    Arc<dyn Fn(&Container, &mut ResolvePath) -> Result<BoxedAny, InstantiatorErrorKind> + Send + Sync>,
);

impl ErasedInstantiator {
    #[must_use]
    pub(crate) fn new(
        f: impl Fn(&Container, &mut ResolvePath) -> Result<BoxedAny, InstantiatorErrorKind> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    #[inline]
    pub(crate) fn call(&self, container: &Container, path: &mut ResolvePath) -> Result<BoxedAny, InstantiatorErrorKind> {
        (self.0.as_ref())(container, path)
    }
}

#[must_use]
pub(crate) fn erased_instantiator<Inst, Deps>(instantiator: Inst) -> ErasedInstantiator
where
    Inst: Instantiator<Deps> + Send + Sync,
    Inst::Provides: Send + Sync,
    Deps: DependencyResolver<Error = ResolveErrorKind>,
{
    ErasedInstantiator::new(move |container: &Container, path: &mut ResolvePath| {
        let mut resolver = Resolver::new(container, path);
        let dependencies = match Deps::resolve(&mut resolver) {
            Ok(dependencies) => dependencies,
            Err(err) => return Err(InstantiatorErrorKind::Deps(Box::new(err))),
        };
        let dependency = match instantiator.clone().instantiate(dependencies) {
            Ok(dependency) => dependency,
            Err(err) => return Err(InstantiatorErrorKind::Factory(err.into())),
        };

        debug!("Instantiated");

        Ok(Box::new(dependency) as BoxedAny)
    })
}

macro_rules! impl_instantiator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Response, Err, $($ty,)*> Instantiator<($($ty,)*)> for F
        where
            F: FnMut($($ty,)*) -> Result<Response, Err> + Clone + 'static,
            Response: 'static,
            Err: Into<InstantiateErrorKind>,
            $( $ty: DependencyResolver, )*
        {
            type Provides = Response;
            type Error = Err;

            fn instantiate(&mut self, ($($ty,)*): ($($ty,)*)) -> Result<Self::Provides, Self::Error> {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_instantiator);

/// Wrapper to create an instantiator that returns clones of a value built
/// outside the container.
#[inline]
#[must_use]
pub const fn instance<T: Clone + 'static>(val: T) -> impl Instantiator<(), Provides = T, Error = InstantiateErrorKind> {
    move || Ok(val.clone())
}

/// Creates a `Box<dyn Trait>` from a value, optionally including supertraits.
///
/// # Syntax
/// ```text
/// boxed!(value; Trait [+ SuperTrait1 [+ SuperTrait2 ...]])
/// ```
///
/// # Examples
/// ```rust
/// use bindery::boxed;
///
/// trait UserRepo {}
///
/// struct PostgresUserRepo;
///
/// impl UserRepo for PostgresUserRepo {}
///
/// // Single trait
/// let repo1: Box<dyn UserRepo> = boxed!(PostgresUserRepo; UserRepo);
///
/// // Trait with supertraits
/// let repo2: Box<dyn UserRepo + Send + Sync> = boxed!(PostgresUserRepo; UserRepo + Send + Sync);
/// ```
#[macro_export]
macro_rules! boxed {
    ($val:expr ; $contract:tt $($super_traits:tt)*) => {{
        Box::new($val) as Box<dyn $contract $($super_traits)*>
    }};
}
