use alloc::boxed::Box;
use tracing::debug;

use crate::{
    container::{Container, ResolvePath},
    dependency_resolver::{DependencyResolver, Resolver},
    errors::{InstantiateErrorKind, InstantiatorErrorKind, ResolveErrorKind},
    instantiator::{BoxedAny, ErasedInstantiator},
};

/// A type that can construct itself from container-resolved dependencies.
///
/// This is the self-registration form: the contract and the implementation
/// are the same type, and `Deps` stands in for the constructor's parameter
/// list. Registered through [`Container::register_injectable`] or
/// [`Container::register_singleton_injectable`].
pub trait Injectable: Sized + Send + Sync + 'static {
    type Deps: DependencyResolver<Error = ResolveErrorKind>;

    /// Builds the value from its resolved dependencies.
    ///
    /// # Errors
    /// Returns the constructor's own failure; the container wraps it with
    /// the contract key and propagates it to the resolving caller.
    fn construct(dependencies: Self::Deps) -> Result<Self, InstantiateErrorKind>;
}

#[must_use]
pub(crate) fn injectable_instantiator<Dep: Injectable>() -> ErasedInstantiator {
    ErasedInstantiator::new(|container: &Container, path: &mut ResolvePath| {
        let mut resolver = Resolver::new(container, path);
        let dependencies = match <Dep::Deps as DependencyResolver>::resolve(&mut resolver) {
            Ok(dependencies) => dependencies,
            Err(err) => return Err(InstantiatorErrorKind::Deps(Box::new(err))),
        };
        let dependency = match Dep::construct(dependencies) {
            Ok(dependency) => dependency,
            Err(err) => return Err(InstantiatorErrorKind::Factory(err)),
        };

        debug!("Constructed");

        Ok(Box::new(dependency) as BoxedAny)
    })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::Injectable;
    use crate::{container::Container, errors::InstantiateErrorKind, inject::Inject};

    use alloc::{format, string::{String, ToString}, sync::Arc};
    use tracing_test::traced_test;

    struct Settings {
        retries: u8,
    }

    impl Injectable for Settings {
        type Deps = ();

        fn construct((): Self::Deps) -> Result<Self, InstantiateErrorKind> {
            Ok(Self { retries: 3 })
        }
    }

    struct Client {
        settings: Arc<Settings>,
    }

    impl Injectable for Client {
        type Deps = (Inject<Settings>,);

        fn construct((Inject(settings),): Self::Deps) -> Result<Self, InstantiateErrorKind> {
            Ok(Self { settings })
        }
    }

    #[test]
    #[traced_test]
    fn test_self_registration() {
        let container = Container::new();
        container.register_singleton_injectable::<Settings>();
        container.register_injectable::<Client>();

        let client_1 = container.resolve::<Client>().unwrap();
        let client_2 = container.resolve::<Client>().unwrap();

        assert_eq!(client_1.settings.retries, 3);
        assert!(!Arc::ptr_eq(&client_1, &client_2));
        assert!(Arc::ptr_eq(&client_1.settings, &client_2.settings));
    }
}
