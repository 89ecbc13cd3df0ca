/// Declarative registration: expands to [`crate::Container`] registration
/// calls, in order.
///
/// Entries:
/// - `provide(instantiator)`: transient registration
/// - `provide_singleton(instantiator)`: lazy singleton registration
/// - `instance(value)`: pinned instance registration
///
/// # Examples
/// ```rust
/// use std::sync::Arc;
///
/// use bindery::{register, Container, Inject, InstantiateErrorKind};
///
/// struct Config {
///     retries: u8,
/// }
///
/// struct Client {
///     config: Arc<Config>,
/// }
///
/// let container = Container::new();
/// register! {
///     container,
///     instance(Config { retries: 3 }),
///     provide_singleton(|Inject(config): Inject<Config>| Ok::<_, InstantiateErrorKind>(Client { config })),
/// }
///
/// let client = container.resolve::<Client>().unwrap();
/// assert_eq!(client.config.retries, 3);
/// ```
#[macro_export]
macro_rules! register {
    ($container:expr, $($entries:tt)*) => {{
        let container = &$container;
        $crate::register_internal! { container, $($entries)* }
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! register_internal {
    ($container:ident $(,)?) => {};
    ($container:ident, provide($inst:expr) $(, $($rest:tt)*)?) => {
        $container.register($inst);
        $crate::register_internal! { $container $(, $($rest)*)? }
    };
    ($container:ident, provide_singleton($inst:expr) $(, $($rest:tt)*)?) => {
        $container.register_singleton($inst);
        $crate::register_internal! { $container $(, $($rest)*)? }
    };
    ($container:ident, instance($val:expr) $(, $($rest:tt)*)?) => {
        $container.register_instance($val);
        $crate::register_internal! { $container $(, $($rest)*)? }
    };
}

#[cfg(test)]
mod tests {
    extern crate std;

    use crate::{container::Container, errors::InstantiateErrorKind, inject::Inject};

    use alloc::{format, string::{String, ToString}, sync::Arc};
    use tracing_test::traced_test;

    struct Config {
        retries: u8,
    }

    struct Pool;

    struct Client {
        config: Arc<Config>,
        pool: Arc<Pool>,
    }

    #[test]
    #[traced_test]
    fn test_register_macro_entries() {
        let container = Container::new();
        register! {
            container,
            instance(Config { retries: 3 }),
            provide_singleton(|| Ok::<_, InstantiateErrorKind>(Pool)),
            provide(|Inject(config): Inject<Config>, Inject(pool): Inject<Pool>| {
                Ok::<_, InstantiateErrorKind>(Client { config, pool })
            }),
        }

        let client_1 = container.resolve::<Client>().unwrap();
        let client_2 = container.resolve::<Client>().unwrap();

        assert_eq!(client_1.config.retries, 3);
        assert!(!Arc::ptr_eq(&client_1, &client_2));
        assert!(Arc::ptr_eq(&client_1.config, &client_2.config));
        assert!(Arc::ptr_eq(&client_1.pool, &client_2.pool));
    }
}
