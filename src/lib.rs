#![no_std]

extern crate alloc;

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod cache;
pub(crate) mod container;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod inject;
pub(crate) mod injectable;
pub(crate) mod instantiator;
pub(crate) mod key;
pub(crate) mod register_macros;
pub(crate) mod registry;

pub use any::TypeInfo;
pub use container::Container;
pub use dependency_resolver::{DependencyResolver, Resolver};
pub use errors::{InstantiateErrorKind, InstantiatorErrorKind, ResolveErrorKind};
pub use inject::Inject;
pub use injectable::Injectable;
pub use instantiator::{instance, Instantiator};
pub use key::ContractKey;
