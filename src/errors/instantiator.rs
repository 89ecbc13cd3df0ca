use alloc::boxed::Box;

use super::{dependency_resolver::ResolveErrorKind, instantiate::InstantiateErrorKind};

#[derive(thiserror::Error, Debug)]
pub enum InstantiatorErrorKind {
    #[error(transparent)]
    Deps(Box<ResolveErrorKind>),
    #[error(transparent)]
    Factory(InstantiateErrorKind),
}
