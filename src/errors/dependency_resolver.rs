use alloc::{boxed::Box, string::String};
use core::any::TypeId;

use super::instantiator::InstantiatorErrorKind;
use crate::key::ContractKey;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Contract `{key}` is not registered")]
    NotRegistered { key: ContractKey },
    #[error("Circular dependency detected: {}", format_chain(.chain))]
    CircularDependency { chain: Box<[ContractKey]> },
    #[error("Contract `{key}` resolved under an incorrect type. Expected: {expected:?}, actual: {actual:?}")]
    IncorrectType {
        key: ContractKey,
        expected: TypeId,
        actual: TypeId,
    },
    #[error("Construction of `{key}` failed")]
    Instantiator {
        key: ContractKey,
        #[source]
        kind: InstantiatorErrorKind,
    },
}

fn format_chain(chain: &[ContractKey]) -> String {
    use core::fmt::Write as _;

    let mut out = String::new();
    for (idx, key) in chain.iter().enumerate() {
        if idx > 0 {
            out.push_str(" -> ");
        }
        let _ = write!(out, "{key}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::ResolveErrorKind;
    use crate::key::ContractKey;

    use alloc::{boxed::Box, format};

    struct A;
    struct B;

    #[test]
    fn test_not_registered_names_contract() {
        let err = ResolveErrorKind::NotRegistered {
            key: ContractKey::of::<A>(),
        };

        assert!(format!("{err}").contains("A"));
    }

    #[test]
    fn test_circular_dependency_renders_full_chain() {
        let err = ResolveErrorKind::CircularDependency {
            chain: Box::new([ContractKey::of::<A>(), ContractKey::of::<B>(), ContractKey::of::<A>()]),
        };

        let rendered = format!("{err}");
        assert!(rendered.contains(" -> "));
        assert!(rendered.contains("A"));
        assert!(rendered.contains("B"));
    }
}
