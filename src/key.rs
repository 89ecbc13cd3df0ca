use alloc::{boxed::Box, vec::Vec};
use core::fmt::{self, Display, Formatter};

use crate::any::TypeInfo;

/// Canonical identity of a service contract.
///
/// A plain contract is keyed by its own [`TypeInfo`]. A parameterized
/// contract is keyed by the base contract identity plus the ordered
/// identities of its type arguments, so `Repository<A, B>` and
/// `Repository<B, A>` never share an entry.
///
/// Monomorphization already assigns distinct [`core::any::TypeId`]s to
/// distinct generic instantiations, so the typed container API uses plain
/// keys throughout; [`ContractKey::parameterized`] carries the composite
/// identity for registrations made behind an erased base contract.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContractKey {
    base: TypeInfo,
    args: Box<[TypeInfo]>,
}

impl ContractKey {
    /// Key of the plain contract `T`.
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            base: TypeInfo::of::<T>(),
            args: Box::new([]),
        }
    }

    /// Key of the contract `Base` applied to concrete type arguments.
    ///
    /// Argument order is significant: swapping two arguments produces a
    /// different key.
    #[must_use]
    pub fn parameterized<Base>(args: impl IntoIterator<Item = TypeInfo>) -> Self
    where
        Base: ?Sized + 'static,
    {
        Self {
            base: TypeInfo::of::<Base>(),
            args: args.into_iter().collect::<Vec<_>>().into_boxed_slice(),
        }
    }

    #[inline]
    #[must_use]
    pub fn base(&self) -> TypeInfo {
        self.base
    }

    #[inline]
    #[must_use]
    pub fn args(&self) -> &[TypeInfo] {
        &self.args
    }
}

impl Display for ContractKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if let Some((first, rest)) = self.args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ContractKey;
    use crate::any::TypeInfo;

    use alloc::{format, string::String};

    trait Repository {}

    struct Product;
    struct Order;

    #[test]
    fn test_plain_keys_equal_for_same_type() {
        assert_eq!(ContractKey::of::<String>(), ContractKey::of::<String>());
        assert_ne!(ContractKey::of::<String>(), ContractKey::of::<u32>());
    }

    #[test]
    fn test_unsized_contract() {
        let key = ContractKey::of::<dyn Repository>();
        assert!(key.args().is_empty());
    }

    #[test]
    fn test_parameterized_argument_order_is_significant() {
        let product_order =
            ContractKey::parameterized::<dyn Repository>([TypeInfo::of::<Product>(), TypeInfo::of::<Order>()]);
        let order_product =
            ContractKey::parameterized::<dyn Repository>([TypeInfo::of::<Order>(), TypeInfo::of::<Product>()]);

        assert_ne!(product_order, order_product);
        assert_eq!(product_order.base(), order_product.base());
    }

    #[test]
    fn test_parameterized_never_collides_with_plain_base() {
        let plain = ContractKey::of::<dyn Repository>();
        let applied = ContractKey::parameterized::<dyn Repository>([TypeInfo::of::<Product>()]);

        assert_ne!(plain, applied);
    }

    #[test]
    fn test_structurally_identical_keys_are_equal() {
        let first = ContractKey::parameterized::<dyn Repository>([TypeInfo::of::<Product>()]);
        let second = ContractKey::parameterized::<dyn Repository>([TypeInfo::of::<Product>()]);

        assert_eq!(first, second);
    }

    #[test]
    fn test_display_names_base_and_arguments() {
        let key = ContractKey::parameterized::<dyn Repository>([TypeInfo::of::<Product>(), TypeInfo::of::<Order>()]);
        let rendered = format!("{key}");

        assert!(rendered.contains("Repository"));
        assert!(rendered.contains("Product"));
        assert!(rendered.contains("Order"));
        assert!(rendered.contains('<'));
    }
}
