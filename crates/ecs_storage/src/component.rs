//! Component identity and metadata.
//!
//! Components are plain data: any `'static` type can be stored in a column
//! without implementing anything. [`ComponentTypeId`] and [`ComponentMeta`]
//! describe a component type for the type-erased registry.

use std::any::TypeId;

/// Marker for types that can be stored as components.
///
/// Implemented for every `'static` type.
pub trait Component: 'static {}

impl<T: 'static> Component for T {}

/// Identity of a component type, used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(TypeId);

impl ComponentTypeId {
    /// Returns the [`ComponentTypeId`] of `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self(TypeId::of::<T>())
    }
}

/// Metadata describing a component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentMeta {
    /// The unique type identifier.
    pub type_id: ComponentTypeId,
    /// Human-readable type name, as reported by [`std::any::type_name`].
    pub name: &'static str,
}

impl ComponentMeta {
    /// Returns the metadata for `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self {
            type_id: ComponentTypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health;

    struct Velocity;

    #[test]
    fn test_component_type_id_is_stable() {
        assert_eq!(ComponentTypeId::of::<Health>(), ComponentTypeId::of::<Health>());
    }

    #[test]
    fn test_component_type_id_differs_between_types() {
        assert_ne!(ComponentTypeId::of::<Health>(), ComponentTypeId::of::<Velocity>());
    }

    #[test]
    fn test_component_meta_name() {
        let meta = ComponentMeta::of::<Health>();
        assert!(meta.name.ends_with("Health"));
        assert_eq!(meta.type_id, ComponentTypeId::of::<Health>());
    }
}
