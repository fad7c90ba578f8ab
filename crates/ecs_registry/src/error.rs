//! Registry-level error types.

use ecs_storage::StorageError;

/// Errors raised by component registration, lookup and system execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A component type was registered twice.
    #[error("Component {requested} already registered. Registered components:{}", bullet_list(.registered))]
    AlreadyRegistered {
        /// Name of the type passed to `register_component`.
        requested: &'static str,
        /// Names of every registered type, in registration order.
        registered: Vec<&'static str>,
    },

    /// A component operation referenced a type with no column.
    #[error("Component {requested} not registered. Registered components:{}", bullet_list(.registered))]
    NotRegistered {
        /// Name of the type that was looked up.
        requested: &'static str,
        /// Names of every registered type, in registration order.
        registered: Vec<&'static str>,
    },

    /// A column was requested while a conflicting borrow of it was alive.
    #[error("Component {name} is already borrowed")]
    ComponentBorrowed {
        /// Name of the component type.
        name: &'static str,
    },

    /// Entity allocation or column lookup failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn bullet_list(names: &[&str]) -> String {
    names.iter().map(|name| format!("\n\t- {name}")).collect()
}

/// Errors raised while loading a tick configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON or has the wrong shape.
    #[error("failed to parse tick config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The tick rate is not positive and finite, or a tick would last
    /// longer than a `Duration` can hold.
    #[error("tick rate must be a positive finite number with a representable tick length, got {0}")]
    InvalidTickRate(f64),
}

#[cfg(test)]
mod tests {
    use ecs_storage::Entity;

    use super::*;

    #[test]
    fn test_not_registered_message_without_components() {
        let err = RegistryError::NotRegistered {
            requested: "velocity",
            registered: Vec::new(),
        };
        assert_eq!(
            err.to_string(),
            "Component velocity not registered. Registered components:"
        );
    }

    #[test]
    fn test_not_registered_message_lists_components() {
        let err = RegistryError::NotRegistered {
            requested: "velocity",
            registered: vec!["position"],
        };
        assert_eq!(
            err.to_string(),
            "Component velocity not registered. Registered components:\n\t- position"
        );
    }

    #[test]
    fn test_already_registered_message_lists_components() {
        let err = RegistryError::AlreadyRegistered {
            requested: "velocity",
            registered: vec!["position", "velocity"],
        };
        assert_eq!(
            err.to_string(),
            "Component velocity already registered. Registered components:\n\t- position\n\t- velocity"
        );
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let err = RegistryError::from(StorageError::AlreadySpawned(Entity::from_index(3)));
        assert_eq!(err.to_string(), "entity already spawned: Entity(3)");
    }
}
