//! Storage-layer error types.

use crate::entity::Entity;

/// Errors raised by entity allocation and column lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The requested entity index is already in use.
    #[error("entity already spawned: {0}")]
    AlreadySpawned(Entity),

    /// A reverse lookup was given a reference that does not point into the
    /// queried column.
    #[error("value not found in sparse array")]
    ValueNotFound,
}
