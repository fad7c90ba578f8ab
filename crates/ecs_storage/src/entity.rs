//! Entity handles and index allocation.
//!
//! An [`Entity`] is nothing more than a row number shared by every component
//! column. Indices are handed out by an [`EntityPool`], which recycles the
//! indices of killed entities before growing its high-water mark.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// A handle identifying one row across all component columns.
///
/// Entities carry no data of their own and have no identity beyond their
/// index: two handles with the same index are the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(usize);

impl Entity {
    /// Create an entity handle from a raw index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index of this entity.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for Entity {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<Entity> for usize {
    fn from(entity: Entity) -> Self {
        entity.0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates entity indices, recycling freed ones first.
///
/// Freed indices are reused in LIFO order: the most recently freed index is
/// the next one handed out.
#[derive(Debug, Default, Clone)]
pub struct EntityPool {
    /// One past the largest index ever handed out.
    high_water: usize,
    /// Indices available for reuse, most recently freed last.
    freed: Vec<usize>,
    /// `is_free[i]` is set while index `i` sits in `freed`.
    is_free: Vec<bool>,
}

impl EntityPool {
    /// Creates an empty pool. The first spawned entity has index 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            high_water: 0,
            freed: Vec::new(),
            is_free: Vec::new(),
        }
    }

    /// Allocates an entity, preferring the most recently freed index.
    pub fn spawn(&mut self) -> Entity {
        match self.freed.pop() {
            Some(index) => {
                self.is_free[index] = false;
                Entity(index)
            }
            None => {
                let index = self.high_water;
                self.high_water += 1;
                self.is_free.push(false);
                Entity(index)
            }
        }
    }

    /// Claims a specific index.
    ///
    /// Indices skipped over when `index` lies beyond the high-water mark are
    /// pushed onto the free list so later calls to [`EntityPool::spawn`]
    /// fill the gap.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadySpawned`] if `index` is currently alive.
    pub fn claim(&mut self, index: usize) -> Result<Entity, StorageError> {
        if index < self.high_water {
            if !self.is_free[index] {
                return Err(StorageError::AlreadySpawned(Entity(index)));
            }
            if let Some(pos) = self.freed.iter().rposition(|&free| free == index) {
                self.freed.remove(pos);
            }
            self.is_free[index] = false;
        } else {
            self.freed.extend(self.high_water..index);
            self.is_free.resize(index, true);
            self.is_free.push(false);
            self.high_water = index + 1;
        }
        Ok(Entity(index))
    }

    /// Returns an entity's index to the free list.
    ///
    /// Returns `false` if the index was not alive (never allocated or
    /// already freed); the free list is left untouched in that case.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.freed.push(entity.0);
        self.is_free[entity.0] = true;
        true
    }

    /// Returns `true` if `entity` has been allocated and not freed since.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.is_free.get(entity.0).is_some_and(|&free| !free)
    }

    /// One past the largest index ever allocated.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Number of currently alive entities.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.high_water - self.freed.len()
    }

    /// Number of indices waiting to be reused.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.freed.len()
    }
}
