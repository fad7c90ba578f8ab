//! # ecs_storage
//!
//! The storage layer of the ECS runtime: where component values live and
//! how several columns are walked together.
//!
//! This crate provides:
//!
//! - [`Entity`]: a plain index shared by every component column.
//! - [`EntityPool`]: index allocator that recycles freed indices (LIFO).
//! - [`SparseArray`]: one auto-growing column of optional values per
//!   component type, addressed by entity index.
//! - [`Zipper`] / [`IndexedZipper`]: lock-step iteration over a tuple of
//!   columns, visiting only indices occupied in all of them.
//! - [`ComponentTypeId`] / [`ComponentMeta`]: type identity and display
//!   names for the type-erased registry.

pub mod component;
pub mod entity;
pub mod error;
pub mod sparse_array;
pub mod zipper;

pub use component::{Component, ComponentMeta, ComponentTypeId};
pub use entity::{Entity, EntityPool};
pub use error::StorageError;
pub use sparse_array::SparseArray;
pub use zipper::{IndexedZipper, Zipper, indexed_zip, zip};
