//! Systems: stateless callbacks bound to a fixed set of component types.
//!
//! A system declares the component types it works on as a tuple type
//! parameter. The columns are resolved every time the system runs, not when
//! it is added, so a system may be added before its components are
//! registered; running it early fails with
//! [`RegistryError::NotRegistered`].
//!
//! Columns are handed to the system as runtime-checked mutable borrows.
//! Reading the same column again through the registry inside the system, or
//! listing a type twice in the tuple, fails with
//! [`RegistryError::ComponentBorrowed`].

use std::cell::RefMut;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use ecs_storage::{Component, SparseArray};

use crate::error::RegistryError;
use crate::registry::Registry;

/// A unit of logic run once per tick by [`Registry::run_systems`].
pub trait System {
    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Execute the system against `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the system's columns cannot be resolved.
    fn run(&self, registry: &Registry, dt: f64) -> Result<(), RegistryError>;
}

/// A tuple of component types whose columns a system receives.
pub trait ComponentSet: 'static {
    /// The borrowed columns, one [`RefMut`] per component type.
    type Columns<'r>;

    /// Borrow every column of the set from `registry`.
    ///
    /// # Errors
    ///
    /// Fails if a type is not registered or its column is already borrowed.
    fn fetch(registry: &Registry) -> Result<Self::Columns<'_>, RegistryError>;

    /// Names of the component types in the set.
    fn names() -> Vec<&'static str>;
}

impl ComponentSet for () {
    type Columns<'r> = ();

    fn fetch(_registry: &Registry) -> Result<Self::Columns<'_>, RegistryError> {
        Ok(())
    }

    fn names() -> Vec<&'static str> {
        Vec::new()
    }
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            type Columns<'r> = ($(RefMut<'r, SparseArray<$name>>,)+);

            fn fetch(registry: &Registry) -> Result<Self::Columns<'_>, RegistryError> {
                Ok(($(registry.borrow_component_mut::<$name>()?,)+))
            }

            fn names() -> Vec<&'static str> {
                vec![$(std::any::type_name::<$name>()),+]
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

/// The columns handed to a system for one run.
///
/// Dereferences to the tuple of borrowed columns; use
/// [`Columns::into_inner`] to destructure it.
pub struct Columns<'r, Q: ComponentSet>(Q::Columns<'r>);

impl<'r, Q: ComponentSet> Columns<'r, Q> {
    /// Unwrap the tuple of borrowed columns.
    pub fn into_inner(self) -> Q::Columns<'r> {
        self.0
    }
}

impl<'r, Q: ComponentSet> Deref for Columns<'r, Q> {
    type Target = Q::Columns<'r>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'r, Q: ComponentSet> DerefMut for Columns<'r, Q> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// A [`System`] backed by a closure.
pub struct FnSystem<Q, F> {
    name: String,
    f: F,
    _components: PhantomData<fn() -> Q>,
}

impl<Q: ComponentSet, F> FnSystem<Q, F> {
    /// Wrap `f` as a system named `name`.
    pub fn new(name: impl Into<String>, f: F) -> Self
    where
        F: for<'r> Fn(&'r Registry, f64, Columns<'r, Q>),
    {
        Self {
            name: name.into(),
            f,
            _components: PhantomData,
        }
    }

    /// Names of the component types this system works on.
    #[must_use]
    pub fn component_names(&self) -> Vec<&'static str> {
        Q::names()
    }
}

impl<Q, F> System for FnSystem<Q, F>
where
    Q: ComponentSet,
    F: for<'r> Fn(&'r Registry, f64, Columns<'r, Q>),
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, registry: &Registry, dt: f64) -> Result<(), RegistryError> {
        let columns = Q::fetch(registry)?;
        (self.f)(registry, dt, Columns(columns));
        Ok(())
    }
}

impl<Q, F> std::fmt::Debug for FnSystem<Q, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSystem").field("name", &self.name).finish_non_exhaustive()
    }
}
