use crate::binder::Binder;
use std::{
    collections::HashMap,
    sync::{LazyLock, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

///
/// Registry
///
/// Binder table keyed by binder name. Generated code installs its table into
/// the process-wide registry at startup; tests can build a local one.
///

#[derive(Debug, Default)]
pub struct Registry {
    binders: HashMap<&'static str, &'static dyn Binder>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a generated binder table.
    #[must_use]
    pub fn from_table(table: &[&'static dyn Binder]) -> Self {
        let mut registry = Self::new();
        registry.install(table);

        registry
    }

    /// Register one binder, returning the binder it replaced, if any.
    pub fn register(&mut self, binder: &'static dyn Binder) -> Option<&'static dyn Binder> {
        self.binders.insert(binder.binder_name(), binder)
    }

    /// Register every binder in a generated table.
    pub fn install(&mut self, table: &[&'static dyn Binder]) {
        for binder in table {
            self.register(*binder);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static dyn Binder> {
        self.binders.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.binders.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.binders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.binders.is_empty()
    }

    /// Registered binder names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.binders.keys().copied().collect();
        names.sort_unstable();

        names
    }
}

///
/// REGISTRY
/// the process-wide binder table
///

static REGISTRY: LazyLock<RwLock<Registry>> = LazyLock::new(|| RwLock::new(Registry::new()));

/// Acquire a write guard to the process-wide registry.
pub fn registry_write() -> RwLockWriteGuard<'static, Registry> {
    REGISTRY
        .write()
        .expect("binder registry RwLock poisoned while acquiring write lock")
}

/// Acquire a read guard to the process-wide registry.
pub fn registry_read() -> RwLockReadGuard<'static, Registry> {
    REGISTRY
        .read()
        .expect("binder registry RwLock poisoned while acquiring read lock")
}

/// Install a generated binder table into the process-wide registry.
pub fn install(table: &[&'static dyn Binder]) {
    registry_write().install(table);
}

///
/// TESTS
///
