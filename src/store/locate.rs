use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::config::DiscoveryConfig;
use crate::foundation::error::{SegueError, SegueResult};
use crate::store::project_store::SharedStore;

/// Well-known slot the host publishes its store into once it exists.
#[derive(Clone, Default)]
pub struct StoreSlot(Rc<RefCell<Option<SharedStore>>>);

impl StoreSlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a store.
    pub fn set(&self, store: SharedStore) {
        *self.0.borrow_mut() = Some(store);
    }

    /// Withdraw the published store.
    pub fn clear(&self) {
        self.0.borrow_mut().take();
    }

    /// Currently published store.
    pub fn get(&self) -> Option<SharedStore> {
        self.0.borrow().clone()
    }
}

impl fmt::Debug for StoreSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSlot")
            .field("occupied", &self.0.borrow().is_some())
            .finish()
    }
}

/// Named collection of stores registered by host plugins.
#[derive(Clone, Default)]
pub struct StoreRegistry(Rc<RefCell<Vec<(String, SharedStore)>>>);

impl StoreRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a store under `name`.
    pub fn register(&self, name: impl Into<String>, store: SharedStore) {
        let name = name.into();
        let mut entries = self.0.borrow_mut();
        entries.retain(|(n, _)| n != &name);
        entries.push((name, store));
    }

    /// Remove the store registered under `name`.
    pub fn unregister(&self, name: &str) {
        self.0.borrow_mut().retain(|(n, _)| n != name);
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.0.borrow().iter().map(|(n, _)| n.clone()).collect()
    }

    fn find(&self, mut pred: impl FnMut(&str) -> bool) -> Option<SharedStore> {
        self.0
            .borrow()
            .iter()
            .filter(|(n, _)| pred(n))
            .map(|(_, s)| s)
            .find(|s| is_structurally_valid(s))
            .cloned()
    }
}

impl fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StoreRegistry").field(&self.names()).finish()
    }
}

/// Zero-argument accessor returning the store if the host has one.
pub type StoreAccessor = Rc<dyn Fn() -> Option<SharedStore>>;

/// One way of finding the host store.
#[derive(Clone)]
pub enum Discovery {
    /// A well-known handle slot.
    Handle(StoreSlot),
    /// Registry entries whose name contains one of `patterns` (case-insensitive).
    Registry {
        /// Registry to scan.
        registry: StoreRegistry,
        /// Lowercase substrings matched against entry names.
        patterns: Vec<String>,
    },
    /// A host-provided accessor function.
    Accessor(StoreAccessor),
    /// Registry entries registered under one of the conventional `names` (exact match).
    Conventional {
        /// Registry to scan.
        registry: StoreRegistry,
        /// Conventional store names.
        names: Vec<String>,
    },
}

impl Discovery {
    fn label(&self) -> &'static str {
        match self {
            Self::Handle(_) => "handle",
            Self::Registry { .. } => "registry",
            Self::Accessor(_) => "accessor",
            Self::Conventional { .. } => "conventional",
        }
    }

    fn try_locate(&self) -> Option<SharedStore> {
        match self {
            Self::Handle(slot) => slot.get().filter(is_structurally_valid),
            Self::Registry { registry, patterns } => registry.find(|name| {
                let name = name.to_ascii_lowercase();
                patterns.iter().any(|p| name.contains(p.as_str()))
            }),
            Self::Accessor(f) => f().filter(is_structurally_valid),
            Self::Conventional { registry, names } => {
                registry.find(|name| names.iter().any(|n| n == name))
            }
        }
    }
}

impl fmt::Debug for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered list of discovery strategies; the first structurally-valid match wins.
#[derive(Clone, Debug, Default)]
pub struct StoreLocator {
    strategies: Vec<Discovery>,
}

impl StoreLocator {
    /// Locator with no strategies (never finds anything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Locator for a single injected store.
    pub fn injected(store: SharedStore) -> Self {
        let slot = StoreSlot::new();
        slot.set(store);
        Self::new().with(Discovery::Handle(slot))
    }

    /// Standard order: handle, name-matched registry entries, accessor, conventional names.
    pub fn standard(
        slot: StoreSlot,
        registry: StoreRegistry,
        accessor: Option<StoreAccessor>,
        cfg: &DiscoveryConfig,
    ) -> Self {
        let mut out = Self::new().with(Discovery::Handle(slot)).with(Discovery::Registry {
            registry: registry.clone(),
            patterns: cfg
                .registry_patterns
                .iter()
                .map(|p| p.to_ascii_lowercase())
                .collect(),
        });
        if let Some(accessor) = accessor {
            out = out.with(Discovery::Accessor(accessor));
        }
        out.with(Discovery::Conventional {
            registry,
            names: cfg.conventional_names.clone(),
        })
    }

    /// Append a strategy.
    pub fn with(mut self, strategy: Discovery) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Find the store, or [`SegueError::Unavailable`].
    pub fn locate(&self) -> SegueResult<SharedStore> {
        for strategy in &self.strategies {
            if let Some(store) = strategy.try_locate() {
                tracing::trace!(strategy = strategy.label(), "located project store");
                return Ok(store);
            }
        }
        Err(SegueError::Unavailable)
    }
}

/// A store counts once its project exists and it is not mid-mutation.
fn is_structurally_valid(store: &SharedStore) -> bool {
    store
        .try_borrow()
        .map(|s| s.project().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/store/locate.rs"]
mod tests;
