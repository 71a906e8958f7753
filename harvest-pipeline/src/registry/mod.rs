//! Collector registry.
//!
//! An append-only, ordered table of collector implementations keyed by
//! namespace and qualified name. Registration is explicit: each collector
//! type is registered once, before the first lookup.
//!
//! Duplicate registrations are not rejected; they produce duplicate entries.

use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use crate::collector::Collector;

/// Builds a fresh collector instance for each invocation.
pub type CollectorFactory = Arc<dyn Fn() -> Box<dyn Collector> + Send + Sync>;

/// One registered collector type.
#[derive(Clone)]
pub struct CollectorEntry {
    namespace: String,
    qualified_name: String,
    factory: CollectorFactory,
}

impl CollectorEntry {
    /// Namespace the collector was registered under.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Qualified name, `<namespace>.<name>`.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Build a new instance of the collector.
    pub fn instantiate(&self) -> Box<dyn Collector> {
        (self.factory)()
    }

    /// Whether a selector names this entry, either by namespace or by
    /// qualified name.
    pub fn matches(&self, selector: &str) -> bool {
        self.namespace == selector || self.qualified_name == selector
    }
}

impl fmt::Debug for CollectorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorEntry")
            .field("namespace", &self.namespace)
            .field("qualified_name", &self.qualified_name)
            .finish_non_exhaustive()
    }
}

/// Ordered table of registered collectors.
#[derive(Debug, Clone, Default)]
pub struct CollectorRegistry {
    entries: Vec<CollectorEntry>,
}

impl CollectorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector type as `<namespace>.<name>`.
    pub fn register<F, C>(&mut self, namespace: &str, name: &str, factory: F)
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Collector + 'static,
    {
        let qualified_name = format!("{}.{}", namespace, name);
        debug!(collector = %qualified_name, "Registering collector");
        self.entries.push(CollectorEntry {
            namespace: namespace.to_string(),
            qualified_name,
            factory: Arc::new(move || Box::new(factory()) as Box<dyn Collector>),
        });
    }

    /// All registrations, in registration order.
    pub fn list(&self) -> &[CollectorEntry] {
        &self.entries
    }

    /// Entries named by any of the selectors, in registration order.
    pub fn select<S: AsRef<str>>(&self, selectors: &[S]) -> Vec<&CollectorEntry> {
        self.entries
            .iter()
            .filter(|entry| selectors.iter().any(|s| entry.matches(s.as_ref())))
            .collect()
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn global() -> &'static RwLock<CollectorRegistry> {
    static GLOBAL: OnceLock<RwLock<CollectorRegistry>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(CollectorRegistry::new()))
}

/// Register a collector type in the process-wide registry.
pub fn register_collector<F, C>(namespace: &str, name: &str, factory: F)
where
    F: Fn() -> C + Send + Sync + 'static,
    C: Collector + 'static,
{
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(namespace, name, factory);
}

/// Snapshot of the process-wide registry, in registration order.
pub fn list_collectors() -> CollectorRegistry {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
