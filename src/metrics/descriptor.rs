use super::MetricKind;

use parking_lot::RwLock;

use std::collections::HashMap;
use std::sync::Arc;

/// Immutable metadata identifying one metric series family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    name: String,
    help: String,
    labels: Vec<String>,
    kind: MetricKind,
}

impl Descriptor {
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        labels: &[&str],
        kind: MetricKind,
    ) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }
}

/// Insert-only cache of descriptors keyed by derived field name.
///
/// Lookups of existing entries take a shared lock. A miss upgrades to the
/// exclusive lock and re-checks before inserting, so concurrent first
/// sightings of a field all end up with the same `Arc<Descriptor>`.
#[derive(Default)]
pub struct DescriptorCache {
    inner: RwLock<HashMap<String, Arc<Descriptor>>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached descriptor for `key`, building and storing it with
    /// `build` if this is the first time the key is seen.
    pub fn get_or_insert_with<F>(&self, key: &str, build: F) -> Arc<Descriptor>
    where
        F: FnOnce() -> Descriptor,
    {
        if let Some(descriptor) = self.get(key) {
            return descriptor;
        }

        self.inner
            .write()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(build()))
            .clone()
    }

    pub fn get(&self, key: &str) -> Option<Arc<Descriptor>> {
        self.inner.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
