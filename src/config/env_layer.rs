//! Environment variable layering.
//!
//! Child processes inherit the bootstrapper's environment plus the layers
//! pushed here. A layer can set variables or unset them; later layers win.

use std::collections::{BTreeMap, BTreeSet};

/// A named layer of environment changes.
///
/// # Example
///
/// ```
/// use firedrake_bootstrap::config::EnvLayer;
///
/// let mut layer = EnvLayer::new("bootstrap");
/// layer.set("MPICC", "/usr/bin/mpicc.mpich");
/// layer.unset("PYTHONPATH");
///
/// assert_eq!(layer.vars.get("MPICC").map(String::as_str), Some("/usr/bin/mpicc.mpich"));
/// assert!(layer.unsets("PYTHONPATH"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvLayer {
    /// Variables set by this layer.
    pub vars: BTreeMap<String, String>,
    /// Variables removed by this layer.
    pub removed: BTreeSet<String>,
    /// Source of this layer (for reporting).
    pub source: String,
}

impl EnvLayer {
    /// Create a new layer with the given source name.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            vars: BTreeMap::new(),
            removed: BTreeSet::new(),
            source: source.into(),
        }
    }

    /// Set a variable, cancelling any removal of it in this layer.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.removed.remove(&key);
        self.vars.insert(key, value.into());
    }

    /// Remove a variable from the child environment.
    pub fn unset(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.vars.remove(&key);
        self.removed.insert(key);
    }

    /// Check if this layer sets a variable.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Check if this layer removes a variable.
    pub fn unsets(&self, key: &str) -> bool {
        self.removed.contains(key)
    }

    /// Check if this layer changes nothing.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty() && self.removed.is_empty()
    }
}

/// The net effect of a stack of layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEnv {
    /// Variables to set in the child.
    pub set: BTreeMap<String, String>,
    /// Variables to remove from the child.
    pub removed: BTreeSet<String>,
}

/// Manages layered environment changes.
///
/// The first layer pushed has lowest priority, the last has highest.
///
/// # Example
///
/// ```
/// use firedrake_bootstrap::config::{EnvLayer, EnvLayerStack};
///
/// let mut stack = EnvLayerStack::new();
///
/// let mut installer = EnvLayer::new("installer");
/// installer.unset("PYTHONPATH");
/// stack.push(installer);
///
/// let mut venv = EnvLayer::new("venv");
/// venv.set("PYTHONPATH", "/home/user/lib");
/// stack.push(venv);
///
/// assert_eq!(stack.get("PYTHONPATH"), Some("/home/user/lib"));
/// assert_eq!(stack.source_of("PYTHONPATH"), Some("venv"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvLayerStack {
    /// Layers from lowest to highest priority.
    layers: Vec<EnvLayer>,
}

impl EnvLayerStack {
    /// Create a new empty stack.
    pub fn new() -> Self {
        Self { layers: vec![] }
    }

    /// Add a layer above all existing ones.
    pub fn push(&mut self, layer: EnvLayer) {
        self.layers.push(layer);
    }

    /// Get the resolved value for a variable.
    ///
    /// Returns `None` when no layer sets it or the topmost layer touching
    /// it removes it.
    pub fn get(&self, key: &str) -> Option<&str> {
        for layer in self.layers.iter().rev() {
            if let Some(value) = layer.vars.get(key) {
                return Some(value);
            }
            if layer.unsets(key) {
                return None;
            }
        }
        None
    }

    /// Whether the topmost layer touching `key` removes it.
    pub fn is_removed(&self, key: &str) -> bool {
        for layer in self.layers.iter().rev() {
            if layer.contains(key) {
                return false;
            }
            if layer.unsets(key) {
                return true;
            }
        }
        false
    }

    /// Get the net set of changes.
    pub fn resolve(&self) -> ResolvedEnv {
        let mut resolved = ResolvedEnv::default();
        for layer in &self.layers {
            for key in &layer.removed {
                resolved.set.remove(key);
                resolved.removed.insert(key.clone());
            }
            for (key, value) in &layer.vars {
                resolved.removed.remove(key);
                resolved.set.insert(key.clone(), value.clone());
            }
        }
        resolved
    }

    /// Get the source of a variable's value (or of its removal).
    pub fn source_of(&self, key: &str) -> Option<&str> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.contains(key) || layer.unsets(key))
            .map(|layer| layer.source.as_str())
    }

    /// Get all layers for inspection.
    pub fn layers(&self) -> &[EnvLayer] {
        &self.layers
    }

    /// Get the number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}
