//! File-type plugins and the process-wide registry that orders them.
//!
//! A plugin decides whether it owns a file (`can_handle`) and, if so, turns it
//! into an [`IndexRecord`]. The scanner tries plugins in registry order and
//! stops at the first one that claims a path.

pub mod lightburn;
#[cfg(feature = "scad")]
pub mod scad;
#[cfg(feature = "stl")]
pub mod stl;

use crate::record::IndexRecord;
use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use std::ffi::OsStr;
use std::path::Path;

/// Per-run knobs the caller passes down to every plugin.
#[derive(Debug, Clone, Copy)]
pub struct IndexOptions {
    /// Replace a previously extracted thumbnail instead of failing.
    pub overwrite_thumbnails: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            overwrite_thumbnails: true,
        }
    }
}

/// Trait that all file-type handlers implement.
pub trait FilePlugin: Send + Sync {
    /// Short name used for `--plugins` selection and diagnostics.
    fn name(&self) -> &'static str;

    /// Cheap ownership check. Must not panic; `true` commits the plugin to index the file.
    fn can_handle(&self, path: &Path) -> bool;

    /// Extracts a record. Failures are captured in `IndexRecord::error`, never returned.
    fn index(&self, path: &Path, options: &IndexOptions) -> IndexRecord;
}

/// Ordered set of plugins. First registered, first tried.
pub struct PluginRegistry {
    plugins: Vec<Box<dyn FilePlugin>>,
}

static GLOBAL: Lazy<PluginRegistry> = Lazy::new(PluginRegistry::builtin);

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    pub fn register<P: FilePlugin + 'static>(&mut self, plugin: P) {
        self.plugins.push(Box::new(plugin));
    }

    /// The built-in handlers in priority order.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(lightburn::LightBurnPlugin);
        #[cfg(feature = "stl")]
        registry.register(stl::StlPlugin);
        #[cfg(feature = "scad")]
        registry.register(scad::ScadPlugin);
        registry
    }

    /// Process-wide registry, built on first use and read-only afterwards.
    pub fn global() -> &'static PluginRegistry {
        &GLOBAL
    }

    pub fn plugins(&self) -> impl Iterator<Item = &dyn FilePlugin> {
        self.plugins.iter().map(|p| p.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins().map(|p| p.name()).collect()
    }

    /// First plugin claiming `path`, in registry order.
    pub fn find(&self, path: &Path) -> Option<&dyn FilePlugin> {
        self.plugins().find(|p| p.can_handle(path))
    }

    /// Restricts and reorders the registry according to a user selection.
    pub fn select(&self, selection: &PluginSelection) -> Result<Vec<&dyn FilePlugin>> {
        let Some(names) = &selection.names else {
            return Ok(self.plugins().collect());
        };

        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            match self.plugins().find(|p| p.name() == name) {
                Some(plugin) => selected.push(plugin),
                None => bail!(
                    "Unknown plugin '{}'. Available: {}",
                    name,
                    self.names().join(", ")
                ),
            }
        }
        Ok(selected)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Which plugins to try, and in which order. `None` means all registered plugins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginSelection {
    pub names: Option<Vec<String>>,
}

impl PluginSelection {
    /// Parses a comma-separated list such as `lightburn,stl`.
    pub fn parse(list: &str) -> Self {
        let names: Vec<String> = list
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            names: if names.is_empty() { None } else { Some(names) },
        }
    }
}

/// True when `path` is a regular file whose extension is one of `exts` (lowercase, no dot).
pub(crate) fn has_extension(path: &Path, exts: &[&str]) -> bool {
    let matches = path
        .extension()
        .and_then(OsStr::to_str)
        .map(|e| e.to_lowercase())
        .is_some_and(|e| exts.contains(&e.as_str()));

    matches && path.is_file()
}
