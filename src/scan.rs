use crate::filewalker::resolve_inputs;
use crate::plugins::{IndexOptions, PluginRegistry, PluginSelection};
use crate::record::IndexRecord;
use anyhow::Result;
use log::{debug, info};

/// Options controlling a single scan run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub recursive: bool,
    /// Log which plugin handles each file at `info` instead of `debug`.
    pub debug_plugins: bool,
    pub index: IndexOptions,
    pub plugins: PluginSelection,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            debug_plugins: false,
            index: IndexOptions::default(),
            plugins: PluginSelection::default(),
        }
    }
}

/// Resolves `target` and indexes every file some plugin claims, using the
/// process-wide registry.
pub fn scan(target: &str, options: &ScanOptions) -> Result<Vec<IndexRecord>> {
    scan_with(PluginRegistry::global(), target, options)
}

/// Same as [`scan`] with an explicit registry.
pub fn scan_with(
    registry: &PluginRegistry,
    target: &str,
    options: &ScanOptions,
) -> Result<Vec<IndexRecord>> {
    let plugins = registry.select(&options.plugins)?;
    let files = resolve_inputs(target, options.recursive)?;
    debug!("Resolved {} candidate files for {}", files.len(), target);

    let mut records = Vec::new();
    for path in files {
        match plugins.iter().find(|p| p.can_handle(&path)) {
            Some(plugin) => {
                if options.debug_plugins {
                    info!("[plugin:{}] {}", plugin.name(), path.display());
                } else {
                    debug!("[plugin:{}] {}", plugin.name(), path.display());
                }
                records.push(plugin.index(&path, &options.index));
            }
            None => {
                if options.debug_plugins {
                    info!("[no-plugin] {}", path.display());
                } else {
                    debug!("[no-plugin] {}", path.display());
                }
            }
        }
    }

    Ok(records)
}
