//! # maker-file-index
//!
//! Catalogs maker project files under a directory tree and renders a
//! browsable Markdown report:
//!
//! - a flat report with one row per indexed file (thumbnail, path, notes, error)
//! - one `dirs/**/index.md` page per directory, linking subdirectories and
//!   their READMEs
//!
//! File types are handled by plugins (see [`plugins`]); LightBurn projects get
//! their notes and embedded thumbnail extracted, STL and OpenSCAD files get a
//! short description.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use maker_file_index::{Config, run};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new("projects/", PathBuf::from("index.md"));
//!     let report = run(config).await?;
//!     println!("{}", report.display());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod filewalker;
pub mod grouper;
pub mod plugins;
pub mod record;
pub mod scan;
pub mod templates;
pub mod utils;
pub mod writer;

pub use cli::Config;
pub use filewalker::resolve_inputs;
pub use grouper::DirectoryTree;
pub use plugins::{FilePlugin, IndexOptions, PluginRegistry, PluginSelection};
pub use record::IndexRecord;
pub use scan::{ScanOptions, scan};
pub use writer::ReportWriter;

use anyhow::{Result, bail};
use chrono::{Local, SecondsFormat};
use log::info;
use std::path::{Path, PathBuf};

/// Suffix added to a source file's stem when its thumbnail is extracted.
pub const THUMBNAIL_MARKER: &str = "_thumbnail";

/// Scans, groups and renders. Returns the absolute path of the flat report.
pub async fn run(config: Config) -> Result<PathBuf> {
    let generated_at = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
    run_at(config, generated_at).await
}

/// Same as [`run`] with a fixed generation timestamp.
pub async fn run_at(config: Config, generated_at: String) -> Result<PathBuf> {
    let records = scan(&config.target, &config.scan_options())?;
    if records.is_empty() {
        bail!("No supported files found for target: {}", config.target);
    }
    info!("Indexed {} files", records.len());

    let root_for_rel = config.relpath_root.as_deref().map(resolve_dir);
    let scan_root = filewalker::scan_root(&config.target)?;

    let writer = ReportWriter::create(&config.output_path, root_for_rel, generated_at).await?;
    writer.write_report(&records).await?;

    let tree = DirectoryTree::build(&records, &scan_root);
    writer.write_directory_pages(&tree).await?;

    Ok(writer.output_path().to_path_buf())
}

/// Canonical form when the directory exists, plain absolute form otherwise.
fn resolve_dir(dir: &Path) -> PathBuf {
    dir.canonicalize()
        .or_else(|_| std::path::absolute(dir))
        .unwrap_or_else(|_| dir.to_path_buf())
}
