use crate::THUMBNAIL_MARKER;
use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Expands a target (file, directory or glob) into a sorted, deduplicated list
/// of absolute file paths. Generated thumbnails are never included.
pub fn resolve_inputs(target: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let path = Path::new(target);

    let candidates = if path.is_file() {
        vec![path.to_path_buf()]
    } else if path.is_dir() {
        walk_files(path, if recursive { None } else { Some(1) })
    } else {
        expand_glob(target)?
    };

    Ok(dedup_sorted(
        candidates
            .into_iter()
            .filter(|p| !is_generated_thumbnail(p))
            .collect(),
    ))
}

/// The directory that directory pages are rooted at for a given target.
pub fn scan_root(target: &str) -> Result<PathBuf> {
    let path = Path::new(target);

    let root = if path.is_dir() {
        path.to_path_buf()
    } else if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        glob_base(target).0
    };

    root.canonicalize()
        .with_context(|| format!("Failed to resolve scan root: {}", root.display()))
}

/// True when the file name was produced by thumbnail extraction.
pub fn is_generated_thumbnail(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(THUMBNAIL_MARKER))
}

/// Lists regular files under `dir`. Hidden files and ignore files are not
/// filtered: maker project folders are not source trees.
fn walk_files(dir: &Path, max_depth: Option<usize>) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(dir);
    builder.standard_filters(false).max_depth(max_depth);

    let mut files = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() {
                    files.push(path.to_path_buf());
                }
            }
            Err(err) => {
                warn!("Error walking path: {err}");
            }
        }
    }
    files
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let (base, rest) = glob_base(pattern);
    if rest.is_empty() {
        return Ok(Vec::new());
    }

    let matcher: GlobMatcher = GlobBuilder::new(&rest)
        .literal_separator(true)
        .build()
        .with_context(|| format!("Invalid glob pattern: {pattern}"))?
        .compile_matcher();

    // Without `**` the pattern cannot match deeper than its own component count.
    let max_depth = if rest.contains("**") {
        None
    } else {
        Some(Path::new(&rest).components().count())
    };

    debug!("Expanding glob '{}' under {}", rest, base.display());

    Ok(walk_files(&base, max_depth)
        .into_iter()
        .filter(|p| {
            p.strip_prefix(&base)
                .map(|rel| matcher.is_match(rel))
                .unwrap_or(false)
        })
        .collect())
}

/// Splits a glob into its literal leading directory and the wildcard remainder.
fn glob_base(pattern: &str) -> (PathBuf, String) {
    let mut base = PathBuf::new();
    let mut rest = PathBuf::new();
    let mut in_pattern = false;

    for component in Path::new(pattern).components() {
        let text = component.as_os_str().to_string_lossy();
        let wild = text.contains(['*', '?', '[', '{']);
        if in_pattern || wild {
            in_pattern = true;
            rest.push(component.as_os_str());
        } else if !matches!(component, Component::CurDir) {
            base.push(component.as_os_str());
        }
    }

    // A pattern without wildcards names one (missing) path; treat its last part as the pattern.
    if !in_pattern {
        if let Some(name) = base.file_name().map(|n| n.to_os_string()) {
            base.pop();
            rest.push(name);
        }
    }

    if base.as_os_str().is_empty() {
        base = PathBuf::from(".");
    }

    (base, rest.to_string_lossy().replace('\\', "/"))
}

/// Canonicalizes, deduplicates and sorts case-insensitively by path string.
fn dedup_sorted(candidates: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut files: Vec<PathBuf> = candidates
        .into_iter()
        .filter_map(|p| match p.canonicalize() {
            Ok(resolved) => Some(resolved),
            Err(err) => {
                warn!("Skipping {}: {}", p.display(), err);
                None
            }
        })
        .filter(|p| seen.insert(p.clone()))
        .collect();

    files.sort_by_cached_key(|p| {
        let text = p.to_string_lossy().into_owned();
        (text.to_lowercase(), text)
    });
    files
}
