//! Rebuilds the directory tree implied by a flat list of records.
//!
//! Every directory holding a record gets a page, and so does every ancestor
//! between it and the scan root, even when those ancestors hold no records.

use crate::record::IndexRecord;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct DirectoryTree<'a> {
    root: PathBuf,
    by_directory: BTreeMap<PathBuf, Vec<&'a IndexRecord>>,
    directories: BTreeSet<PathBuf>,
}

impl<'a> DirectoryTree<'a> {
    /// Partitions `records` by directory and closes the set over ancestors up
    /// to `root`. The root is always part of the tree.
    pub fn build(records: &'a [IndexRecord], root: &Path) -> Self {
        let mut by_directory: BTreeMap<PathBuf, Vec<&'a IndexRecord>> = BTreeMap::new();
        for record in records {
            by_directory
                .entry(record.directory.clone())
                .or_default()
                .push(record);
        }

        let mut directories = BTreeSet::new();
        directories.insert(root.to_path_buf());

        for dir in by_directory.keys() {
            let mut current = dir.as_path();
            loop {
                // Already seen means its ancestors were walked too.
                if !directories.insert(current.to_path_buf()) && current != dir.as_path() {
                    break;
                }
                if current == root {
                    break;
                }
                match current.parent() {
                    Some(parent) if parent != current => current = parent,
                    _ => {
                        debug!(
                            "Reached filesystem root from {} without meeting {}",
                            dir.display(),
                            root.display()
                        );
                        break;
                    }
                }
            }
        }

        Self {
            root: root.to_path_buf(),
            by_directory,
            directories,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All directories in the tree, parents before children.
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.directories.iter().map(PathBuf::as_path)
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.directories.contains(dir)
    }

    /// Immediate children of `dir` that are part of the tree, sorted case-insensitively by name.
    pub fn children(&self, dir: &Path) -> Vec<&Path> {
        let mut children: Vec<&Path> = self
            .directories
            .iter()
            .map(PathBuf::as_path)
            .filter(|d| d.parent() == Some(dir) && *d != dir)
            .collect();
        children.sort_by_cached_key(|d| sort_key(d));
        children
    }

    /// Records directly inside `dir`, sorted case-insensitively by file name.
    pub fn records_in(&self, dir: &Path) -> Vec<&'a IndexRecord> {
        let mut records = self.by_directory.get(dir).cloned().unwrap_or_default();
        records.sort_by_cached_key(|r| {
            let name = r.file_name();
            (name.to_lowercase(), name)
        });
        records
    }

    /// Page location relative to the output directory: `dirs/<rel>/index.md`,
    /// or `dirs/index.md` for the root. `None` outside the root.
    pub fn page_path(&self, dir: &Path) -> Option<PathBuf> {
        let rel = dir.strip_prefix(&self.root).ok()?;
        Some(Path::new("dirs").join(rel).join("index.md"))
    }
}

fn sort_key(path: &Path) -> (String, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (name.to_lowercase(), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str) -> IndexRecord {
        IndexRecord::new(Path::new(path))
    }

    #[test]
    fn test_ancestor_closure() {
        let records = vec![
            record("/root/A/file1.lbrn2"),
            record("/root/B/C/file2.lbrn2"),
        ];
        let tree = DirectoryTree::build(&records, Path::new("/root"));

        let dirs: Vec<&Path> = tree.directories().collect();
        assert_eq!(
            dirs,
            vec![
                Path::new("/root"),
                Path::new("/root/A"),
                Path::new("/root/B"),
                Path::new("/root/B/C"),
            ]
        );

        assert_eq!(
            tree.children(Path::new("/root")),
            vec![Path::new("/root/A"), Path::new("/root/B")]
        );
        assert!(tree.records_in(Path::new("/root")).is_empty());
        assert!(tree.records_in(Path::new("/root/B")).is_empty());
        assert_eq!(tree.records_in(Path::new("/root/B/C")).len(), 1);
    }

    #[test]
    fn test_every_directory_has_its_ancestors() {
        let records = vec![
            record("/r/x/y/z/a.stl"),
            record("/r/x/b.stl"),
            record("/r/q/w/c.stl"),
        ];
        let tree = DirectoryTree::build(&records, Path::new("/r"));

        for dir in tree.directories() {
            let mut current = dir;
            while current != Path::new("/r") {
                current = current.parent().unwrap();
                assert!(tree.contains(current), "missing ancestor {}", current.display());
            }
        }
    }

    #[test]
    fn test_root_present_without_records() {
        let tree = DirectoryTree::build(&[], Path::new("/empty"));
        assert_eq!(tree.directories().count(), 1);
        assert!(tree.contains(Path::new("/empty")));
    }

    #[test]
    fn test_walk_stops_at_filesystem_root() {
        let records = vec![record("/elsewhere/file.stl")];
        let tree = DirectoryTree::build(&records, Path::new("/root"));
        assert!(tree.contains(Path::new("/elsewhere")));
        assert!(tree.contains(Path::new("/")));
        assert_eq!(tree.page_path(Path::new("/elsewhere")), None);
    }

    #[test]
    fn test_records_sorted_by_name() {
        let records = vec![
            record("/r/b.stl"),
            record("/r/C.stl"),
            record("/r/a.stl"),
        ];
        let tree = DirectoryTree::build(&records, Path::new("/r"));
        let names: Vec<String> = tree
            .records_in(Path::new("/r"))
            .iter()
            .map(|r| r.file_name())
            .collect();
        assert_eq!(names, vec!["a.stl", "b.stl", "C.stl"]);
    }

    #[test]
    fn test_page_paths() {
        let tree = DirectoryTree::build(&[], Path::new("/r"));
        assert_eq!(tree.page_path(Path::new("/r")), Some(PathBuf::from("dirs/index.md")));
        assert_eq!(
            tree.page_path(Path::new("/r/a/b")),
            Some(PathBuf::from("dirs/a/b/index.md"))
        );
    }
}
