//! Writes the flat report and the per-directory pages.
//!
//! Layout under the output file's directory:
//! - `<report>.md` with every record in one table
//! - `dirs/index.md` for the scan root
//! - `dirs/<relative dir>/index.md` for every other directory in the tree

use crate::grouper::DirectoryTree;
use crate::record::IndexRecord;
use crate::templates::{
    DirectoryPageView, ReadmeView, RecordView, ReportView, SubdirView, render_directory_page,
    render_report,
};
use crate::utils::{display_path, relative_link};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::fs;

const README_NAMES: &[&str] = &["README.md", "README.txt"];

pub struct ReportWriter {
    /// Absolute path of the flat report.
    output_path: PathBuf,
    /// Directory holding the flat report and the `dirs/` tree.
    out_dir: PathBuf,
    root_for_rel: Option<PathBuf>,
    generated_at: String,
}

impl ReportWriter {
    /// Creates the output directory and pins the report to its canonical
    /// location, so every relative link is computed between canonical paths.
    pub async fn create(
        output_path: &Path,
        root_for_rel: Option<PathBuf>,
        generated_at: String,
    ) -> Result<Self> {
        let absolute = std::path::absolute(output_path).with_context(|| {
            format!("Failed to resolve output path: {}", output_path.display())
        })?;
        let file_name = absolute
            .file_name()
            .map(|n| n.to_os_string())
            .with_context(|| format!("Output path has no file name: {}", absolute.display()))?;
        let parent = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        fs::create_dir_all(&parent)
            .await
            .with_context(|| format!("Failed to create output dir: {}", parent.display()))?;
        let out_dir = fs::canonicalize(&parent)
            .await
            .with_context(|| format!("Failed to resolve output dir: {}", parent.display()))?;

        Ok(Self {
            output_path: out_dir.join(file_name),
            out_dir,
            root_for_rel,
            generated_at,
        })
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes the flat report over all records, in scan order.
    pub async fn write_report(&self, records: &[IndexRecord]) -> Result<()> {
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let file = display_path(&record.path, self.root_for_rel.as_deref());
            rows.push(self.record_view(record, file.display().to_string(), &self.out_dir).await);
        }

        let content = render_report(&ReportView {
            generated_at: self.generated_at.clone(),
            records: rows,
        });

        fs::write(&self.output_path, content)
            .await
            .with_context(|| format!("Failed to write {}", self.output_path.display()))?;
        info!("Wrote: {}", self.output_path.display());
        Ok(())
    }

    /// Writes one page per directory in `tree`. Returns the written page paths.
    pub async fn write_directory_pages(&self, tree: &DirectoryTree<'_>) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for dir in tree.directories() {
            let Some(rel_page) = tree.page_path(dir) else {
                debug!("Skipping page for {} (outside scan root)", dir.display());
                continue;
            };

            let page_path = self.out_dir.join(&rel_page);
            let page_dir = page_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.out_dir.clone());

            fs::create_dir_all(&page_dir)
                .await
                .with_context(|| format!("Failed to create dir: {}", page_dir.display()))?;

            let view = self.page_view(tree, dir, &page_dir).await;
            fs::write(&page_path, render_directory_page(&view))
                .await
                .with_context(|| format!("Failed to write {}", page_path.display()))?;
            debug!("Wrote: {}", page_path.display());
            written.push(page_path);
        }

        info!(
            "Wrote {} directory pages under {}",
            written.len(),
            self.out_dir.join("dirs").display()
        );
        Ok(written)
    }

    async fn page_view(
        &self,
        tree: &DirectoryTree<'_>,
        dir: &Path,
        page_dir: &Path,
    ) -> DirectoryPageView {
        let is_root = dir == tree.root();

        let title = if is_root {
            dir.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| dir.display().to_string())
        } else {
            dir.strip_prefix(tree.root())
                .unwrap_or(dir)
                .to_string_lossy()
                .replace('\\', "/")
        };

        let mut subdirs = Vec::new();
        for child in tree.children(dir) {
            let name = child
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let readme = find_readme(child).await.map(|(title, path)| ReadmeView {
                title,
                link: relative_link(page_dir, &path),
            });
            subdirs.push(SubdirView {
                link: format!("{name}/index.md"),
                name,
                readme,
            });
        }

        let mut records = Vec::new();
        for record in tree.records_in(dir) {
            records.push(self.record_view(record, record.file_name(), page_dir).await);
        }

        DirectoryPageView {
            title,
            generated_at: self.generated_at.clone(),
            parent_link: (!is_root).then(|| "../index.md".to_string()),
            report_link: relative_link(page_dir, &self.output_path),
            subdirs,
            records,
        }
    }

    async fn record_view(&self, record: &IndexRecord, file: String, page_dir: &Path) -> RecordView {
        let mut thumbnail = None;
        if let Some(thumb) = &record.thumbnail_path {
            if fs::try_exists(thumb).await.unwrap_or(false) {
                thumbnail = Some(relative_link(page_dir, thumb));
            }
        }

        RecordView {
            thumbnail,
            file,
            notes: record.notes.clone(),
            error: record.error.clone(),
        }
    }
}

/// First `README.md` / `README.txt` directly in `dir`, with its title line.
async fn find_readme(dir: &Path) -> Option<(String, PathBuf)> {
    for &name in README_NAMES {
        let path = dir.join(name);
        let Ok(content) = fs::read_to_string(&path).await else {
            continue;
        };

        let title = content
            .lines()
            .map(|line| line.trim().trim_start_matches('#').trim())
            .find(|line| !line.is_empty())
            .unwrap_or(name)
            .to_string();
        return Some((title, path));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_find_readme_title() -> anyhow::Result<()> {
        let dir = tempdir()?;
        assert!(find_readme(dir.path()).await.is_none());

        std::fs::write(dir.path().join("README.txt"), "\n\n  Coasters  \nmore")?;
        let (title, path) = find_readme(dir.path()).await.unwrap();
        assert_eq!(title, "Coasters");
        assert_eq!(path, dir.path().join("README.txt"));

        std::fs::write(dir.path().join("README.md"), "# Coaster set\n")?;
        let (title, path) = find_readme(dir.path()).await.unwrap();
        assert_eq!(title, "Coaster set");
        assert_eq!(path, dir.path().join("README.md"));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_normalizes_parent_components() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let base = dir.path().canonicalize()?;
        std::fs::create_dir(base.join("proj"))?;

        let writer =
            ReportWriter::create(&base.join("proj/../out/report.md"), None, "now".to_string())
                .await?;
        assert_eq!(writer.output_path(), base.join("out/report.md"));
        assert!(base.join("out").is_dir());

        let thumb = base.join("proj/a_thumbnail.png");
        std::fs::write(&thumb, b"png")?;
        let record = IndexRecord::new(&base.join("proj/a.lbrn2")).with_thumbnail(thumb);
        let view = writer
            .record_view(&record, "a.lbrn2".to_string(), &writer.out_dir)
            .await;
        assert_eq!(view.thumbnail.as_deref(), Some("../proj/a_thumbnail.png"));
        Ok(())
    }
}
