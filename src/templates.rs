//! Markdown rendering of report views.
//!
//! Views are plain data assembled by the writer. Nothing here touches the
//! filesystem, so output depends only on the view contents.

use crate::utils::{md_code_span, md_escape_cell, md_escape_link_text, md_link_target};

const TABLE_HEADER: &str = "| Thumbnail | File | Notes | Error |\n|---|---|---|---|\n";

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    /// Image source for the thumbnail, when one exists on disk.
    pub thumbnail: Option<String>,
    pub file: String,
    pub notes: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeView {
    pub title: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdirView {
    pub name: String,
    pub link: String,
    pub readme: Option<ReadmeView>,
}

#[derive(Debug, Clone)]
pub struct ReportView {
    pub generated_at: String,
    pub records: Vec<RecordView>,
}

#[derive(Debug, Clone)]
pub struct DirectoryPageView {
    pub title: String,
    pub generated_at: String,
    pub parent_link: Option<String>,
    pub report_link: String,
    pub subdirs: Vec<SubdirView>,
    pub records: Vec<RecordView>,
}

pub fn render_report(view: &ReportView) -> String {
    let mut out = format!("# Maker File Index - {}\n\n", view.generated_at);
    out.push_str(&format!("- Files scanned: **{}**\n\n", view.records.len()));
    out.push_str(&render_table(&view.records));
    out
}

pub fn render_directory_page(view: &DirectoryPageView) -> String {
    let mut out = format!("# {}\n\n", view.title);
    out.push_str(&format!("_Generated {}_\n\n", view.generated_at));

    let mut nav = Vec::new();
    if let Some(parent) = &view.parent_link {
        nav.push(format!("[Up]({})", md_link_target(parent)));
    }
    nav.push(format!("[Full report]({})", md_link_target(&view.report_link)));
    out.push_str(&nav.join(" | "));
    out.push_str("\n\n");

    if !view.subdirs.is_empty() {
        out.push_str("## Subdirectories\n\n");
        for subdir in &view.subdirs {
            out.push_str(&format!(
                "- [{}/]({})",
                md_escape_link_text(&subdir.name),
                md_link_target(&subdir.link)
            ));
            if let Some(readme) = &subdir.readme {
                out.push_str(&format!(
                    " - [{}]({})",
                    md_escape_link_text(&readme.title),
                    md_link_target(&readme.link)
                ));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    if !view.records.is_empty() {
        out.push_str(&format!("## Files ({})\n\n", view.records.len()));
        out.push_str(&render_table(&view.records));
    }

    out
}

fn render_table(records: &[RecordView]) -> String {
    let mut out = String::from(TABLE_HEADER);
    for record in records {
        let thumb = record
            .thumbnail
            .as_deref()
            .map(|src| format!("<img src='{src}' height=256 width=256>"))
            .unwrap_or_default();

        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            thumb,
            md_code_span(&md_escape_cell(&record.file)),
            md_escape_cell(&record.notes),
            md_escape_cell(&record.error),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(file: &str, notes: &str) -> RecordView {
        RecordView {
            thumbnail: None,
            file: file.to_string(),
            notes: notes.to_string(),
            error: String::new(),
        }
    }

    #[test]
    fn test_report_escapes_cells() {
        let view = ReportView {
            generated_at: "2026-01-01T00:00:00+00:00".to_string(),
            records: vec![row("a.lbrn2", "speed|power\n80|20")],
        };
        let out = render_report(&view);
        assert!(out.starts_with("# Maker File Index - 2026-01-01T00:00:00+00:00\n"));
        assert!(out.contains("- Files scanned: **1**"));
        assert!(out.contains(r"|  | `a.lbrn2` | speed\|power<br>80\|20 |  |"));
    }

    #[test]
    fn test_thumbnail_cell() {
        let mut record = row("a.lbrn2", "");
        record.thumbnail = Some("a_thumbnail.png".to_string());
        let out = render_table(&[record]);
        assert!(out.contains("<img src='a_thumbnail.png' height=256 width=256>"));
    }

    #[test]
    fn test_directory_page_sections() {
        let view = DirectoryPageView {
            title: "jobs".to_string(),
            generated_at: "now".to_string(),
            parent_link: Some("../index.md".to_string()),
            report_link: "../../report.md".to_string(),
            subdirs: vec![SubdirView {
                name: "signs".to_string(),
                link: "signs/index.md".to_string(),
                readme: Some(ReadmeView {
                    title: "Shop signs".to_string(),
                    link: "../../../src/jobs/signs/README.md".to_string(),
                }),
            }],
            records: vec![],
        };
        let out = render_directory_page(&view);
        assert!(out.contains("[Up](../index.md) | [Full report](../../report.md)"));
        assert!(out.contains(
            "- [signs/](signs/index.md) - [Shop signs](../../../src/jobs/signs/README.md)"
        ));
        assert!(!out.contains("## Files"));
    }

    #[test]
    fn test_link_text_and_code_spans_are_escaped() {
        let view = DirectoryPageView {
            title: "root".to_string(),
            generated_at: "now".to_string(),
            parent_link: None,
            report_link: "../index.md".to_string(),
            subdirs: vec![SubdirView {
                name: "jigs".to_string(),
                link: "jigs/index.md".to_string(),
                readme: Some(ReadmeView {
                    title: "Jigs [v2]".to_string(),
                    link: "README.md".to_string(),
                }),
            }],
            records: vec![row("it`s.lbrn2", "")],
        };
        let out = render_directory_page(&view);
        assert!(out.contains(r"- [jigs/](jigs/index.md) - [Jigs \[v2\]](README.md)"));
        assert!(out.contains("| `` it`s.lbrn2 `` |"));
    }
}
