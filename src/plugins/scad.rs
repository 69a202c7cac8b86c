//! OpenSCAD models. The leading comment block is treated as the file's notes.

use super::{FilePlugin, IndexOptions, has_extension};
use crate::record::IndexRecord;
use std::path::Path;

pub struct ScadPlugin;

impl FilePlugin for ScadPlugin {
    fn name(&self) -> &'static str {
        "scad"
    }

    fn can_handle(&self, path: &Path) -> bool {
        has_extension(path, &["scad"])
    }

    fn index(&self, path: &Path, _options: &IndexOptions) -> IndexRecord {
        let record = IndexRecord::new(path);
        match std::fs::read_to_string(path) {
            Ok(source) => record.with_notes(&leading_comment(&source)),
            Err(err) => record.with_error(format!("IO error: {err}")),
        }
    }
}

/// Text of the `//` lines or `/* */` block that opens the file, markers removed.
fn leading_comment(source: &str) -> String {
    let source = source.trim_start();

    if let Some(rest) = source.strip_prefix("/*") {
        let body = rest.split("*/").next().unwrap_or(rest);
        return body
            .lines()
            .map(|line| line.trim().trim_start_matches('*').trim())
            .collect::<Vec<_>>()
            .join("\n");
    }

    source
        .lines()
        .map(str::trim)
        .take_while(|line| line.starts_with("//"))
        .map(|line| line.trim_start_matches('/').trim())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comments() {
        let src = "// Hinge, 3mm pin\n// print with supports\n\nmodule hinge() {}\n// trailing\n";
        assert_eq!(leading_comment(src), "Hinge, 3mm pin\nprint with supports");
    }

    #[test]
    fn test_block_comment() {
        let src = "/*\n * Gear box\n * v3\n */\ncube(1);";
        assert_eq!(crate::record::normalize_newlines(&leading_comment(src)), "Gear box\nv3");
    }

    #[test]
    fn test_no_comment() {
        assert_eq!(leading_comment("cube([1, 2, 3]);"), "");
    }
}
