use std::path::{Component, Path, PathBuf};

/// Escapes text for a Markdown table cell: pipes are escaped and newlines
/// become `<br>`.
pub fn md_escape_cell(text: &str) -> String {
    text.replace('|', r"\|").replace('\n', "<br>")
}

/// Escapes brackets so text can sit inside `[...]` link text.
pub fn md_escape_link_text(text: &str) -> String {
    text.replace('[', r"\[").replace(']', r"\]")
}

/// Inline code span whose fence is one backtick longer than the longest run
/// of backticks in `text`.
pub fn md_code_span(text: &str) -> String {
    let longest = text
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    if longest == 0 {
        return format!("`{text}`");
    }
    let fence = "`".repeat(longest + 1);
    format!("{fence} {text} {fence}")
}

/// `path` relative to `root` when possible, otherwise `path` unchanged.
pub fn display_path(path: &Path, root: Option<&Path>) -> PathBuf {
    root.and_then(|r| path.strip_prefix(r).ok())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

/// Link from a page living in `from_dir` to `target`, using `/` separators.
/// Falls back to the absolute target when the two share no common prefix.
pub fn relative_link(from_dir: &Path, target: &Path) -> String {
    let from: Vec<Component> = from_dir.components().collect();
    let to: Vec<Component> = target.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    if common == 0 {
        return target.to_string_lossy().replace('\\', "/");
    }

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Wraps a link destination in angle brackets when it contains spaces.
pub fn md_link_target(link: &str) -> String {
    if link.contains(' ') {
        format!("<{link}>")
    } else {
        link.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md_escape_cell() {
        assert_eq!(md_escape_cell("a|b\nc"), r"a\|b<br>c");
        assert_eq!(md_escape_cell(""), "");
    }

    #[test]
    fn test_md_escape_link_text() {
        assert_eq!(md_escape_link_text("Jig [v2]"), r"Jig \[v2\]");
        assert_eq!(md_escape_link_text("plain"), "plain");
    }

    #[test]
    fn test_md_code_span() {
        assert_eq!(md_code_span("a.lbrn2"), "`a.lbrn2`");
        assert_eq!(md_code_span("it`s.stl"), "`` it`s.stl ``");
        assert_eq!(md_code_span("a``b"), "``` a``b ```");
    }

    #[test]
    fn test_display_path() {
        let path = Path::new("/work/jobs/sign.lbrn2");
        assert_eq!(
            display_path(path, Some(Path::new("/work"))),
            PathBuf::from("jobs/sign.lbrn2")
        );
        assert_eq!(display_path(path, Some(Path::new("/other"))), path);
        assert_eq!(display_path(path, None), path);
    }

    #[test]
    fn test_relative_link() {
        assert_eq!(
            relative_link(Path::new("/out/dirs/a"), Path::new("/out/dirs/a/b/index.md")),
            "b/index.md"
        );
        assert_eq!(
            relative_link(Path::new("/out/dirs/a/b"), Path::new("/out/dirs/index.md")),
            "../../index.md"
        );
        assert_eq!(
            relative_link(Path::new("/out/dirs"), Path::new("/src/x/README.md")),
            "../../src/x/README.md"
        );
    }

    #[test]
    fn test_md_link_target() {
        assert_eq!(md_link_target("a/b.md"), "a/b.md");
        assert_eq!(md_link_target("my dir/b.md"), "<my dir/b.md>");
    }
}
