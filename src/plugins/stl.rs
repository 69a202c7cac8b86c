//! STL meshes. There is no notes field in the format, so the solid name (ASCII)
//! or the 80-byte header text (binary) stands in, followed by the triangle count.

use super::{FilePlugin, IndexOptions, has_extension};
use crate::error::{ExtractError, Result};
use crate::record::IndexRecord;
use memmap2::MmapOptions;
use std::fs::File;
use std::path::Path;

const HEADER_LEN: usize = 80;
const TRIANGLE_LEN: usize = 50;

pub struct StlPlugin;

impl FilePlugin for StlPlugin {
    fn name(&self) -> &'static str {
        "stl"
    }

    fn can_handle(&self, path: &Path) -> bool {
        has_extension(path, &["stl"])
    }

    fn index(&self, path: &Path, _options: &IndexOptions) -> IndexRecord {
        let record = IndexRecord::new(path);
        match describe(path) {
            Ok(notes) => record.with_notes(&notes),
            Err(err) => record.with_error(err),
        }
    }
}

fn describe(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mmap = unsafe { MmapOptions::new().map(&file)? };
    describe_bytes(&mmap)
}

fn describe_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(triangles) = binary_triangle_count(bytes) {
        let header: String = String::from_utf8_lossy(&bytes[..HEADER_LEN])
            .chars()
            .filter(|c| !c.is_control())
            .collect();
        return Ok(join_notes(header.trim(), triangles));
    }

    if bytes.starts_with(b"solid") {
        let text = String::from_utf8_lossy(bytes);
        let mut lines = text.lines();
        let name = lines
            .next()
            .map(|first| first.trim_start_matches("solid").trim())
            .unwrap_or_default();
        let facets = lines
            .filter(|line| line.trim_start().starts_with("facet"))
            .count();
        return Ok(join_notes(name, facets));
    }

    Err(ExtractError::Malformed(
        "neither ASCII nor binary STL".to_string(),
    ))
}

/// Triangle count when the length matches the binary layout exactly.
fn binary_triangle_count(bytes: &[u8]) -> Option<usize> {
    let count_bytes: [u8; 4] = bytes.get(HEADER_LEN..HEADER_LEN + 4)?.try_into().ok()?;
    let count = u32::from_le_bytes(count_bytes) as usize;
    let expected = count.checked_mul(TRIANGLE_LEN)?.checked_add(HEADER_LEN + 4)?;
    (expected == bytes.len()).then_some(count)
}

fn join_notes(name: &str, triangles: usize) -> String {
    if name.is_empty() {
        format!("triangles: {triangles}")
    } else {
        format!("{name}\ntriangles: {triangles}")
    }
}
