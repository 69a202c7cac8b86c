//! LightBurn laser project files (`.lbrn`, `.lbrn2`).
//!
//! These are plain XML. Notes live in a `<Notes>` element, either as a `Notes`
//! attribute or as element text, and the preview image is an unpadded base64
//! payload on a `<Thumbnail>` element.

use super::{FilePlugin, IndexOptions, has_extension};
use crate::THUMBNAIL_MARKER;
use crate::error::{ExtractError, Result};
use crate::record::IndexRecord;
use base64::{Engine, engine::general_purpose::STANDARD};
use content_inspector::{ContentType, inspect};
use log::debug;
use memmap2::MmapOptions;
use std::fs::File;
use std::path::{Path, PathBuf};
use xml::reader::{EventReader, XmlEvent};

const EXTENSIONS: &[&str] = &["lbrn", "lbrn2"];

pub struct LightBurnPlugin;

impl FilePlugin for LightBurnPlugin {
    fn name(&self) -> &'static str {
        "lightburn"
    }

    fn can_handle(&self, path: &Path) -> bool {
        has_extension(path, EXTENSIONS)
    }

    fn index(&self, path: &Path, options: &IndexOptions) -> IndexRecord {
        let record = IndexRecord::new(path);

        let document = match load_document(path) {
            Ok(document) => document,
            Err(err) => return record.with_error(err),
        };

        let record = record.with_notes(&find_notes(&document));

        match extract_thumbnail(path, &document, options.overwrite_thumbnails) {
            Ok(thumbnail) => record.with_thumbnail(thumbnail),
            Err(err) => {
                debug!("Thumbnail extraction failed for {}: {}", path.display(), err);
                record.with_error(err)
            }
        }
    }
}

/// Just enough of an XML element tree for tag lookups.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    /// Text before the first child element.
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Pre-order traversal including `self`.
    fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.push(self);
        for child in &self.children {
            child.collect_into(out);
        }
    }

    fn iter_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().into_iter().filter(move |e| e.name == name)
    }
}

fn load_document(path: &Path) -> Result<Element> {
    let file = File::open(path)?;
    let mmap = unsafe { MmapOptions::new().map(&file)? };

    let sample_size = std::cmp::min(8192, mmap.len());
    if inspect(&mmap[..sample_size]) == ContentType::BINARY {
        return Err(ExtractError::BinaryContent);
    }

    parse_document(&mmap[..])
}

fn parse_document(bytes: &[u8]) -> Result<Element> {
    let reader = EventReader::new(bytes);
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    for event in reader {
        match event? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => stack.push(Element {
                name: name.local_name,
                attributes: attributes
                    .into_iter()
                    .map(|a| (a.name.local_name, a.value))
                    .collect(),
                ..Element::default()
            }),
            XmlEvent::EndElement { .. } => {
                if let Some(done) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => root = Some(done),
                    }
                }
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) | XmlEvent::Whitespace(text) => {
                if let Some(current) = stack.last_mut() {
                    if current.children.is_empty() {
                        current.text.push_str(&text);
                    }
                }
            }
            _ => {}
        }
    }

    root.ok_or_else(|| ExtractError::Malformed("document has no root element".to_string()))
}

/// Notes from the first `<Notes>` element: a non-empty `Notes` attribute wins
/// over the element text. No element means no notes.
fn find_notes(document: &Element) -> String {
    let Some(notes) = document.iter_named("Notes").next() else {
        return String::new();
    };

    match notes.attribute("Notes").map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => notes.text.trim().to_string(),
    }
}

/// First non-empty base64 payload across all `<Thumbnail>` elements, trying the
/// `Source` attribute, the element text, then a nested `<Source>` element.
fn find_thumbnail_payload(document: &Element) -> Result<&str> {
    for thumb in document.iter_named("Thumbnail") {
        let source = thumb.attribute("Source").map(str::trim).unwrap_or_default();
        if !source.is_empty() {
            return Ok(source);
        }

        let text = thumb.text.trim();
        if !text.is_empty() {
            return Ok(text);
        }

        if let Some(source) = thumb.children.iter().find(|c| c.name == "Source") {
            let text = source.text.trim();
            if !text.is_empty() {
                return Ok(text);
            }
        }
    }

    Err(ExtractError::NoThumbnail)
}

/// Decodes a possibly unpadded, possibly line-wrapped base64 payload.
fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    let mut data: String = payload.split_whitespace().collect();
    let pad = (4 - data.len() % 4) % 4;
    data.push_str(&"=".repeat(pad));
    Ok(STANDARD.decode(data)?)
}

/// File extension for an image blob, judged by its magic bytes.
fn sniff_extension(blob: &[u8]) -> &'static str {
    if blob.starts_with(b"\x89PNG\r\n\x1a\n") {
        ".png"
    } else if blob.starts_with(b"\xff\xd8\xff") {
        ".jpg"
    } else if blob.starts_with(b"GIF87a") || blob.starts_with(b"GIF89a") {
        ".gif"
    } else if blob.starts_with(b"RIFF") && blob.get(8..12) == Some(b"WEBP".as_slice()) {
        ".webp"
    } else {
        ".bin"
    }
}

/// `<stem>_thumbnail<ext>` next to the source file.
fn thumbnail_path_for(source: &Path, ext: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("{stem}{THUMBNAIL_MARKER}{ext}"))
}

fn extract_thumbnail(source: &Path, document: &Element, overwrite: bool) -> Result<PathBuf> {
    let blob = decode_base64(find_thumbnail_payload(document)?)?;
    let output = thumbnail_path_for(source, sniff_extension(&blob));

    if output.exists() && !overwrite {
        return Err(ExtractError::ThumbnailExists(output));
    }

    std::fs::write(&output, &blob)?;
    debug!("Wrote thumbnail: {}", output.display());
    Ok(output)
}
