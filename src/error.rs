use std::path::PathBuf;
use thiserror::Error;

/// Failures inside a plugin. These never leave `FilePlugin::index`; they are
/// rendered into the record's error string instead.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    Xml(#[from] xml::reader::Error),
    #[error("Binary content, not an XML project file")]
    BinaryContent,
    #[error("No thumbnail found. Expected a <Thumbnail> element with base64 data.")]
    NoThumbnail,
    #[error("Thumbnail base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Output file already exists: {} (overwrite disabled)", .0.display())]
    ThumbnailExists(PathBuf),
    #[error("Malformed file: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
