//! Resource Directory Scan

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::patcher::PatchError;

/// One media file on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceFile {
    pub filename: String,
    /// Xcode `lastKnownFileType`
    pub kind: String,
}

impl ResourceFile {
    pub fn new(filename: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            kind: kind.into(),
        }
    }
}

/// Map an extension to the `lastKnownFileType` Xcode records for it
pub fn file_type_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "mp3" => "audio.mp3",
        "wav" => "audio.wav",
        "aif" | "aiff" => "audio.aiff",
        "png" => "image.png",
        "jpg" | "jpeg" => "image.jpeg",
        "json" => "text.json",
        _ => "file",
    }
}

/// True when `name` reads back unchanged from a `/* name */` annotation.
///
/// The annotation cannot hold `*`, `/` or a line break, and surrounding
/// whitespace is lost when the comment is scanned.
pub fn is_annotation_safe(name: &str) -> bool {
    !name.is_empty()
        && name.trim() == name
        && !name.contains(|c: char| matches!(c, '*' | '/' | '\n' | '\r'))
}

/// List regular files in `dir` with the given extension, sorted by name.
///
/// Not recursive. Names that are not valid UTF-8, or that would not survive
/// a round trip through the manifest, are skipped with a warning.
pub fn scan_available(dir: &Path, extension: &str) -> Result<Vec<String>, PatchError> {
    let io_err = |source: std::io::Error| PatchError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = vec![];
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().map_or(false, |e| e == extension) {
            match entry.file_name().into_string() {
                Ok(name) if is_annotation_safe(&name) => files.push(name),
                Ok(name) => tracing::warn!(
                    %name,
                    "skipping file name that cannot be annotated in the manifest"
                ),
                Err(name) => tracing::warn!(?name, "skipping non UTF-8 file name"),
            }
        }
    }
    files.sort();
    tracing::debug!(dir = %dir.display(), count = files.len(), "scanned resource directory");
    Ok(files)
}
