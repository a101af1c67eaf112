//! Persisted collage document: page parameters, border styling and the
//! ordered photo list. The laid-out page itself is never serialized; on
//! load the document is handed back to the layout driver.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::photo::Photo;

pub const FILE_FORMAT_VERSION: u32 = 1;
pub const FILE_EXTENSION: &str = "collage";

// A4 landscape at 300 dpi.
const DEFAULT_WIDTH: u32 = 3508;
const DEFAULT_HEIGHT: u32 = 2480;
const DEFAULT_BORDER_COLOR: &str = "#00ffff";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed collage document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unsupported collage file format version {0} (expected {FILE_FORMAT_VERSION})")]
    UnsupportedVersion(u32),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollageDocument {
    pub format_version: u32,
    pub name: Option<String>,
    /// Output page size in pixels.
    pub width: u32,
    pub height: u32,
    /// Border styling, passed through to the renderer.
    pub border_color: String,
    pub border_thickness: f64,
    pub saved_at: Option<DateTime<Utc>>,
    pub photos: Vec<Photo>,
}

impl Default for CollageDocument {
    fn default() -> Self {
        CollageDocument {
            format_version: FILE_FORMAT_VERSION,
            name: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            border_thickness: 0.0,
            saved_at: None,
            photos: Vec::new(),
        }
    }
}

impl CollageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses a document, rejecting unknown format versions.
    pub fn open(path: &Path) -> DocumentResult<Self> {
        let json = fs::read_to_string(path)?;
        let document: CollageDocument = serde_json::from_str(&json)?;
        if document.format_version != FILE_FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion(document.format_version));
        }
        Ok(document)
    }

    /// Writes the document as pretty JSON, stamping the save time and
    /// deriving the name from the file stem.
    pub fn save(&mut self, path: &Path) -> DocumentResult<()> {
        self.format_version = FILE_FORMAT_VERSION;
        self.saved_at = Some(Utc::now());
        self.name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string);
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Saved collage document to {}", path.display());
        Ok(())
    }

    pub fn add_photo(&mut self, photo: Photo) {
        self.photos.push(photo);
    }

    pub fn add_photos(&mut self, photos: impl IntoIterator<Item = Photo>) {
        self.photos.extend(photos);
    }

    /// Removes every photo referencing `path`; true if any was removed.
    pub fn remove_photo(&mut self, path: &Path) -> bool {
        let before = self.photos.len();
        self.photos.retain(|photo| photo.path != path);
        self.photos.len() != before
    }

    pub fn clear_photos(&mut self) {
        self.photos.clear();
    }

    pub fn has_photos(&self) -> bool {
        !self.photos.is_empty()
    }

    /// Target height/width ratio of the finished page.
    pub fn page_ratio(&self) -> f64 {
        self.height as f64 / self.width as f64
    }

    /// Conventional file name for this document.
    pub fn file_name(&self) -> Option<PathBuf> {
        self.name
            .as_ref()
            .map(|name| PathBuf::from(format!("{name}.{FILE_EXTENSION}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let document = CollageDocument::new();
        assert_eq!(document.format_version, FILE_FORMAT_VERSION);
        assert_eq!(document.width, 3508);
        assert_eq!(document.height, 2480);
        assert_eq!(document.border_color, "#00ffff");
        assert!(!document.has_photos());
        assert!((document.page_ratio() - 2480.0 / 3508.0).abs() < 1e-12);
    }

    #[test]
    fn test_photo_list_management() {
        let mut document = CollageDocument::new();
        document.add_photo(Photo::new("a.jpg", 100, 200, 1));
        document.add_photos(vec![
            Photo::new("b.jpg", 300, 200, 1),
            Photo::new("a.jpg", 100, 200, 1),
        ]);
        assert_eq!(document.photos.len(), 3);

        assert!(document.remove_photo(Path::new("a.jpg")));
        assert_eq!(document.photos.len(), 1);
        assert!(!document.remove_photo(Path::new("missing.jpg")));

        document.clear_photos();
        assert!(!document.has_photos());
    }

    #[test]
    fn test_file_name_uses_extension() {
        let mut document = CollageDocument::new();
        assert!(document.file_name().is_none());
        document.name = Some("summer".to_string());
        assert_eq!(document.file_name(), Some(PathBuf::from("summer.collage")));
    }
}
