use std::path::PathBuf;

use serde::Serialize;

/// Axis-aligned rectangle in page units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("cannot lay out a collage without photos")]
    NoPhotos,
    #[error("zero-height cell group in column {column} during height adjustment")]
    DegenerateGroup { column: usize },
}

pub type LayoutResult<T> = Result<T, LayoutError>;

/// Geometry of one laid-out cell, as consumed by a renderer.
///
/// `content` is the crop rectangle of the photograph: it covers `frame`
/// entirely, overflowing it on at most one axis.
#[derive(Debug, Clone, Serialize)]
pub struct CellGeometry {
    pub frame: Rect,
    pub content: Rect,
    pub photo_path: PathBuf,
    pub extended: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnGeometry {
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

/// Full renderer-facing description of an adjusted page.
#[derive(Debug, Clone, Serialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub columns: Vec<ColumnGeometry>,
    pub cells: Vec<CellGeometry>,
}
