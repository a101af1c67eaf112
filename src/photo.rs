use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Descriptor of one source photograph.
///
/// Dimensions must be resolved by the caller; this crate never opens the
/// file behind `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// EXIF-style orientation code, informational only.
    #[serde(default)]
    pub orientation: i32,
}

impl Photo {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32, orientation: i32) -> Self {
        Photo {
            path: path.into(),
            width,
            height,
            orientation,
        }
    }

    /// Native height/width ratio of the photograph.
    pub fn ratio(&self) -> f64 {
        self.height as f64 / self.width as f64
    }
}
