use thiserror::Error;

use crate::tiles::{StructureKind, TileId};

/// Configuration and construction failures. Raised before (or instead of)
/// exporting anything, so a partial map never leaves the composer.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("map dimensions {width}x{height} must be between 2 and 256 on each axis")]
    InvalidDimensions { width: usize, height: usize },

    #[error("region `{region}` has a malformed shape: {reason}")]
    MalformedShape { region: String, reason: String },

    #[error("{kind} `{name}` at ({x}, {y}) does not fit a {width}x{height} map")]
    StructureOutOfBounds {
        name: String,
        kind: StructureKind,
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("coordinate ({x}, {y}) of `{name}` does not fit in 8 bits")]
    CoordinateOutOfRange { name: String, x: i64, y: i64 },

    #[error("region `{region}` places unknown landmark `{name}`")]
    UnknownLandmark { region: String, name: String },

    #[error("landmark `{0}` is declared more than once")]
    DuplicateLandmark(String),

    #[error("landmark `{0}` is placed more than once")]
    DuplicatePlacement(String),

    #[error("landmark `{0}` is declared but never placed")]
    UnplacedLandmark(String),

    #[error("invalid decoration parameters: {0}")]
    InvalidDecoration(String),

    #[error("tile id {id} at ({x}, {y}) is outside every declared tile range")]
    UndeclaredTile { x: usize, y: usize, id: TileId },
}

/// Output failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to format output: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("runtime header fixes {name} at {expected}, map has {actual}")]
    RuntimeLayout {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}
