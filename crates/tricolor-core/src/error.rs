use thiserror::Error;

use crate::channel::Band;

#[derive(Error, Debug)]
pub enum TricolorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "Shape mismatch: {what} is {}x{}, expected {}x{}",
        .found.0, .found.1, .expected.0, .expected.1
    )]
    ShapeMismatch {
        what: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Empty {0} channel")]
    EmptyChannel(Band),

    #[error("Invalid scale range: min={scale_min}, max={scale_max} (need 0 < min < max)")]
    InvalidRange { scale_min: f64, scale_max: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid array data: {0}")]
    InvalidArray(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

impl TricolorError {
    pub fn shape_mismatch(
        what: impl Into<String>,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            found,
        }
    }
}

pub type Result<T> = std::result::Result<T, TricolorError>;
