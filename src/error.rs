//! Error types for the layout-eval library.

use thiserror::Error;

/// Result type for layout-eval operations.
pub type Result<T> = std::result::Result<T, LayoutEvalError>;

/// Error types that can occur while detecting or evaluating layouts.
#[derive(Error, Debug)]
pub enum LayoutEvalError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while decoding or encoding an image.
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    /// Error while parsing a TOML configuration file.
    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Invalid annotation data.
    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(String),

    /// Invalid bounding box coordinates.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// Annotation references a category id that the document does not declare.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Missing required field in the ground truth document.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// IoU threshold outside [0, 1].
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Configuration value out of range.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The uploaded image contained no bytes.
    #[error("Empty image file")]
    EmptyImage,

    /// The layout model failed to produce detections.
    #[error("Layout model error: {0}")]
    ModelError(String),
}

impl LayoutEvalError {
    /// Whether the error was caused by caller-supplied input.
    ///
    /// A front end maps these to a 4xx response; everything else is a
    /// server-side failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LayoutEvalError::JsonError(_)
                | LayoutEvalError::ImageError(_)
                | LayoutEvalError::InvalidAnnotation(_)
                | LayoutEvalError::InvalidBoundingBox(_)
                | LayoutEvalError::UnknownCategory(_)
                | LayoutEvalError::MissingField(_)
                | LayoutEvalError::EmptyImage
        )
    }
}
