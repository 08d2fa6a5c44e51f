//! Error types for the air drawing library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[cfg(feature = "vision")]
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[cfg(feature = "vision")]
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Markup could not be read or written
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark data did not describe a usable hand
    #[error("Landmark error: {0}")]
    Landmark(String),

    /// A required annotation is absent from a source document
    #[error("Missing annotation: {0}")]
    MissingAnnotation(String),

    /// Source document is structurally unusable
    #[error("Source document error: {0}")]
    SourceDocument(String),

    /// Writing a trace document failed
    #[error("Export error: {0}")]
    Export(String),

    /// No frame could be acquired for this tick
    #[error("Acquisition error: {0}")]
    Acquisition(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(quick_xml::Error::from(err))
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
