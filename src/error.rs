use miette::Diagnostic;
use thiserror::Error;

/// Main error type for piecetrim operations
#[derive(Error, Diagnostic, Debug)]
pub enum TrimError {
    #[error("IO error: {0}")]
    #[diagnostic(code(piecetrim::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(piecetrim::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Image error with {path}: {message}")]
    #[diagnostic(code(piecetrim::image))]
    Image {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(piecetrim::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid bounds: {message}")]
    #[diagnostic(code(piecetrim::bounds))]
    InvalidBounds { message: String },

    #[error("Piece {piece_id}: bounds describe {expected} but cropped image is {actual}")]
    #[diagnostic(
        code(piecetrim::dimension_mismatch),
        help("metadata must match the written pixels exactly; the batch was aborted")
    )]
    DimensionMismatch {
        piece_id: String,
        expected: String,
        actual: String,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(piecetrim::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl TrimError {
    /// Build a dimension mismatch error from two `(width, height)` pairs.
    pub fn dimension_mismatch(
        piece_id: impl Into<String>,
        expected: (u32, u32),
        actual: (u32, u32),
    ) -> Self {
        TrimError::DimensionMismatch {
            piece_id: piece_id.into(),
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrimError>;
