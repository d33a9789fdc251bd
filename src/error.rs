//! Error handling for the scoring engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CvMatchError {
    /// Missing or too-short input; the caller has to fix the input before retrying.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("could not parse résumé: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, CvMatchError>;

impl CvMatchError {
    /// Input errors are the caller's to fix; everything else is environmental.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CvMatchError::Validation(_) | CvMatchError::Parse(_) | CvMatchError::InvalidInput(_)
        )
    }
}
