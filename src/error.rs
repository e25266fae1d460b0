use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Failed to decode input image: {0}")]
    ImageDecode(String),
    #[error("Failed to decode mask: {0}")]
    MaskDecode(String),
    #[error("Content policy rejection: {0}")]
    ContentPolicy(String),
    #[error("Model returned no output")]
    EmptyOutput,
    #[error("Generation failed: {0}")]
    Generation(String),
    #[error("Failed to fetch upstream image: {0}")]
    UpstreamFetch(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EditorError {
    /// HTTP status the server surface reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            EditorError::Configuration(_) => 401,
            EditorError::InvalidRequest(_) => 400,
            EditorError::ImageDecode(_) | EditorError::MaskDecode(_) => 415,
            EditorError::ContentPolicy(_) => 422,
            EditorError::EmptyOutput | EditorError::UpstreamFetch(_) => 502,
            EditorError::Generation(_) | EditorError::Serialization(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
