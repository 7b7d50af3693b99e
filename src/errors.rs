// src/errors.rs
use thiserror::Error;

use crate::workflow::Stage;

/// Rejections raised by the workflow state machine itself. None of these
/// touch the live run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Another operation is already in progress")]
    Busy,

    #[error("Action not allowed while {actual}; expected {expected}")]
    InvalidStage { expected: Stage, actual: Stage },

    #[error("Description must not be empty")]
    EmptyDescription,

    #[error("Response belongs to a run that is no longer active")]
    StaleTicket,
}

#[derive(Error, Debug)]
pub enum GymError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Could not read image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("API returned an error: {0}")]
    ApiResponse(String),

    #[error("Unexpected response structure: {0}")]
    UnexpectedResponse(String),

    #[error("Received empty text response from model")]
    EmptyResponse,

    #[error("{0}")]
    MalformedResponse(String),

    #[error("{0}")]
    NoImageGenerated(String),

    #[error("Unsupported upload type '{0}', expected an image")]
    UnsupportedMediaType(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl GymError {
    /// True when the error carries a message of its own worth showing.
    /// Variants wrapping an empty string from a provider have nothing to say.
    pub fn has_detail(&self) -> bool {
        match self {
            GymError::ApiResponse(m)
            | GymError::UnexpectedResponse(m)
            | GymError::MalformedResponse(m)
            | GymError::NoImageGenerated(m)
            | GymError::UnsupportedMediaType(m)
            | GymError::Config(m) => !m.trim().is_empty(),
            other => !other.to_string().trim().is_empty(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GymError>;
