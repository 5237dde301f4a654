use thiserror::Error;

/// Errors raised while talking to the SWARA backend
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("Invalid server response: {0}")]
    Decode(String),

    #[error("{0}")]
    Rejected(String),
}

pub const RECOMMENDATION_FAILED: &str = "Failed to get recommendations. Please try again.";

impl ClientError {
    /// Message shown to the user in the error banner
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected(message) => message,
            _ => RECOMMENDATION_FAILED,
        }
    }
}

/// A single failed form field check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors surfaced by the sign-up, sign-in and reset-password flows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<ValidationError>),

    #[error("{0}")]
    Rejected(String),

    #[error("Network error. Please try again.")]
    Network(#[source] ClientError),

    #[error("Another request is already in flight")]
    Busy,
}

/// Errors from driving a mood elicitation flow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("{0} has not been answered yet")]
    Unanswered(String),

    #[error("No option {option} for {step}")]
    NoSuchOption { step: String, option: usize },

    #[error("Tile index {0} is outside the 4x4 board")]
    NoSuchTile(usize),
}
