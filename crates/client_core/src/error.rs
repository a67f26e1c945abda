use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("validation failed: {}", .messages.join("; "))]
    Validation { messages: Vec<String> },
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("{0} is not available in this context")]
    ContextUnavailable(&'static str),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Server-side validation messages, empty for every other kind.
    pub fn validation_messages(&self) -> &[String] {
        match self {
            Self::Validation { messages } => messages,
            _ => &[],
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport("request timed out".to_string())
        } else if err.is_connect() {
            Self::Transport(format!("failed to connect: {err}"))
        } else if err.is_builder() {
            Self::Config(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
