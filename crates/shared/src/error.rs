use serde::{Deserialize, Serialize};

/// Error kinds the client tells apart by HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    Validation,
}

impl ErrorCode {
    /// `None` for statuses reported as plain server errors.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            400 | 422 => Some(Self::Validation),
            404 => Some(Self::NotFound),
            _ => None,
        }
    }
}

/// One entry of a server-side validation failure list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Text(String),
    Field {
        #[serde(alias = "message")]
        msg: String,
        #[serde(default, alias = "param", alias = "path")]
        field: Option<String>,
    },
}

impl ErrorDetail {
    pub fn message(&self) -> &str {
        match self {
            Self::Text(message) => message,
            Self::Field { msg, .. } => msg,
        }
    }
}

/// Error body as returned by the remote service. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorDetail>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// The detail list if present, else the single message, else nothing.
    pub fn messages(&self) -> Vec<String> {
        if !self.errors.is_empty() {
            return self
                .errors
                .iter()
                .map(|detail| detail.message().to_string())
                .collect();
        }
        self.summary().map(str::to_string).into_iter().collect()
    }

    pub fn summary(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|message| !message.trim().is_empty())
    }
}
