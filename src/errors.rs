use thiserror::Error;

/// Top-level client error.
/// Every variant carries enough text to be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    // ── Transport errors ─────────────────────────────────────────────────────
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    // ── Validation errors ────────────────────────────────────────────────────
    #[error("Field '{field_name}' cannot be empty")]
    EmptyField { field_name: String },

    #[error("A message is already being sent")]
    SendInProgress,

    // ── Configuration errors ─────────────────────────────────────────────────
    #[error("Invalid configuration for {key}: {message}")]
    InvalidConfig { key: String, message: String },
}

impl AppError {
    pub fn network(message: impl Into<String>) -> Self {
        AppError::Network { message: message.into() }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        AppError::MalformedResponse { message: message.into() }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Network { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, AppError::Rejected { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::EmptyField { .. } | AppError::SendInProgress)
    }

    /// Text surfaced in the shared error field and in chat error bubbles.
    /// Backend rejections show the backend's own detail.
    pub fn display_message(&self) -> String {
        match self {
            AppError::Rejected { detail, .. } if !detail.trim().is_empty() => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::network(err.to_string())
    }
}
