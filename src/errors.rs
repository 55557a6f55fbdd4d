use thiserror::Error;

/// Upstream bodies are cut to this many characters in the one-line message.
pub const UPSTREAM_BODY_LIMIT: usize = 500;

/// Single-line, truncated form of an upstream body.
fn short_body(body: &str) -> String {
    body.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(UPSTREAM_BODY_LIMIT)
        .collect()
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid time expression: '{0}'")]
    InvalidTimeExpression(String),

    #[error("Invalid time range: --to ({to}) must be >= --from ({from})")]
    InvalidTimeRange { from: String, to: String },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP {status}: {}", short_body(.body))]
    UpstreamError { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Keeps the whole body; only the Display form is shortened.
    pub fn upstream(status: u16, body: &str) -> Self {
        AppError::UpstreamError {
            status,
            body: body.to_string(),
        }
    }

    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            AppError::UpstreamError { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Process exit code per variant. Usage mistakes exit with 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidTimeExpression(_) => 2,
            AppError::InvalidTimeRange { .. } => 2,
            AppError::MissingField(_) => 2,
            AppError::InvalidArgument(_) => 2,
            AppError::UpstreamError { .. } => 1,
            AppError::Transport(_) => 1,
            AppError::Config(_) => 1,
        }
    }
}

/// Helper for mapping any transport-level failure
pub fn transport_error<E: ToString>(err: E) -> AppError {
    AppError::Transport(err.to_string())
}

/// Helper for rejected request DTOs
pub fn validation_error(err: validator::ValidationErrors) -> AppError {
    AppError::InvalidArgument(err.to_string())
}

/// Exit code for an error bubbled up through `anyhow`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<AppError>()
        .map(AppError::exit_code)
        .unwrap_or(1)
}
