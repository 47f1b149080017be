use std::error::Error;
use std::fmt;

use warp::http::StatusCode;

use crate::auth::token::TokenError;

#[derive(Debug)]
pub enum RustyTodoError {
    // Authentication errors
    InvalidCredentials,
    MissingCredentials,
    InvalidToken(TokenError),
    LoginRequired,

    // Resource errors
    NotFound(String),
    DuplicateUsername(String),

    // Validation errors
    ValidationError(String),

    // Storage errors
    StorageError(String),

    // Password hashing errors
    HashError(String),

    // Enrichment collaborator errors
    EnrichmentError(String),

    // System errors
    SystemError(String),

    // Configuration errors
    ConfigError(String),
}

impl RustyTodoError {
    /// HTTP status reported for this error on API routes
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::MissingCredentials | Self::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::LoginRequired => StatusCode::TEMPORARY_REDIRECT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateUsername(_) => StatusCode::CONFLICT,
            Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::StorageError(_)
            | Self::HashError(_)
            | Self::EnrichmentError(_)
            | Self::SystemError(_)
            | Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller failed to prove who they are
    pub fn is_unauthenticated(&self) -> bool {
        self.status_code() == StatusCode::UNAUTHORIZED
    }

    /// Detail safe to show to a client; internal failures stay generic
    pub fn public_detail(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::MissingCredentials | Self::InvalidToken(_) => {
                "Could not validate credentials".to_string()
            }
            Self::StorageError(_)
            | Self::HashError(_)
            | Self::EnrichmentError(_)
            | Self::SystemError(_)
            | Self::ConfigError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for RustyTodoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::MissingCredentials => write!(f, "Missing credentials"),
            Self::InvalidToken(reason) => write!(f, "Invalid token: {}", reason),
            Self::LoginRequired => write!(f, "Login required"),
            Self::NotFound(what) => write!(f, "{} not found", what),
            Self::DuplicateUsername(name) => write!(f, "Username already taken: {}", name),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::HashError(msg) => write!(f, "Password hashing error: {}", msg),
            Self::EnrichmentError(msg) => write!(f, "Enrichment error: {}", msg),
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for RustyTodoError {}

impl warp::reject::Reject for RustyTodoError {}

impl From<TokenError> for RustyTodoError {
    fn from(err: TokenError) -> Self {
        RustyTodoError::InvalidToken(err)
    }
}

impl From<reqwest::Error> for RustyTodoError {
    fn from(err: reqwest::Error) -> Self {
        RustyTodoError::EnrichmentError(err.to_string())
    }
}

// Generic result type for RustyTodo
pub type Result<T> = std::result::Result<T, RustyTodoError>;
