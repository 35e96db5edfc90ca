//! Error types for sidang.
//!
//! Every failure a command can hit ends up here. The `Display` text is meant
//! for logs; [`Error::user_message`] is the one-shot text shown to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Message prefix used when the server could not be reached at all.
pub const CONNECTION_FAILED: &str = "Koneksi gagal";

/// The main error type for sidang operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the session database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === API Errors ===
    /// Input was rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// Localized message for this status.
        message: String,
    },

    /// The server answered 2xx with no usable body.
    #[error("{0}")]
    EmptyResponse(String),

    /// The request never got a response.
    #[error("Koneksi gagal: {0}")]
    Connection(#[from] reqwest::Error),

    /// An endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // === Session Errors ===
    /// A command needs a session but nobody is logged in.
    #[error("not logged in")]
    NotLoggedIn,

    /// The identity provider token could not be decoded.
    #[error("invalid ID token: {0}")]
    InvalidIdToken(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for sidang operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new API status error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a new empty-response error.
    #[must_use]
    pub fn empty_response(message: impl Into<String>) -> Self {
        Self::EmptyResponse(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The text shown to the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message)
            | Self::EmptyResponse(message)
            | Self::Api { message, .. } => message.clone(),
            Self::Connection(err) => format!("{CONNECTION_FAILED}: {err}"),
            Self::NotLoggedIn => "Anda belum login".to_string(),
            other => other.to_string(),
        }
    }

    /// Check if this error means the session was rejected by the server.
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    /// Check if this error was raised before any request was sent.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
