//! Error types for camwatch.
//!
//! This module defines all error types used throughout the camwatch crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for camwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Input Validation Errors ===
    /// A required input field is missing or malformed.
    ///
    /// Raised client-side before any network request is issued.
    #[error("invalid input for '{field}': {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Description of what is wrong with it.
        message: String,
    },

    // === Authentication Errors ===
    /// The credential check was rejected by the server.
    #[error("authentication failed: {message}")]
    AuthFailed {
        /// Message from the server, or a transport-level description.
        message: String,
    },

    /// The server rejected a request with 401; the stored token is no
    /// longer trusted.
    #[error("session is no longer valid (server returned 401)")]
    Unauthorized,

    /// The device associated with the account could not be resolved.
    ///
    /// Fatal to the login attempt: the caller must roll the session back.
    #[error("device '{device_id}' is not registered: {message}")]
    DeviceNotRegistered {
        /// The device identifier that failed to resolve.
        device_id: String,
        /// Description of the failure (transport error, 404, bad shape).
        message: String,
    },

    // === API Errors ===
    /// An HTTP request failed at the transport level.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an unexpected status or body shape.
    #[error("unexpected API response: {message}")]
    Api {
        /// Description of what was wrong with the response.
        message: String,
    },

    /// A request exceeded the configured timeout.
    #[error("operation timed out: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
    },

    // === Session Storage Errors ===
    /// Failed to open or create the session database.
    #[error("failed to open session store at {path}: {source}")]
    StoreOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A session store query failed.
    #[error("session store query failed: {0}")]
    StoreQuery(#[from] rusqlite::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
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

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for camwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new input validation error.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a new authentication failure error.
    #[must_use]
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::AuthFailed {
            message: message.into(),
        }
    }

    /// Create a device-resolution failure error.
    #[must_use]
    pub fn device_not_registered(
        device_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DeviceNotRegistered {
            device_id: device_id.into(),
            message: message.into(),
        }
    }

    /// Create an unexpected-API-response error.
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means the device lookup failed after a
    /// successful credential check.
    #[must_use]
    pub fn is_device_not_registered(&self) -> bool {
        matches!(self, Self::DeviceNotRegistered { .. })
    }

    /// Check if this error means the stored token was rejected by the server.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if this error originated from client-side input validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Unauthorized;
        assert_eq!(
            err.to_string(),
            "session is no longer valid (server returned 401)"
        );

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_validation_error_display() {
        let err = Error::validation("email", "must not be empty");
        let msg = err.to_string();
        assert!(msg.contains("email"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn test_auth_failed_display() {
        let err = Error::auth_failed("bad credentials");
        assert_eq!(err.to_string(), "authentication failed: bad credentials");
    }

    #[test]
    fn test_device_not_registered_display() {
        let err = Error::device_not_registered("dev1", "server returned 404");
        let msg = err.to_string();
        assert!(msg.contains("dev1"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn test_error_is_device_not_registered() {
        assert!(Error::device_not_registered("d", "m").is_device_not_registered());
        assert!(!Error::Unauthorized.is_device_not_registered());
    }

    #[test]
    fn test_error_is_unauthorized() {
        assert!(Error::Unauthorized.is_unauthorized());
        assert!(!Error::auth_failed("x").is_unauthorized());
    }

    #[test]
    fn test_error_is_validation() {
        assert!(Error::validation("password", "required").is_validation());
        assert!(!Error::Unauthorized.is_validation());
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::api("missing data.device");
        assert_eq!(err.to_string(), "unexpected API response: missing data.device");
    }

    #[test]
    fn test_timeout_error_display() {
        let err = Error::Timeout {
            operation: "login request".to_string(),
        };
        assert!(err.to_string().contains("login request"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "invalid base_url".to_string(),
        };
        assert!(err.to_string().contains("invalid base_url"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::StoreQuery(_)));
        }
    }

    #[test]
    fn test_store_open_error_display() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err = Error::StoreOpen {
                path: PathBuf::from("/nonexistent/path/db.sqlite"),
                source: sqlite_err,
            };
            assert!(err.to_string().contains("/nonexistent/path/db.sqlite"));
        }
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
