//! Error types for the thread factory.
//!
//! Unit construction and renaming never fail: every internal problem on those
//! paths degrades to an ordinary OS thread. The errors here surface only from
//! configuration loading, from starting a unit, and from joining one.

use std::io;

use thiserror::Error;

/// Main result type for thread factory operations.
pub type Result<T> = std::result::Result<T, ThreadFactoryError>;

/// Error type for all fallible thread factory operations.
#[derive(Error, Debug)]
pub enum ThreadFactoryError {
    /// I/O related errors (reading or writing configuration files)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for configuration values
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field that failed validation
        field: Option<String>,
    },

    /// The OS refused to start a thread for a unit
    #[error("Failed to start unit '{unit_name}'")]
    Spawn {
        /// Name of the unit that could not be started
        unit_name: String,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// No host runtime is reachable for a lightweight unit
    #[error("Lightweight runtime unavailable: {message}")]
    RuntimeUnavailable {
        /// Error description
        message: String,
    },

    /// The work wrapped by a unit panicked
    #[error("Unit '{unit_name}' panicked")]
    Panicked {
        /// Name of the unit at the time it was joined
        unit_name: String,
    },
}

impl ThreadFactoryError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new validation error for a named field
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new spawn error
    pub fn spawn(unit_name: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            unit_name: unit_name.into(),
            source,
        }
    }

    /// Create a new runtime-unavailable error
    pub fn runtime_unavailable(message: impl Into<String>) -> Self {
        Self::RuntimeUnavailable {
            message: message.into(),
        }
    }

    /// Create a new panic error
    pub fn panicked(unit_name: impl Into<String>) -> Self {
        Self::Panicked {
            unit_name: unit_name.into(),
        }
    }
}

impl From<io::Error> for ThreadFactoryError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_yaml::Error> for ThreadFactoryError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML error: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_creation() {
        let err = ThreadFactoryError::validation("must not be empty", "base_name");
        match err {
            ThreadFactoryError::Validation { field, .. } => {
                assert_eq!(field.as_deref(), Some("base_name"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = ThreadFactoryError::panicked("WORKER-3");
        assert_eq!(err.to_string(), "Unit 'WORKER-3' panicked");

        let err = ThreadFactoryError::runtime_unavailable("no reactor");
        assert_eq!(
            err.to_string(),
            "Lightweight runtime unavailable: no reactor"
        );
    }

    #[test]
    fn test_io_conversion_keeps_source() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: ThreadFactoryError = io_err.into();
        assert!(matches!(err, ThreadFactoryError::Io { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_spawn_error_keeps_source() {
        let err = ThreadFactoryError::spawn(
            "WORKER-1",
            io::Error::new(io::ErrorKind::WouldBlock, "resource limit"),
        );
        assert!(err.to_string().contains("WORKER-1"));
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("resource limit"));
    }

    #[test]
    fn test_yaml_conversion() {
        let yaml_err = serde_yaml::from_str::<u32>("not: [a number").unwrap_err();
        let err: ThreadFactoryError = yaml_err.into();
        assert!(matches!(err, ThreadFactoryError::Serialization { .. }));
    }
}
