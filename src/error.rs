use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Classification of a stage failure, as recorded in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageErrorKind {
    File,
    Network,
    Database,
    Serialization,
    Archive,
}

impl StageErrorKind {
    /// Label used to prefix the error block in the plain-text report
    pub fn label(&self) -> &'static str {
        match self {
            StageErrorKind::File => "File error",
            StageErrorKind::Network => "Network error",
            StageErrorKind::Database => "DB error",
            StageErrorKind::Serialization => "Serialization error",
            StageErrorKind::Archive => "Archive error",
        }
    }
}

impl fmt::Display for StageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Central error type for pipeline stages
///
/// Every variant carries a report-ready message and, where one exists, the
/// underlying cause. The cause is only surfaced in logs.
#[derive(Error, Debug)]
pub enum StageError {
    // ============================================================================
    // File Errors
    // ============================================================================
    #[error("{message}")]
    File {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // ============================================================================
    // Network Errors
    // ============================================================================
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    // ============================================================================
    // Database Errors
    // ============================================================================
    #[error("{message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    // ============================================================================
    // Serialization Errors
    // ============================================================================
    #[error("{message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // ============================================================================
    // Archive Errors
    // ============================================================================
    #[error("{message}")]
    Archive {
        message: String,
        #[source]
        source: Option<zip::result::ZipError>,
    },
}

impl StageError {
    pub fn file(message: impl Into<String>) -> Self {
        StageError::File {
            message: message.into(),
            source: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        StageError::Network {
            message: message.into(),
            source: None,
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        StageError::Database {
            message: message.into(),
            source: None,
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        StageError::Serialization {
            message: message.into(),
            source: None,
        }
    }

    pub fn archive(message: impl Into<String>) -> Self {
        StageError::Archive {
            message: message.into(),
            source: None,
        }
    }

    /// Classify this error for the report
    pub fn kind(&self) -> StageErrorKind {
        match self {
            StageError::File { .. } => StageErrorKind::File,
            StageError::Network { .. } => StageErrorKind::Network,
            StageError::Database { .. } => StageErrorKind::Database,
            StageError::Serialization { .. } => StageErrorKind::Serialization,
            StageError::Archive { .. } => StageErrorKind::Archive,
        }
    }

    /// Message followed by every underlying cause, for log output
    pub fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut cause = StdError::source(self);
        while let Some(err) = cause {
            detail.push_str(&format!(": {}", err));
            cause = err.source();
        }
        detail
    }
}

// Automatic conversion from rusqlite::Error
impl From<rusqlite::Error> for StageError {
    fn from(err: rusqlite::Error) -> Self {
        StageError::Database {
            message: "DB operation failed (SQLite).".to_string(),
            source: Some(err),
        }
    }
}

// Helper type alias for Results
pub type StageResult<T> = Result<T, StageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_message_only() {
        let err = StageError::File {
            message: "Input file not found: /tmp/missing.txt".to_string(),
            source: Some(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
        };
        assert_eq!(err.to_string(), "Input file not found: /tmp/missing.txt");
    }

    #[test]
    fn test_detail_includes_cause_chain() {
        let err = StageError::Serialization {
            message: "Failed to load record".to_string(),
            source: Some(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "truncated",
            )),
        };
        assert_eq!(err.detail(), "Failed to load record: truncated");
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(StageError::file("x").kind(), StageErrorKind::File);
        assert_eq!(StageError::network("x").kind(), StageErrorKind::Network);
        assert_eq!(StageError::database("x").kind(), StageErrorKind::Database);
        assert_eq!(
            StageError::serialization("x").kind(),
            StageErrorKind::Serialization
        );
        assert_eq!(StageError::archive("x").kind(), StageErrorKind::Archive);
    }

    #[test]
    fn test_rusqlite_error_conversion() {
        let err: StageError = rusqlite::Error::InvalidQuery.into();
        assert_eq!(err.kind(), StageErrorKind::Database);
        assert_eq!(err.to_string(), "DB operation failed (SQLite).");
    }

    #[test]
    fn test_archive_detail_names_cause_once() {
        let err = StageError::Archive {
            message: "Failed to inspect JAR: /tmp/app.jar".to_string(),
            source: Some(zip::result::ZipError::FileNotFound),
        };
        let cause = zip::result::ZipError::FileNotFound.to_string();
        assert_eq!(err.detail().matches(cause.as_str()).count(), 1);
    }

    #[test]
    fn test_network_cause_accepts_io_error() {
        let err = StageError::Network {
            message: "Network fetch failed for: http://example.com".to_string(),
            source: Some(Box::new(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "operation timed out",
            ))),
        };
        assert_eq!(
            err.detail(),
            "Network fetch failed for: http://example.com: operation timed out"
        );
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(StageErrorKind::Database.label(), "DB error");
        assert_eq!(StageErrorKind::Network.to_string(), "Network error");
    }
}
