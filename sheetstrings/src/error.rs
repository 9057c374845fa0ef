//! All error types for the sheetstrings crate.
//!
//! Errors tied to a single language (reading, parsing or writing its resource
//! file) are caught by the [`crate::Importer`] and recorded per language.
//! [`Error::InvalidInput`] concerns the spreadsheet as a whole and aborts a run
//! before anything is written.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("malformed resource {}:{line}: {reason}", path.display())]
    MalformedResource {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("cannot read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path unavailable {}: {source}", path.display())]
    PathUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write failed {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a new malformed resource error.
    pub fn malformed(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedResource {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Creates a new invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Short machine-friendly name of the error kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::MalformedResource { .. } => "malformed_resource",
            Error::ReadFailed { .. } => "read_failed",
            Error::PathUnavailable { .. } => "path_unavailable",
            Error::WriteFailed { .. } => "write_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_malformed_resource_error() {
        let error = Error::malformed("fr/Localizable.strings", 3, "missing `;`");
        assert_eq!(
            error.to_string(),
            "malformed resource fr/Localizable.strings:3: missing `;`"
        );
        assert_eq!(error.kind(), "malformed_resource");
    }

    #[test]
    fn test_invalid_input_error() {
        let error = Error::invalid_input("not a spreadsheet");
        assert_eq!(error.to_string(), "invalid input: not a spreadsheet");
    }

    #[test]
    fn test_path_unavailable_keeps_source() {
        let error = Error::PathUnavailable {
            path: PathBuf::from("root/en"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("root/en"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_write_failed_error() {
        let error = Error::WriteFailed {
            path: PathBuf::from("en/Resource.strings"),
            source: io::Error::other("disk full"),
        };
        assert!(error.to_string().starts_with("write failed"));
        assert!(error.to_string().contains("disk full"));
        assert_eq!(error.kind(), "write_failed");
    }
}
