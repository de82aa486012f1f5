use std::fmt;

use serde::Serialize;
use ts_rs::TS;

/// Structured error type for the application. Lets HTTP and CLI callers match
/// on error codes instead of parsing messages.
///
/// Rendering never produces one of these; only session edits, catalog lookups,
/// and file access do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "code", content = "detail")]
#[ts(export)]
pub enum AppError {
    NotFound { what: String },
    ValidationError { message: String },
    IoError { message: String },
    ApiError { message: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound { what } => write!(f, "{what} not found"),
            AppError::ValidationError { message } => write!(f, "{message}"),
            AppError::IoError { message } => write!(f, "I/O error: {message}"),
            AppError::ApiError { message } => write!(f, "API error: {message}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<crate::project::ProjectError> for AppError {
    fn from(e: crate::project::ProjectError) -> Self {
        match e {
            crate::project::ProjectError::Io(io_err) => AppError::IoError {
                message: io_err.to_string(),
            },
            crate::project::ProjectError::Json(json_err) => AppError::ValidationError {
                message: json_err.to_string(),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::project::{load_draft, ProjectError};

    #[test]
    fn project_errors_map_to_codes() {
        let io = ProjectError::Io(std::io::Error::other("disk full"));
        assert!(matches!(AppError::from(io), AppError::IoError { .. }));

        let dir = std::env::temp_dir().join("cmdcraft_test_error_codes");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("draft.json");
        std::fs::write(&path, "[").unwrap();
        let err = AppError::from(load_draft(&path).unwrap_err());
        assert!(matches!(err, AppError::ValidationError { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn serializes_with_code_and_detail() {
        let err = AppError::NotFound {
            what: "Preset \"x\"".into(),
        };
        let json = serde_json::to_value(err).unwrap();
        assert_eq!(json["code"], "NotFound");
        assert_eq!(json["detail"]["what"], "Preset \"x\"");
    }
}
