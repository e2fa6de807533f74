use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, aggregating or charting election data.
///
/// Every variant only carries owned strings so a failed load can be cached
/// and handed out again on later renders.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("IO error reading {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("Parse error ({location}): {message}")]
    Parse { location: String, message: String },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DashboardError {
    pub fn parse(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<csv::Error> for DashboardError {
    fn from(err: csv::Error) -> Self {
        let location = match err.position() {
            Some(pos) => format!("line {}", pos.line()),
            None => "csv".to_string(),
        };
        Self::parse(location, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_missing_column() {
        let err = DashboardError::MissingColumn("Voters".to_string());
        assert_eq!(err.to_string(), "Missing required column: Voters");
    }

    #[test]
    fn test_display_file_not_found() {
        let err = DashboardError::FileNotFound {
            path: PathBuf::from("data/results.csv"),
        };
        assert_eq!(err.to_string(), "File not found: data/results.csv");
    }
}
