use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Input path not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("No test case files matching '{pattern}' found in: {}", path.display())]
    NoTestCases { path: PathBuf, pattern: String },

    #[error("Catalogue not found: {message}")]
    MissingCatalogue { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Could not write results to {}: {source}", path.display())]
    OutputError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BatchError::MissingInput { .. }
            | BatchError::NoTestCases { .. }
            | BatchError::MissingCatalogue { .. } => ErrorCategory::Input,
            BatchError::ConfigError { .. } | BatchError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            BatchError::OutputError { .. } => ErrorCategory::Output,
            BatchError::IoError(_) | BatchError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BatchError::MissingInput { path } => {
                format!("No such file or directory: {}", path.display())
            }
            BatchError::NoTestCases { path, .. } => {
                format!("No TC files found in folder: {}", path.display())
            }
            BatchError::MissingCatalogue { message } => {
                format!("Could not load the product catalogue: {}", message)
            }
            BatchError::OutputError { path, .. } => {
                format!("Could not write output file '{}'", path.display())
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BatchError::MissingInput { .. } => "Check the input path and try again",
            BatchError::NoTestCases { .. } => {
                "Name test case files TC<n>.txt (or folders TC<n> for sales)"
            }
            BatchError::MissingCatalogue { .. } => {
                "Place a *ProductList* file in TC1 or pass --catalogue <file>"
            }
            BatchError::ConfigError { .. } | BatchError::InvalidConfigValueError { .. } => {
                "Review the command-line flags and the --config file"
            }
            BatchError::OutputError { .. } => "Make sure the output directory is writable",
            BatchError::IoError(_) | BatchError::SerializationError(_) => {
                "Check file permissions and input encoding"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_is_fatal_with_exit_code_one() {
        let err = BatchError::MissingInput {
            path: PathBuf::from("nowhere.txt"),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().contains("nowhere.txt"));
    }

    #[test]
    fn test_output_error_is_critical() {
        let err = BatchError::OutputError {
            path: PathBuf::from("out/Results.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }
}
