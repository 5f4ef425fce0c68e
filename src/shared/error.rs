use std::fmt;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow schedulers (cron, CI) to distinguish a clean sweep from
/// one where some repositories could not be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every repository was processed
    Success = 0,
    /// At least one repository-level operation failed
    RepositoryFailures = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (configuration, network, snapshot I/O, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::RepositoryFailures => write!(f, "Repository Failures (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Error taxonomy for inspection and reconciliation.
///
/// Use cases bail with these variants (wrapped in `anyhow::Error`) so callers can
/// `downcast_ref::<InspectionError>()` to decide whether a failure is fatal for a
/// repository, retryable per artifact, or requires operator action.
#[derive(Debug, Error)]
pub enum InspectionError {
    /// Unsupported package type, missing patterns, missing project/version.
    /// Fatal to the enclosing repository-level operation and never retried automatically.
    #[error("Configuration error for repository '{repo_key}': {reason}\n\n💡 Hint: Check the inspection settings for this repository")]
    Configuration { repo_key: String, reason: String },

    /// Network, timeout or lookup failure against the scanning service
    #[error("Scan service call '{operation}' failed: {details}")]
    Remote { operation: String, details: String },

    /// Persisted state that cannot be interpreted safely
    #[error("Malformed inspection state on '{path}': {details}\n\n💡 Hint: Delete the inspection properties of this repository to trigger a re-inspection")]
    MalformedState { path: String, details: String },

    /// Failure reading or writing repository metadata
    #[error("Repository store operation '{operation}' failed: {details}")]
    Store { operation: String, details: String },

    /// Invalid configuration file contents
    #[error("Invalid configuration: {details}\n\n💡 Hint: {hint}")]
    ConfigFile { details: String, hint: String },
}

impl InspectionError {
    pub fn configuration(repo_key: &str, reason: impl Into<String>) -> Self {
        InspectionError::Configuration {
            repo_key: repo_key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn remote(operation: &str, details: impl fmt::Display) -> Self {
        InspectionError::Remote {
            operation: operation.to_string(),
            details: details.to_string(),
        }
    }

    pub fn store(operation: &str, details: impl fmt::Display) -> Self {
        InspectionError::Store {
            operation: operation.to_string(),
            details: details.to_string(),
        }
    }

    pub fn malformed(path: impl fmt::Display, details: impl Into<String>) -> Self {
        InspectionError::MalformedState {
            path: path.to_string(),
            details: details.into(),
        }
    }

    /// Configuration errors abort a repository pass and are never retried
    pub fn is_configuration(&self) -> bool {
        matches!(self, InspectionError::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::RepositoryFailures.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::RepositoryFailures),
            "Repository Failures (1)"
        );
    }

    #[test]
    fn test_configuration_error_display() {
        let error = InspectionError::configuration("npm-remote", "No patterns configured");
        let display = format!("{}", error);
        assert!(display.contains("npm-remote"));
        assert!(display.contains("No patterns configured"));
        assert!(display.contains("💡 Hint:"));
        assert!(error.is_configuration());
    }

    #[test]
    fn test_remote_error_is_not_configuration() {
        let error = InspectionError::remote("add_component", "connection reset");
        assert!(!error.is_configuration());
        assert!(format!("{}", error).contains("connection reset"));
    }

    #[test]
    fn test_malformed_state_display() {
        let error = InspectionError::MalformedState {
            path: "maven-remote".to_string(),
            details: "No lastUpdate or lastInspection timestamp".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Malformed inspection state"));
        assert!(display.contains("re-inspection"));
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let err: anyhow::Error = InspectionError::configuration("repo", "missing").into();
        let inspection_error = err.downcast_ref::<InspectionError>().unwrap();
        assert!(inspection_error.is_configuration());
    }
}
