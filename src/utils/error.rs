use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API responded with status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("Authentication error: {message}")]
    AuthError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required setting '{field}'")]
    MissingConfigError { field: String },

    #[error("Timed out after {seconds}s waiting for {what}")]
    Timeout { what: String, seconds: u64 },

    #[error("Element not found: {locator}")]
    ElementNotFound { locator: String },

    #[error("Browser automation error: {message}")]
    BrowserError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    Configuration,
    Browser,
    Data,
    Storage,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a CLI run that ended with this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl DashError {
    pub fn processing(message: impl Into<String>) -> Self {
        DashError::ProcessingError {
            message: message.into(),
        }
    }

    pub fn browser(message: impl std::fmt::Display) -> Self {
        DashError::BrowserError {
            message: message.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DashError::ApiError(_) | DashError::ApiStatus { .. } => ErrorCategory::Network,
            DashError::AuthError { .. } => ErrorCategory::Authentication,
            DashError::ConfigError { .. }
            | DashError::ConfigValidationError { .. }
            | DashError::InvalidConfigValueError { .. }
            | DashError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DashError::Timeout { .. }
            | DashError::ElementNotFound { .. }
            | DashError::BrowserError { .. } => ErrorCategory::Browser,
            DashError::ProcessingError { .. }
            | DashError::SerializationError(_)
            | DashError::CsvError(_) => ErrorCategory::Data,
            DashError::IoError(_) => ErrorCategory::Storage,
            DashError::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Browser => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Authentication
            | ErrorCategory::Configuration
            | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Plain text shown in place of the chart.
    pub fn user_friendly_message(&self) -> String {
        match self {
            DashError::Timeout { what, seconds } => format!(
                "The page did not show {} within {} seconds.",
                what, seconds
            ),
            DashError::ElementNotFound { locator } => {
                format!("Could not find {} on the page.", locator)
            }
            DashError::BrowserError { message } => {
                format!("The browser session failed: {}", message)
            }
            DashError::ApiStatus { status, .. } => {
                format!("The analytics API rejected the request (HTTP {}).", status)
            }
            DashError::ApiError(e) => format!("Could not reach the remote service: {}", e),
            DashError::AuthError { message } => format!("Could not authenticate: {}", message),
            DashError::ValidationError { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashError::Timeout { .. } | DashError::ElementNotFound { .. } => {
                "Check the credentials and the campaign URL; the page layout may have changed"
            }
            DashError::BrowserError { .. } => {
                "Make sure a WebDriver server (e.g. chromedriver) is running at the configured URL"
            }
            DashError::ApiError(_) | DashError::ApiStatus { .. } => {
                "Check network access and the analytics property ID"
            }
            DashError::AuthError { .. } => {
                "Check the service-account key file and that the account can read the property"
            }
            DashError::ConfigError { .. }
            | DashError::ConfigValidationError { .. }
            | DashError::InvalidConfigValueError { .. }
            | DashError::MissingConfigError { .. } => "Fix the configuration file or CLI flags",
            DashError::IoError(_) => "Check that the output directory is writable",
            DashError::ValidationError { .. } => "Fill in every field of the form",
            DashError::ProcessingError { .. }
            | DashError::SerializationError(_)
            | DashError::CsvError(_) => "The report format may have changed; rerun with --verbose",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_is_readable() {
        let err = DashError::Timeout {
            what: "element name=email".to_string(),
            seconds: 10,
        };
        assert_eq!(
            err.user_friendly_message(),
            "The page did not show element name=email within 10 seconds."
        );
        assert_eq!(err.category(), ErrorCategory::Browser);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_every_failure_exits_non_zero() {
        let errors = [
            DashError::browser("session lost"),
            DashError::processing("bad row"),
            DashError::ValidationError {
                message: "Email is required.".to_string(),
            },
            DashError::AuthError {
                message: "invalid_grant".to_string(),
            },
        ];

        let codes: Vec<i32> = errors.iter().map(|e| e.severity().exit_code()).collect();
        assert_eq!(codes, vec![2, 1, 1, 3]);
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = DashError::MissingConfigError {
            field: "campaign.email".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
