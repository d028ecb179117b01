use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("SMTP transport error: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),

    #[error("Mail composition error: {0}")]
    MailBuildError(#[from] lettre::error::Error),

    #[error("Invalid mail address: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Verification service error: {message}")]
    VerificationServiceError { message: String },
}

impl RelayError {
    /// 給終端使用者看的訊息，不含傳輸層細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            RelayError::HttpError(_) => "Could not reach the remote service".to_string(),
            RelayError::SmtpError(_) | RelayError::MailBuildError(_) => {
                "The mail relay rejected the message".to_string()
            }
            RelayError::AddressError(_) => "A mail address could not be parsed".to_string(),
            RelayError::IoError(e) => format!("File access failed: {}", e),
            RelayError::SerializationError(e) => format!("Invalid JSON input: {}", e),
            RelayError::ConfigError { message } => message.clone(),
            RelayError::MissingConfigError { field } => {
                format!("Required setting '{}' is not set", field)
            }
            RelayError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            RelayError::VerificationServiceError { .. } => {
                "The verification service returned an unusable reply".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RelayError::HttpError(_) | RelayError::VerificationServiceError { .. } => {
                "Check network connectivity and the endpoint URL"
            }
            RelayError::SmtpError(_) => "Check SMTP_HOST, SMTP_PORT, EMAIL_USER and EMAIL_PASS",
            RelayError::MailBuildError(_) | RelayError::AddressError(_) => {
                "Make sure EMAIL_USER is a valid mailbox address"
            }
            RelayError::IoError(_) => "Check that the file exists and is readable",
            RelayError::SerializationError(_) => "Make sure the input is a valid JSON document",
            RelayError::ConfigError { .. }
            | RelayError::MissingConfigError { .. }
            | RelayError::InvalidConfigValueError { .. } => {
                "Review the environment variables or the TOML configuration file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

/// Failures of a single submission, each mapped to one HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{message}")]
    ValidationError { message: String },

    #[error("{message}")]
    VerificationError { message: String },

    #[error("Failed to send message. Please try again later.")]
    DispatchError { details: String },
}

impl SubmissionError {
    pub fn status_code(&self) -> u16 {
        match self {
            SubmissionError::MethodNotAllowed => 405,
            SubmissionError::ValidationError { .. } => 400,
            SubmissionError::VerificationError { .. } => 400,
            SubmissionError::DispatchError { .. } => 500,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        SubmissionError::ValidationError {
            message: message.into(),
        }
    }

    pub fn verification(message: impl Into<String>) -> Self {
        SubmissionError::VerificationError {
            message: message.into(),
        }
    }
}
