use crate::core::run::RunError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidFieldValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid RUN: {0}")]
    InvalidRun(#[from] RunError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl StorefrontError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StorefrontError::IoError(_) | StorefrontError::SerializationError(_) => {
                ErrorCategory::Io
            }
            StorefrontError::TomlError(_)
            | StorefrontError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            StorefrontError::InvalidFieldValue { .. } | StorefrontError::InvalidRun(_) => {
                ErrorCategory::Validation
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 給使用者的修正建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            StorefrontError::IoError(_) => "Check that the file exists and is readable",
            StorefrontError::SerializationError(_) => "Report this as a bug",
            StorefrontError::TomlError(_) => "Fix the TOML syntax in the configuration file",
            StorefrontError::ConfigValidationError { .. } => {
                "Correct the highlighted configuration value"
            }
            StorefrontError::InvalidFieldValue { .. } => "Fix the field and try again",
            StorefrontError::InvalidRun(_) => {
                "A RUN looks like 12.345.678-5: 7 or 8 digits plus a check digit (0-9 or K)"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not read or write data: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Validation => format!("Invalid input: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
