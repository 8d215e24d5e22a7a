use thiserror::Error;

#[derive(Error, Debug)]
pub enum BaziError {
    #[error("Invalid calendar date: {year}-{month}-{day}")]
    InvalidDate { year: i32, month: i32, day: i32 },

    #[error("Invalid hour: {hour} (expected 0-23)")]
    InvalidHour { hour: i32 },

    #[error("Internal computation error: {message}")]
    InternalComputation { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BaziError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDate { .. } | Self::InvalidHour { .. } => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::Io
            }
            Self::InternalComputation { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// True for failures caused by the birth data itself rather than the environment.
    pub fn is_input_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidDate { .. } => {
                "Check that the month is 1-12 and the day exists in that month"
            }
            Self::InvalidHour { .. } => "Use a 24-hour clock value between 0 and 23",
            Self::InternalComputation { .. } => "Retry; if it persists, report a bug",
            Self::IoError(_) => "Check that the file exists and is readable/writable",
            Self::SerializationError(_) => "Check the output format setting",
            Self::CsvError(_) => "Expected CSV columns: year,month,day,hour,gender",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Review the configuration file or command-line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidDate { year, month, day } => {
                format!("日期不存在: {}年{}月{}日", year, month, day)
            }
            Self::InvalidHour { hour } => format!("时辰无效: {} (应为 0-23)", hour),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BaziError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_high_severity() {
        let err = BaziError::InvalidHour { hour: 24 };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.is_input_error());
    }

    #[test]
    fn test_internal_error_is_critical() {
        let err = BaziError::InternalComputation {
            message: "lock poisoned".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_user_friendly_message() {
        let err = BaziError::InvalidDate {
            year: 2023,
            month: 4,
            day: 31,
        };
        assert_eq!(err.user_friendly_message(), "日期不存在: 2023年4月31日");
        assert_eq!(err.to_string(), "Invalid calendar date: 2023-4-31");
    }
}
