use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("Validation failed for '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

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

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Authentication,
    Input,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StorefrontError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        StorefrontError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        StorefrontError::StorageError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StorefrontError::HttpError(_) => ErrorCategory::Network,
            StorefrontError::ApiError { status, .. } if *status == 401 || *status == 403 => {
                ErrorCategory::Authentication
            }
            StorefrontError::ApiError { .. } => ErrorCategory::Api,
            StorefrontError::AuthenticationRequired | StorefrontError::InvalidToken { .. } => {
                ErrorCategory::Authentication
            }
            StorefrontError::ValidationError { .. } | StorefrontError::SerializationError(_) => {
                ErrorCategory::Input
            }
            StorefrontError::IoError(_) | StorefrontError::StorageError { .. } => {
                ErrorCategory::Storage
            }
            StorefrontError::ConfigError { .. }
            | StorefrontError::ConfigValidationError { .. }
            | StorefrontError::InvalidConfigValueError { .. }
            | StorefrontError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Api => ErrorSeverity::Medium,
            ErrorCategory::Authentication | ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 顯示給購物者的訊息（inline 或 alert）
    pub fn user_friendly_message(&self) -> String {
        match self {
            StorefrontError::HttpError(e) if e.is_timeout() => {
                "The server took too long to respond.".to_string()
            }
            StorefrontError::HttpError(_) => "Could not reach the store server.".to_string(),
            StorefrontError::ApiError { message, .. } if !message.trim().is_empty() => {
                message.clone()
            }
            StorefrontError::ApiError { status, .. } => {
                format!("The request could not be completed (HTTP {}).", status)
            }
            StorefrontError::AuthenticationRequired | StorefrontError::InvalidToken { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            StorefrontError::ValidationError { message, .. } => message.clone(),
            StorefrontError::SerializationError(_) => {
                "The server sent a response we could not read.".to_string()
            }
            StorefrontError::IoError(_) | StorefrontError::StorageError { .. } => {
                "Local session data could not be saved or loaded.".to_string()
            }
            _ => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection and the API base URL.",
            ErrorCategory::Api => "Try again later or contact support if the problem persists.",
            ErrorCategory::Authentication => "Sign in again to start a new session.",
            ErrorCategory::Input => "Correct the highlighted field and submit again.",
            ErrorCategory::Storage => "Check that the storage file location is writable.",
            ErrorCategory::Configuration => {
                "Review the configuration file and the API_BASE_URL environment variable."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
