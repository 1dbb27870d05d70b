use crate::core::context::Stage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EntregadorError {
    /// The durable write failed. The only error the registration workflow returns.
    #[error("falha ao registrar entrega: {source}")]
    PersistenceError {
        #[source]
        source: Box<EntregadorError>,
    },

    #[error("Delivery store error: {message}")]
    StoreError { message: String },

    #[error("Resident directory error: {message}")]
    DirectoryError { message: String },

    #[error("Notification error: {message}")]
    NotificationError { message: String },

    #[error("Request cancelled during {stage}")]
    Cancelled { stage: Stage },

    #[error("Deadline exceeded during {stage}")]
    DeadlineExceeded { stage: Stage },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Persistence,
    RecipientResolution,
    Notification,
    Cancellation,
    Configuration,
    Validation,
    Io,
}

impl EntregadorError {
    /// Wraps a store failure as the fatal registration error.
    pub fn persistence(cause: EntregadorError) -> Self {
        EntregadorError::PersistenceError {
            source: Box::new(cause),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EntregadorError::PersistenceError { .. } | EntregadorError::StoreError { .. } => {
                ErrorCategory::Persistence
            }
            EntregadorError::DirectoryError { .. } => ErrorCategory::RecipientResolution,
            EntregadorError::NotificationError { .. } | EntregadorError::ApiError(_) => {
                ErrorCategory::Notification
            }
            EntregadorError::Cancelled { .. } | EntregadorError::DeadlineExceeded { .. } => {
                ErrorCategory::Cancellation
            }
            EntregadorError::ConfigError { .. }
            | EntregadorError::ConfigValidationError { .. }
            | EntregadorError::InvalidConfigValueError { .. }
            | EntregadorError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EntregadorError::ValidationError { .. } => ErrorCategory::Validation,
            EntregadorError::IoError(_) | EntregadorError::SerializationError(_) => {
                ErrorCategory::Io
            }
        }
    }

    /// Only a failed durable write aborts a registration.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EntregadorError::PersistenceError { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Persistence => format!("A entrega não pôde ser registrada: {}", self),
            ErrorCategory::Configuration => format!("Configuração inválida: {}", self),
            ErrorCategory::Validation => format!("Dados da entrega inválidos: {}", self),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EntregadorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_carries_stage_message_and_cause() {
        let err = EntregadorError::persistence(EntregadorError::StoreError {
            message: "erro de banco de dados".to_string(),
        });

        let text = err.to_string();
        assert!(text.starts_with("falha ao registrar entrega"));
        assert!(text.contains("erro de banco de dados"));
        assert!(err.is_fatal());
        assert_eq!(err.category(), ErrorCategory::Persistence);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_non_fatal_categories() {
        let lookup = EntregadorError::DirectoryError {
            message: "timeout".to_string(),
        };
        let send = EntregadorError::NotificationError {
            message: "503".to_string(),
        };
        let cancelled = EntregadorError::Cancelled {
            stage: Stage::Notify,
        };

        assert_eq!(lookup.category(), ErrorCategory::RecipientResolution);
        assert_eq!(send.category(), ErrorCategory::Notification);
        assert_eq!(cancelled.category(), ErrorCategory::Cancellation);
        assert!(!lookup.is_fatal());
        assert!(!send.is_fatal());
        assert!(!cancelled.is_fatal());
        assert_eq!(cancelled.to_string(), "Request cancelled during notify");
    }
}
