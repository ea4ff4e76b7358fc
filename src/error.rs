use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),

    #[error("Rejected: {0}")]
    ValidationRejected(String),

    #[error("Authorization required: {0}")]
    AuthRequired(String),

    #[error("Remote write failed: {0}")]
    RemoteWriteFailed(String),

    #[error("Remote read failed: {0}")]
    RemoteReadFailed(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl AppError {
    pub fn rejected<S: Into<String>>(msg: S) -> Self {
        Self::ValidationRejected(msg.into())
    }

    pub fn auth_required<S: Into<String>>(msg: S) -> Self {
        Self::AuthRequired(msg.into())
    }

    pub fn write_failed<S: Into<String>>(msg: S) -> Self {
        Self::RemoteWriteFailed(msg.into())
    }

    pub fn read_failed<S: Into<String>>(msg: S) -> Self {
        Self::RemoteReadFailed(msg.into())
    }

    pub fn auth<S: Into<String>>(msg: S) -> Self {
        Self::Auth(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn permission_denied<S: Into<String>>(msg: S) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn is_pii_safe(&self) -> bool {
        match self {
            Self::Database(_) | Self::Network(_) | Self::Anyhow(_) => false,
            Self::ValidationRejected(_) | Self::AuthRequired(_)
            | Self::RemoteWriteFailed(_) | Self::RemoteReadFailed(_)
            | Self::Auth(_) | Self::InvalidInput(_) | Self::Config(_)
            | Self::NotFound(_) | Self::PermissionDenied(_) => true,
        }
    }

    pub fn to_safe_string(&self) -> String {
        if self.is_pii_safe() {
            self.to_string()
        } else {
            match self {
                Self::Database(_) => "Database operation failed".to_string(),
                Self::Network(_) => "Network request failed".to_string(),
                Self::Anyhow(_) => "Operation failed".to_string(),
                _ => self.to_string(),
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_safe() {
        let err = AppError::rejected("Announcement cannot be cleared within 30 days of publishing");
        assert!(err.is_pii_safe());
        assert_eq!(
            err.to_safe_string(),
            "Rejected: Announcement cannot be cleared within 30 days of publishing"
        );
    }

    #[test]
    fn test_anyhow_error_is_masked() {
        let err = AppError::from(anyhow::anyhow!("row 42 for user alice@firm.in"));
        assert!(!err.is_pii_safe());
        assert_eq!(err.to_safe_string(), "Operation failed");
    }
}
