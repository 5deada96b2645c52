/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Invalid candidate data: {0}")]
    InvalidCandidate(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error came from an external collaborator and may clear up
    /// on retry. Data errors never do.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::Cache(_) | AppError::HttpClient(_) | AppError::ExternalApi(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_errors_are_transient() {
        assert!(AppError::ExternalApi("quota exceeded".to_string()).is_transient());
    }

    #[test]
    fn test_data_errors_are_not_transient() {
        assert!(!AppError::InvalidCandidate("bad embedding".to_string()).is_transient());
        assert!(!AppError::NotFound("recommendation".to_string()).is_transient());
    }
}
