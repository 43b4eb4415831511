use thiserror::Error;

/// Record store failures / 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book {id} not found")]
    NotFound { id: i64 },

    #[error("search query has no terms to match")]
    NoSearchTerms,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Request-facing errors, one variant per HTTP status class / 面向请求的错误
///
/// The `IntoResponse` impl lives in `api::response`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input, answered with 400
    #[error("{0}")]
    Validation(String),

    /// No record for the requested id, answered with 404
    #[error("{0}")]
    NotFound(String),

    /// Store or encoding failure, answered with 500. Detail is logged, never sent.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound("book not found".to_string()),
            StoreError::NoSearchTerms => AppError::validation("search query has no terms to match"),
            StoreError::Database(e) => AppError::Internal(anyhow::Error::new(e).context("book store query failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_classification() {
        assert!(matches!(AppError::from(StoreError::NotFound { id: 3 }), AppError::NotFound(_)));
        assert!(matches!(
            AppError::from(StoreError::Database(sqlx::Error::RowNotFound)),
            AppError::Internal(_)
        ));
        assert!(matches!(AppError::from(StoreError::NoSearchTerms), AppError::Validation(_)));
    }
}
