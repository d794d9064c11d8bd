use std::time::Duration;

use axum::{http::StatusCode, response::IntoResponse};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Store call timed out after {0:?}")]
    StoreTimeout(Duration),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Write rejected: {0}")]
    WriteRejected(String),
}

impl Error {
    /// Whether the error originated in the persistence layer.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Error::Database(_)
                | Error::StoreTimeout(_)
                | Error::StoreUnavailable(_)
                | Error::WriteRejected(_)
        )
    }
}

// Clients only ever see a bare 500; details stay in the server log.
impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        if self.is_storage() {
            tracing::error!(error = %self, "storage failure");
        } else {
            tracing::error!(error = %self, "unexpected failure");
        }
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_classified() {
        assert!(Error::Database(sqlx::Error::PoolTimedOut).is_storage());
        assert!(Error::StoreTimeout(Duration::from_secs(1)).is_storage());
        assert!(Error::WriteRejected("dup".into()).is_storage());
        assert!(!Error::Config("missing".into()).is_storage());
    }

    #[tokio::test]
    async fn storage_error_maps_to_bare_500() {
        let resp = Error::StoreUnavailable("down".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert!(bytes.is_empty());
    }
}
