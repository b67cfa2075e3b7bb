//! Mapping from core errors to HTTP responses.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use wso_atlas_analytics::AnalyticsError;
use wso_atlas_database::DbError;
use wso_atlas_server_models::ApiError;
use wso_atlas_territory::TerritoryError;

/// Errors a handler can fail with.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A request parameter was missing or malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The requested club or region does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Validation error from the analytics layer.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// The territory cannot be evaluated.
    #[error(transparent)]
    Territory(#[from] TerritoryError),

    /// Store failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Analytics(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::Territory(TerritoryError::MissingGeometry { .. }) => {
                StatusCode::NOT_FOUND
            }
            Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            log::error!("Request failed: {self}");
            "Failed to query results store".to_string()
        } else {
            log::debug!("Request rejected ({status}): {self}");
            self.to_string()
        };

        HttpResponse::build(status).json(ApiError { error: message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_codes() {
        let invalid = ServerError::from(AnalyticsError::InvalidInput {
            message: "limit must be at most 50".to_string(),
        });
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let missing = ServerError::from(TerritoryError::MissingGeometry {
            region: "Florida".to_string(),
        });
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let db = ServerError::from(DbError::LockPoisoned);
        assert_eq!(db.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
