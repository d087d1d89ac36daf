use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use ipvault_core::files::{file_store_error_to_status_code, FileStoreError};
use ipvault_core::resource::ResourceError;
use ipvault_core::storage::{
    repository_error_to_status_code, store_error_to_status_code, RepositoryError, StoreError,
};

/// A single offending input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
            error_type: status.canonical_reason().unwrap_or("Error").to_string(),
            errors: None,
        }
    }
}

impl IntoResponse for ErrorBody {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_and_fields(&self) -> (StatusCode, Option<Vec<FieldError>>) {
        let code = if let Some(err) = self.0.downcast_ref::<StoreError>() {
            store_error_to_status_code(err)
        } else if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(err)
        } else if self.0.downcast_ref::<ResourceError>().is_some() {
            400
        } else if let Some(err) = self.0.downcast_ref::<FileStoreError>() {
            file_store_error_to_status_code(err)
        } else {
            500
        };
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, self.field_errors())
    }

    fn field_errors(&self) -> Option<Vec<FieldError>> {
        let validation = match self.0.downcast_ref::<StoreError>() {
            Some(StoreError::Conflict { field, message }) => {
                return Some(vec![FieldError {
                    field: field.to_string(),
                    message: message.clone(),
                }]);
            }
            Some(StoreError::Validation(err)) => Some(err),
            _ => self.0.downcast_ref::<ResourceError>(),
        };

        validation.map(|err| {
            vec![FieldError {
                field: err.field().to_string(),
                message: err.to_string(),
            }]
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, errors) = self.status_and_fields();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "Request rejected");
        }

        let mut body = ErrorBody::new(status, self.0.to_string());
        body.errors = errors;
        body.into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
