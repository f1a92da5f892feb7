use axum::{
    Json,
    response::{IntoResponse, Response},
};
use greenlight_dal::validator::ValidationErrors;
use http::StatusCode;
use serde_json::json;
use tracing::{debug, error};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Edit conflict: {0}")]
    EditConflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<greenlight_dal::Error> for ApiError {
    fn from(value: greenlight_dal::Error) -> Self {
        use greenlight_dal::Error;
        match value {
            Error::ValidationFailed(errors) => ApiError::Validation(errors),
            Error::RecordNotFound(what) => ApiError::NotFound(what),
            e @ Error::StaleVersion { .. } => ApiError::EditConflict(e.to_string()),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": errors }))
            }
            ApiError::NotFound(what) => {
                debug!("Not found: {what}");
                (
                    StatusCode::NOT_FOUND,
                    json!({ "error": "the requested resource could not be found" }),
                )
            }
            ApiError::EditConflict(msg) => {
                debug!("{msg}");
                (
                    StatusCode::CONFLICT,
                    json!({ "error": "unable to update the record due to an edit conflict, please try again" }),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Internal(msg) => {
                error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "the server encountered a problem and could not process your request" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
