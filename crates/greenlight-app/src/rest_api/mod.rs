pub mod movie;

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Request,
        rejection::{JsonRejection, PathRejection},
    },
};
use http::request::Parts;
use serde::de::DeserializeOwned;

use crate::{error::ApiError, state::AppState};

/// JSON body extractor that reports malformed input as [`ApiError::BadRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T> FromRequest<AppState> for JsonBody<T>
where
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ApiError::BadRequest(e.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// Record id from the path. An id that does not parse as `i64` names no
/// record, so it is reported as [`ApiError::NotFound`].
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i64);

impl FromRequestParts<AppState> for IdPath {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| ApiError::NotFound(e.body_text()))?;
        Ok(IdPath(id))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().nest("/v1/movies", movie::router())
}
