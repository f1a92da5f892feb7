use axum::{
    Json,
    response::IntoResponse,
    routing::{get, post},
};
use greenlight_dal::movie::{Movie, MovieInput, MovieRepository, Runtime};
use http::{StatusCode, header};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    repository_from_request,
    rest_api::{IdPath, JsonBody},
    state::AppState,
};

repository_from_request!(MovieRepository);

/// Public shape of a movie. `created_at` is never exposed, and zero or
/// empty optional fields are left out.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MovieResponse {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub year: i32,
    #[serde(
        default,
        with = "crate::runtime",
        skip_serializing_if = "crate::runtime::is_zero"
    )]
    pub runtime: Runtime,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    pub version: i32,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        MovieResponse {
            id: movie.id,
            title: movie.title,
            year: movie.year,
            runtime: movie.runtime,
            genres: movie.genres,
            version: movie.version,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CreateMovie {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default, with = "crate::runtime")]
    pub runtime: Runtime,
    pub genres: Option<Vec<String>>,
}

impl From<CreateMovie> for MovieInput {
    fn from(value: CreateMovie) -> Self {
        MovieInput {
            title: value.title,
            year: value.year,
            runtime: value.runtime,
            genres: value.genres,
        }
    }
}

/// Partial update, absent fields keep their stored values.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "crate::runtime::deserialize_option")]
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
    /// Version the client last saw, checked against the stored record.
    pub version: Option<i32>,
}

impl UpdateMovie {
    fn apply(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = runtime;
        }
        if let Some(genres) = self.genres {
            movie.genres = genres;
        }
    }
}

pub async fn create(
    repository: MovieRepository,
    JsonBody(payload): JsonBody<CreateMovie>,
) -> ApiResult<impl IntoResponse> {
    let movie = repository.insert(payload.into()).await?;
    let location = format!("/v1/movies/{}", movie.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(MovieResponse::from(movie)),
    ))
}

pub async fn show(
    IdPath(id): IdPath,
    repository: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    let movie = repository.get(id).await?;

    Ok((StatusCode::OK, Json(MovieResponse::from(movie))))
}

pub async fn update(
    IdPath(id): IdPath,
    repository: MovieRepository,
    JsonBody(payload): JsonBody<UpdateMovie>,
) -> ApiResult<impl IntoResponse> {
    let mut movie = repository.get(id).await?;
    if let Some(expected) = payload.version {
        if expected != movie.version {
            return Err(ApiError::EditConflict(format!(
                "Movie {id} is at version {}, client expected {expected}",
                movie.version
            )));
        }
    }
    payload.apply(&mut movie);
    repository.update(&mut movie).await?;

    Ok((StatusCode::OK, Json(MovieResponse::from(movie))))
}

pub async fn delete(
    IdPath(id): IdPath,
    repository: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    repository.delete(id).await?;

    Ok((StatusCode::NO_CONTENT, ()))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", post(create))
        .route("/{id}", get(show).patch(update).delete(delete))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Movie {
        let now = time::OffsetDateTime::now_utc();
        Movie {
            id: 7,
            created_at: time::PrimitiveDateTime::new(now.date(), now.time()),
            title: "Black Panther".to_string(),
            year: 2018,
            runtime: Runtime::new(134),
            genres: vec!["action".to_string(), "adventure".to_string()],
            version: 2,
        }
    }

    #[test]
    fn test_response_hides_fields() {
        let mut movie = stored();
        let json = serde_json::to_value(MovieResponse::from(movie.clone())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "Black Panther",
                "year": 2018,
                "runtime": "134 mins",
                "genres": ["action", "adventure"],
                "version": 2
            })
        );

        movie.year = 0;
        movie.runtime = Runtime::new(0);
        movie.genres.clear();
        let json = serde_json::to_value(MovieResponse::from(movie)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "title": "Black Panther", "version": 2})
        );
    }

    #[test]
    fn test_partial_update() {
        let mut movie = stored();
        let patch: UpdateMovie =
            serde_json::from_str(r#"{"year": 2019, "runtime": "135 mins"}"#).unwrap();
        patch.apply(&mut movie);
        assert_eq!(movie.title, "Black Panther");
        assert_eq!(movie.year, 2019);
        assert_eq!(movie.runtime, Runtime::new(135));
        assert_eq!(movie.genres.len(), 2);
        assert_eq!(movie.version, 2);
    }

    #[test]
    fn test_create_missing_fields() {
        let payload: CreateMovie = serde_json::from_str(r#"{"title": "Moana"}"#).unwrap();
        let input = MovieInput::from(payload);
        assert_eq!(input.year, 0);
        assert_eq!(input.runtime, Runtime::new(0));
        assert_eq!(input.genres, None);
    }
}
