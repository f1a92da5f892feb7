use std::{future::Future, time::Duration};

use sqlx::{Row as _, types::Json};
use time::PrimitiveDateTime;
use tracing::debug;

use crate::{
    ChosenDB, ChosenRow, Pool,
    error::{Error, Result},
    validator::{Validator, unique},
};

pub const MAX_TITLE_BYTES: usize = 500;
pub const EARLIEST_YEAR: i32 = 1888;
pub const MAX_GENRES: usize = 5;

/// Movie length in whole minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Runtime(i32);

impl Runtime {
    pub const fn new(minutes: i32) -> Self {
        Runtime(minutes)
    }

    pub const fn minutes(self) -> i32 {
        self.0
    }
}

impl From<i32> for Runtime {
    fn from(minutes: i32) -> Self {
        Runtime(minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: i64,
    pub created_at: PrimitiveDateTime,
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    pub genres: Vec<String>,
    pub version: i32,
}

impl sqlx::FromRow<'_, ChosenRow> for Movie {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        let Json(genres) = row.try_get::<Json<Vec<String>>, _>("genres")?;
        Ok(Movie {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            title: row.try_get("title")?,
            year: row.try_get("year")?,
            runtime: Runtime(row.try_get("runtime")?),
            genres,
            version: row.try_get("version")?,
        })
    }
}

/// Caller owned part of a movie, as supplied for create or update.
///
/// `genres` is `None` when not provided at all, which is reported
/// differently from an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieInput {
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    pub genres: Option<Vec<String>>,
}

impl From<&Movie> for MovieInput {
    fn from(movie: &Movie) -> Self {
        MovieInput {
            title: movie.title.clone(),
            year: movie.year,
            runtime: movie.runtime,
            genres: Some(movie.genres.clone()),
        }
    }
}

impl MovieInput {
    /// Validates against the current local calendar year.
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        validate_movie(&mut v, self, current_year());
        v.into_result().map_err(Error::from)
    }
}

/// Local calendar year, or the UTC year if the local offset is unavailable.
pub fn current_year() -> i32 {
    time::OffsetDateTime::now_local()
        .unwrap_or_else(|_| time::OffsetDateTime::now_utc())
        .year()
}

pub fn validate_movie(v: &mut Validator, movie: &MovieInput, current_year: i32) {
    v.check(!movie.title.is_empty(), "title", "must be provided");
    v.check(
        movie.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(movie.year != 0, "year", "must be provided");
    v.check(movie.year >= EARLIEST_YEAR, "year", "must be greater than 1888");
    v.check(movie.year <= current_year, "year", "must not be in the future");

    let runtime = movie.runtime.minutes();
    v.check(runtime != 0, "runtime", "must be provided");
    v.check(runtime > 0, "runtime", "must be a positive integer");

    v.check(movie.genres.is_some(), "genres", "must be provided");
    let genres = movie.genres.as_deref().unwrap_or_default();
    v.check(!genres.is_empty(), "genres", "must contain at least 1 genre");
    v.check(
        genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(unique(genres), "genres", "must not contain duplicate values");
}

const INSERT_SQL: &str = r#"
INSERT INTO movies (title, year, runtime, genres)
VALUES (?, ?, ?, ?)
RETURNING id, created_at, version
"#;

const SELECT_SQL: &str = r#"
SELECT id, created_at, title, year, runtime, genres, version
FROM movies
WHERE id = ?
"#;

const UPDATE_SQL: &str = r#"
UPDATE movies
SET title = ?, year = ?, runtime = ?, genres = ?, version = version + 1
WHERE id = ? AND version = ?
RETURNING version
"#;

const DELETE_SQL: &str = "DELETE FROM movies WHERE id = ?";

pub type MovieRepository = MovieRepositoryImpl<Pool>;

pub struct MovieRepositoryImpl<E> {
    executor: E,
    timeout: Option<Duration>,
}

impl<'c, E> MovieRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            timeout: None,
        }
    }

    /// Bounds every statement issued by this repository.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn bounded<T>(
        &self,
        statement: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> Result<T> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, statement)
                .await
                .map_err(|_| Error::Timeout(limit))?
                .map_err(Error::from),
            None => statement.await.map_err(Error::from),
        }
    }

    pub async fn insert(&self, input: MovieInput) -> Result<Movie> {
        input.validate()?;
        let MovieInput {
            title,
            year,
            runtime,
            genres,
        } = input;
        let genres = genres.unwrap_or_default();

        let (id, created_at, version): (i64, PrimitiveDateTime, i32) = self
            .bounded(
                sqlx::query_as(INSERT_SQL)
                    .bind(&title)
                    .bind(year)
                    .bind(runtime.minutes())
                    .bind(Json(&genres))
                    .fetch_one(&self.executor),
            )
            .await?;
        debug!("Inserted movie {id}");

        Ok(Movie {
            id,
            created_at,
            title,
            year,
            runtime,
            genres,
            version,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Movie> {
        if id < 1 {
            return Err(not_found(id));
        }
        self.bounded(
            sqlx::query_as::<_, Movie>(SELECT_SQL)
                .bind(id)
                .fetch_optional(&self.executor),
        )
        .await?
        .ok_or_else(|| not_found(id))
    }

    /// Replaces caller owned fields if the stored version still matches
    /// `movie.version`, then writes the incremented version back.
    pub async fn update(&self, movie: &mut Movie) -> Result<()> {
        if movie.id < 1 {
            return Err(not_found(movie.id));
        }
        MovieInput::from(&*movie).validate()?;

        let new_version: Option<i32> = self
            .bounded(
                sqlx::query_scalar(UPDATE_SQL)
                    .bind(&movie.title)
                    .bind(movie.year)
                    .bind(movie.runtime.minutes())
                    .bind(Json(&movie.genres))
                    .bind(movie.id)
                    .bind(movie.version)
                    .fetch_optional(&self.executor),
            )
            .await?;

        match new_version {
            Some(version) => {
                debug!("Updated movie {} to version {version}", movie.id);
                movie.version = version;
                Ok(())
            }
            None => {
                debug!(
                    "Movie {} not updated, version {} is stale",
                    movie.id, movie.version
                );
                Err(Error::StaleVersion {
                    id: movie.id,
                    version: movie.version,
                })
            }
        }
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if id < 1 {
            return Err(not_found(id));
        }
        let res = self
            .bounded(sqlx::query(DELETE_SQL).bind(id).execute(&self.executor))
            .await?;

        if res.rows_affected() == 0 {
            Err(not_found(id))
        } else {
            debug!("Deleted movie {id}");
            Ok(())
        }
    }
}

fn not_found(id: i64) -> Error {
    Error::RecordNotFound(format!("Movie {id}"))
}
