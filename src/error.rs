use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;
use tracing::{debug, error};

use crate::api::response::generate_response;

pub const NOT_FOUND_MESSAGE: &str = "Curso no encontrado";
pub const BAD_REQUEST_MESSAGE: &str = "Necesitas parametros";
pub const UNPROCESSABLE_MESSAGE: &str = "Unprocessable Entity";
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Failure of a record store operation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("course not found")]
    NotFound,

    #[error("a course with this title already exists")]
    DuplicateTitle,

    #[error("no row was affected")]
    Unchanged,

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::DuplicateTitle
            }
            other => RepositoryError::Database(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound,
            RepositoryError::DuplicateTitle | RepositoryError::Unchanged => {
                AppError::UnprocessableEntity(err.to_string())
            }
            RepositoryError::Database(e) => AppError::Database(e),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The fixed message sent to the client. Details stay in the logs.
    pub fn message(&self) -> &'static str {
        match self {
            AppError::NotFound => NOT_FOUND_MESSAGE,
            AppError::BadRequest(_) => BAD_REQUEST_MESSAGE,
            AppError::UnprocessableEntity(_) => UNPROCESSABLE_MESSAGE,
            AppError::Database(_) => INTERNAL_MESSAGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Database(e) => error!("database error: {}", e),
            other => debug!("request rejected: {}", other),
        }

        let body = Json(generate_response::<()>(status, None, Some(self.message())));

        (status, body).into_response()
    }
}
