use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;

/// Uniform JSON wrapper for every response the service sends.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub data: Option<T>,
    pub error: Option<&'static str>,
}

pub fn generate_response<T>(
    status: StatusCode,
    data: Option<T>,
    error: Option<&'static str>,
) -> Envelope<T> {
    Envelope {
        status: status.as_u16(),
        data,
        error,
    }
}

/// A successful (200) envelope around `T`.
#[derive(Debug)]
pub struct ApiResponse<T>(pub T);

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Json(generate_response(StatusCode::OK, Some(self.0), None));
        (StatusCode::OK, body).into_response()
    }
}
