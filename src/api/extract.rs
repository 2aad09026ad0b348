use std::ops::{Deref, DerefMut};

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{HeaderMap, header::CONTENT_TYPE, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::{Sqlite, SqliteConnection, pool::PoolConnection};

use crate::error::AppError;
use crate::state::AppState;

/// A pooled connection held for the lifetime of one request.
///
/// The connection goes back to the pool when this guard is dropped, whatever
/// way the handler exits.
pub struct DbConn(pub PoolConnection<Sqlite>);

impl FromRequestParts<AppState> for DbConn {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let conn = state.db.acquire().await?;
        Ok(DbConn(conn))
    }
}

impl Deref for DbConn {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbConn {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// The `{id}` path segment. Anything but a plain decimal integer is a 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseId(pub i64);

impl<S> FromRequestParts<S> for CourseId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;
        parse_course_id(&raw).map(CourseId).ok_or(AppError::NotFound)
    }
}

fn parse_course_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// A JSON object body decoded into `T`.
///
/// Rejects with 400 when the content type is not JSON, or the body is missing,
/// not JSON, not an object, or an empty object.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !json_content_type(req.headers()) {
            return Err(AppError::BadRequest(
                "expected `Content-Type: application/json`".to_string(),
            ));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        decode_body(&bytes).map(JsonBody)
    }
}

fn json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let mime = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

pub fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest("missing request body".to_string()));
    }

    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| AppError::BadRequest(format!("invalid JSON: {}", e)))?;

    match &value {
        Value::Object(map) if !map.is_empty() => {}
        _ => {
            return Err(AppError::BadRequest(
                "expected a non-empty JSON object".to_string(),
            ));
        }
    }

    serde_json::from_value(value).map_err(|e| AppError::BadRequest(format!("invalid body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCourseRequest, UpdateCourseRequest};

    #[test]
    fn course_id_accepts_only_digits() {
        assert_eq!(parse_course_id("42"), Some(42));
        assert_eq!(parse_course_id("0"), Some(0));
        assert_eq!(parse_course_id("-1"), None);
        assert_eq!(parse_course_id("+1"), None);
        assert_eq!(parse_course_id("abc"), None);
        assert_eq!(parse_course_id(""), None);
        assert_eq!(parse_course_id("99999999999999999999999"), None);
    }

    #[test]
    fn content_type_must_be_json() {
        let mut headers = HeaderMap::new();
        assert!(!json_content_type(&headers));

        for (value, expected) in [
            ("application/json", true),
            ("application/json; charset=utf-8", true),
            ("Application/JSON", true),
            ("application/merge-patch+json", true),
            ("text/plain", false),
            ("application/x-www-form-urlencoded", false),
        ] {
            headers.insert(CONTENT_TYPE, value.parse().unwrap());
            assert_eq!(json_content_type(&headers), expected, "content type {}", value);
        }
    }

    #[test]
    fn missing_fields_default_at_decode_time() {
        let req: NewCourseRequest = decode_body(br#"{"title":"Algebra"}"#).unwrap();
        assert_eq!(req.title, "Algebra");
        assert_eq!(req.description, "");

        let req: UpdateCourseRequest = decode_body(br#"{"description":"Updated"}"#).unwrap();
        assert_eq!(req.title, None);
        assert_eq!(req.description.as_deref(), Some("Updated"));
    }

    #[test]
    fn falsy_bodies_are_bad_requests() {
        let bodies: [&[u8]; 8] = [b"", b"  ", b"{}", b"null", b"[]", b"[1]", b"\"x\"", b"not-json"];
        for body in bodies {
            let res = decode_body::<NewCourseRequest>(body);
            assert!(matches!(res, Err(AppError::BadRequest(_))), "body {:?}", body);
        }
    }

    #[test]
    fn null_update_field_is_bad_request() {
        let res = decode_body::<UpdateCourseRequest>(br#"{"title": null}"#);
        assert!(matches!(res, Err(AppError::BadRequest(_))));

        let res = decode_body::<UpdateCourseRequest>(br#"{"title": "A", "description": null}"#);
        assert!(matches!(res, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn wrongly_typed_field_is_bad_request() {
        let res = decode_body::<NewCourseRequest>(br#"{"title": 5}"#);
        assert!(matches!(res, Err(AppError::BadRequest(_))));
    }
}
