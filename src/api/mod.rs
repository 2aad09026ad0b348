pub mod extract;
pub mod response;

use axum::{Router, http::StatusCode, routing::{get, post}};
use serde_json::{Map, Value};
use tower_http::trace::TraceLayer;

use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

use self::extract::{CourseId, DbConn, JsonBody};
use self::response::ApiResponse;

pub const API_PREFIX: &str = "/codigo/api/v1.0";

pub fn router(state: AppState) -> Router {
    let courses = Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/", post(create_course))
        .route(
            "/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        );

    Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, courses)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(mut conn: DbConn) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&mut *conn).await?;
    Ok(StatusCode::OK)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn list_courses(mut conn: DbConn) -> Result<ApiResponse<Vec<Course>>, AppError> {
    let courses = repository::list_courses(&mut conn).await?;
    Ok(ApiResponse(courses))
}

async fn get_course(
    CourseId(id): CourseId,
    mut conn: DbConn,
) -> Result<ApiResponse<Course>, AppError> {
    let course = repository::find_course(&mut conn, id).await?;
    Ok(ApiResponse(course))
}

async fn create_course(
    mut conn: DbConn,
    JsonBody(req): JsonBody<NewCourseRequest>,
) -> Result<ApiResponse<Course>, AppError> {
    let course = repository::insert_course(&mut conn, req).await?;
    Ok(ApiResponse(course))
}

// The lookup runs before the body is looked at, so a missing course wins over
// a missing body.
async fn update_course(
    CourseId(id): CourseId,
    mut conn: DbConn,
    body: Result<JsonBody<UpdateCourseRequest>, AppError>,
) -> Result<ApiResponse<Course>, AppError> {
    let current = repository::find_course(&mut conn, id).await?;
    let JsonBody(req) = body?;
    let course = repository::update_course(&mut conn, current, req).await?;
    Ok(ApiResponse(course))
}

async fn delete_course(
    CourseId(id): CourseId,
    mut conn: DbConn,
) -> Result<ApiResponse<Map<String, Value>>, AppError> {
    let course = repository::find_course(&mut conn, id).await?;
    repository::delete_course(&mut conn, &course).await?;
    Ok(ApiResponse(Map::new()))
}
