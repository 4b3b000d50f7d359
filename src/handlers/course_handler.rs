use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    auth::{AuthenticatedUser, MaybeAuthenticated},
    errors::AppError,
    models::dto::request::{CreateCourseRequest, UpdateCourseRequest},
    models::dto::response::MessageResponse,
};

#[derive(Debug, Deserialize)]
pub struct CourseListParams {
    pub category_id: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[get("/api/courses")]
pub async fn list_courses(
    state: web::Data<AppState>,
    query: web::Query<CourseListParams>,
    auth: MaybeAuthenticated,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let offset = params.offset.unwrap_or(0).max(0);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);

    let response = state
        .course_service
        .list_courses(auth.0.as_ref(), params.category_id.as_deref(), offset, limit)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/courses/mine")]
pub async fn my_courses(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let courses = state.course_service.list_instructor_courses(&auth.0).await?;
    Ok(HttpResponse::Ok().json(courses))
}

#[get("/api/courses/slug/{slug}")]
pub async fn get_course_by_slug(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    auth: MaybeAuthenticated,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .get_course_by_slug(auth.0.as_ref(), &slug)
        .await?;
    Ok(HttpResponse::Ok().json(course))
}

#[post("/api/courses")]
pub async fn create_course(
    state: web::Data<AppState>,
    request: web::Json<CreateCourseRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .create_course(&auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(course))
}

#[patch("/api/courses/{id}")]
pub async fn update_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateCourseRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .update_course(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(course))
}

#[delete("/api/courses/{id}")]
pub async fn delete_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.course_service.delete_course(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Course deleted")))
}

#[get("/api/courses/{id}/analytics")]
pub async fn course_analytics(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let analytics = state.course_service.course_analytics(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(analytics))
}
