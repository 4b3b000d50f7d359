use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{
        EnrollRequest, LessonCompletionRequest, ReviewRequest, SetEnrollmentStatusRequest,
    },
    models::dto::response::MessageResponse,
};

#[post("/api/enrollments")]
pub async fn enroll(
    state: web::Data<AppState>,
    request: web::Json<EnrollRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let enrollment = state
        .enrollment_service
        .enroll(&auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(enrollment))
}

#[get("/api/enrollments/mine")]
pub async fn my_enrollments(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let enrollments = state.enrollment_service.my_enrollments(&auth.0).await?;
    Ok(HttpResponse::Ok().json(enrollments))
}

#[get("/api/enrollments/course/{course_id}")]
pub async fn course_enrollments(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let enrollments = state
        .enrollment_service
        .course_enrollments(&auth.0, &course_id)
        .await?;
    Ok(HttpResponse::Ok().json(enrollments))
}

#[get("/api/enrollments/{id}")]
pub async fn get_enrollment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let enrollment = state.enrollment_service.get_enrollment(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(enrollment))
}

#[post("/api/enrollments/{id}/progress")]
pub async fn record_lesson_completion(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<LessonCompletionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let enrollment = state
        .enrollment_service
        .record_lesson_completion(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(enrollment))
}

#[post("/api/enrollments/{id}/certificate")]
pub async fn issue_certificate(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let enrollment = state
        .enrollment_service
        .issue_certificate(&auth.0, &id)
        .await?;
    Ok(HttpResponse::Ok().json(enrollment))
}

#[patch("/api/enrollments/{id}/status")]
pub async fn set_enrollment_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SetEnrollmentStatusRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let enrollment = state
        .enrollment_service
        .set_status(&auth.0, &id, request.into_inner().status)
        .await?;
    Ok(HttpResponse::Ok().json(enrollment))
}

#[post("/api/enrollments/{id}/reviews")]
pub async fn add_review(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<ReviewRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let enrollment = state
        .enrollment_service
        .add_review(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(enrollment))
}

#[delete("/api/enrollments/{id}")]
pub async fn delete_enrollment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state
        .enrollment_service
        .delete_enrollment(&auth.0, &id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Enrollment deleted")))
}
