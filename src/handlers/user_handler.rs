use actix_web::{delete, get, patch, web, HttpResponse};

use crate::{
    access,
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{PaginationParams, UpdateUserRequest},
    models::dto::response::MessageResponse,
};

#[get("/api/users")]
pub async fn get_all_users(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    access::require_admin(&auth.0)?;

    let pagination = query.into_inner();
    let response = state
        .user_service
        .get_all_users_paginated(pagination.offset(), pagination.limit())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/users/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    access::require_admin_or_owner(&auth.0, &id)?;

    let user = state.user_service.get_user(&id).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[patch("/api/users/{id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateUserRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    access::require_admin_or_owner(&auth.0, &id)?;

    let response = state
        .user_service
        .update_user(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/api/users/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    access::require_admin_or_owner(&auth.0, &id)?;

    state.user_service.delete_user(&id).await?;
    state.auth_service.revoke_all_sessions(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted")))
}
