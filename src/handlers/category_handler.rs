use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::CreateCategoryRequest,
    models::dto::response::MessageResponse,
};

#[get("/api/categories")]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let categories = state.category_service.list_categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[post("/api/categories")]
pub async fn create_category(
    state: web::Data<AppState>,
    request: web::Json<CreateCategoryRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let category = state
        .category_service
        .create_category(&auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(category))
}

#[delete("/api/categories/{slug}")]
pub async fn delete_category(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.category_service.delete_category(&auth.0, &slug).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Category deleted")))
}
