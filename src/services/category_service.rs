use std::sync::Arc;

use validator::Validate;

use crate::{
    access,
    auth::Claims,
    errors::AppResult,
    models::domain::Category,
    models::dto::request::CreateCategoryRequest,
    repositories::CategoryRepository,
};

pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_category(
        &self,
        claims: &Claims,
        request: CreateCategoryRequest,
    ) -> AppResult<Category> {
        access::require_admin(claims)?;
        request.validate()?;

        let category = Category::new(&request.name, request.slug.as_deref());
        self.repository.create(category).await
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.find_all().await
    }

    pub async fn delete_category(&self, claims: &Claims, slug: &str) -> AppResult<()> {
        access::require_admin(claims)?;
        self.repository.delete(slug).await
    }
}
