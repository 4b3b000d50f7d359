use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Category,
    repositories::parse_object_id,
};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: Category) -> AppResult<Category>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Category>>;
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>>;
    async fn find_all(&self) -> AppResult<Vec<Category>>;
    async fn delete(&self, slug: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoCategoryRepository {
    collection: Collection<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("categories");
        Self { collection }
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    async fn create(&self, mut category: Category) -> AppResult<Category> {
        let result = self.collection.insert_one(&category).await.map_err(|e| {
            let name = category.name.clone();
            AppError::from_mongo_write(e, || {
                AppError::AlreadyExists(format!("Category '{}' already exists", name))
            })
        })?;

        category.id = result.inserted_id.as_object_id();
        Ok(category)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Category>> {
        let oid = parse_object_id(id)?;
        let category = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(category)
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        let category = self.collection.find_one(doc! { "slug": slug }).await?;
        Ok(category)
    }

    async fn find_all(&self) -> AppResult<Vec<Category>> {
        let cursor = self.collection.find(doc! {}).sort(doc! { "name": 1 }).await?;
        let categories: Vec<Category> = cursor.try_collect().await?;
        Ok(categories)
    }

    async fn delete(&self, slug: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "slug": slug }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Category with slug '{}' not found",
                slug
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("name_unique".to_string())
                    .build(),
            )
            .build();
        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("slug_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(name_index).await?;
        self.collection.create_index(slug_index).await?;
        log::info!("✓ Created unique indexes on categories.name and categories.slug");

        Ok(())
    }
}
